//! NoteTube Video: search, enrich, filter and score platform videos.

pub mod acquire;
pub mod error;
pub mod platform;
pub mod youtube;

pub use acquire::{acquire, AcquireParams};
pub use error::{Result, VideoError};
pub use platform::{SearchRequest, VideoPlatform};
pub use youtube::YouTubeClient;
