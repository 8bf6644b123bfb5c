//! NoteTube Core: data model, stage events, configuration, errors.

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::{DataPaths, NoteTubeConfig, PipelineTuning};
pub use error::{Error, Result};
pub use events::{StageEvent, StageStatus};
pub use types::{ChannelProfile, Keyword, RankedVideo, RawCandidate, VideoStatSnapshot};
