//! NoteTube Query: turns ranked keywords into video search queries.
//!
//! A local generative model writes the queries; when it is unreachable,
//! slow, or silent, the top keywords are used verbatim.

pub mod config;
pub mod providers;
pub mod synthesizer;
pub mod types;

pub use config::GenerativeConfig;
pub use providers::{GenerativeBackend, OllamaBackend};
pub use synthesizer::QuerySynthesizer;
pub use types::GenerateOutcome;
