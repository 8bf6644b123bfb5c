//! Runtime orchestrator: runs the discovery pipeline stage by stage.
//!
//! Documents become keywords, keywords become queries, queries become
//! candidate videos, and candidates are merged into one ranked list. Every
//! stage transition is reported to a [`StageSink`].

pub mod orchestrator;
pub mod ranking;
pub mod sink;
pub mod types;

pub use orchestrator::Pipeline;
pub use ranking::rank;
pub use sink::{NullSink, StageSink};
pub use types::*;
