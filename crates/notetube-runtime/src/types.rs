//! Runtime types.

use notetube_core::{Keyword, RankedVideo};
use serde::Serialize;
use thiserror::Error;

/// An uploaded document.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// What a caller submitted. Either part may be missing.
#[derive(Debug, Clone, Default)]
pub struct PipelineInput {
    pub file: Option<UploadedFile>,
    pub text: Option<String>,
}

/// Terminal result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub keywords: Vec<Keyword>,
    pub language: String,
    pub queries: Vec<String>,
    /// Ranked and truncated to the configured top-K.
    pub videos: Vec<RankedVideo>,
}

/// Aggregate (non-streaming) response body.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResponse {
    pub keywords: Vec<String>,
    pub queries: Vec<String>,
    pub videos: Vec<RankedVideo>,
}

impl From<PipelineResult> for ProcessResponse {
    fn from(result: PipelineResult) -> Self {
        Self {
            keywords: result.keywords.into_iter().map(|k| k.phrase).collect(),
            queries: result.queries,
            videos: result.videos,
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fatal to the request; reported to the caller.
    #[error("{0}")]
    Input(String),

    /// The event consumer went away.
    #[error("pipeline cancelled: consumer disconnected")]
    Cancelled,

    #[error("internal pipeline error: {0}")]
    Internal(String),
}
