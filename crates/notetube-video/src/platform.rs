//! Video platform collaborator interface.

use async_trait::async_trait;
use notetube_core::{ChannelProfile, RawCandidate, VideoStatSnapshot};

use crate::error::Result;

/// One search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// Relevance language (ISO 639-1).
    pub language: String,
    pub max_results: u32,
    /// Platform content category id.
    pub category: String,
}

/// Search plus batched metadata lookups, decoded into the shared records.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawCandidate>>;

    async fn channels_batch(&self, channel_ids: &[String]) -> Result<Vec<ChannelProfile>>;

    async fn videos_batch(&self, video_ids: &[String]) -> Result<Vec<VideoStatSnapshot>>;
}
