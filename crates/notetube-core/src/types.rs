//! Request-scoped data model shared by every pipeline stage.

use serde::{Deserialize, Serialize};

/// A scored key phrase produced by keyword extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub phrase: String,
    pub score: f64,
}

impl Keyword {
    pub fn new(phrase: impl Into<String>, score: f64) -> Self {
        Self {
            phrase: phrase.into(),
            score,
        }
    }
}

/// Channel metadata looked up in batch for a query's results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelProfile {
    pub channel_id: String,
    pub subscriber_count: u64,
    /// Channel default language; empty when the channel does not declare one.
    pub language: String,
}

/// Like/view counters of a single video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStatSnapshot {
    pub video_id: String,
    pub like_count: u64,
    pub view_count: u64,
}

/// A search hit before enrichment. Identity is `video_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCandidate {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub channel_id: String,
    pub url: String,
}

impl RawCandidate {
    /// Canonical watch URL for a video id.
    pub fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", video_id)
    }
}

/// An enriched, filtered and scored video as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedVideo {
    pub title: String,
    pub description: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    pub video_id: String,
    pub url: String,
    pub channel_id: String,
    pub channel_subscribers: u64,
    pub like_count: u64,
    pub view_count: u64,
    /// Engagement normalized to [0, 1] within the query batch that produced it.
    pub engagement_score: f64,
    /// Reserved for similarity ranking; 0 in engagement mode.
    pub relevance_score: f64,
}

impl RankedVideo {
    /// Join a candidate with its channel and statistics records.
    pub fn enrich(
        candidate: RawCandidate,
        channel: &ChannelProfile,
        stats: &VideoStatSnapshot,
        engagement_score: f64,
    ) -> Self {
        Self {
            title: candidate.title,
            description: candidate.description,
            thumbnail_url: candidate.thumbnail_url,
            video_id: candidate.video_id,
            url: candidate.url,
            channel_id: candidate.channel_id,
            channel_subscribers: channel.subscriber_count,
            like_count: stats.like_count,
            view_count: stats.view_count,
            engagement_score,
            relevance_score: 0.0,
        }
    }
}
