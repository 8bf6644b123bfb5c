//! Per-query acquisition: search, enrich, filter, score, normalize.

use std::collections::{HashMap, HashSet};

use notetube_core::{ChannelProfile, RankedVideo, VideoStatSnapshot};
use tracing::debug;

use crate::error::Result;
use crate::platform::{SearchRequest, VideoPlatform};

/// Per-request acquisition settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireParams {
    /// Language of the notes; also accepted as a channel language.
    pub language: String,
    pub max_results: u32,
    pub min_subscribers: u64,
    pub min_likes: u64,
    pub category: String,
}

/// Run one query through the platform and return its filtered videos with
/// engagement normalized to the batch maximum.
pub async fn acquire(
    platform: &dyn VideoPlatform,
    query: &str,
    params: &AcquireParams,
) -> Result<Vec<RankedVideo>> {
    let request = SearchRequest {
        query: query.to_string(),
        language: params.language.clone(),
        max_results: params.max_results,
        category: params.category.clone(),
    };
    let candidates = platform.search(&request).await?;

    let mut channel_ids = Vec::new();
    let mut video_ids = Vec::new();
    let mut seen_channels = HashSet::new();
    let mut seen_videos = HashSet::new();
    for c in &candidates {
        if seen_channels.insert(c.channel_id.as_str()) {
            channel_ids.push(c.channel_id.clone());
        }
        if seen_videos.insert(c.video_id.as_str()) {
            video_ids.push(c.video_id.clone());
        }
    }

    let channels: HashMap<String, ChannelProfile> = if channel_ids.is_empty() {
        HashMap::new()
    } else {
        platform
            .channels_batch(&channel_ids)
            .await?
            .into_iter()
            .map(|p| (p.channel_id.clone(), p))
            .collect()
    };
    let stats: HashMap<String, VideoStatSnapshot> = if video_ids.is_empty() {
        HashMap::new()
    } else {
        platform
            .videos_batch(&video_ids)
            .await?
            .into_iter()
            .map(|s| (s.video_id.clone(), s))
            .collect()
    };

    let total = candidates.len();
    let missing_channel = ChannelProfile::default();
    let missing_stats = VideoStatSnapshot::default();
    let mut videos: Vec<RankedVideo> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let channel = channels.get(&candidate.channel_id).unwrap_or(&missing_channel);
            let stat = stats.get(&candidate.video_id).unwrap_or(&missing_stats);
            if !passes_filter(channel, stat, params) {
                return None;
            }
            let raw = engagement_raw(stat);
            Some(RankedVideo::enrich(candidate, channel, stat, raw))
        })
        .collect();

    normalize_engagement(&mut videos);
    debug!(query, total, kept = videos.len(), "Query acquisition finished");
    Ok(videos)
}

fn passes_filter(channel: &ChannelProfile, stats: &VideoStatSnapshot, params: &AcquireParams) -> bool {
    let language_ok = channel.language.is_empty()
        || channel.language == params.language
        || channel.language == "en";
    channel.subscriber_count >= params.min_subscribers
        && language_ok
        && stats.like_count >= params.min_likes
}

/// Likes per view, 0 for unviewed videos.
fn engagement_raw(stats: &VideoStatSnapshot) -> f64 {
    if stats.view_count == 0 {
        return 0.0;
    }
    round_to(stats.like_count as f64 / stats.view_count as f64, 10)
}

/// Scale scores so the batch maximum becomes 1.0. Empty sets and an all-zero
/// batch are left untouched.
pub fn normalize_engagement(videos: &mut [RankedVideo]) {
    let max = videos
        .iter()
        .map(|v| v.engagement_score)
        .fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return;
    }
    for v in videos.iter_mut() {
        v.engagement_score = round_to(v.engagement_score / max, 5);
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
