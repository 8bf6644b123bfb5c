//! YouTube Data API v3 client.
//!
//! Responses are decoded once into [`RawCandidate`], [`ChannelProfile`] and
//! [`VideoStatSnapshot`]; nothing else of the API's nested schema leaves this
//! module.

use std::time::Duration;

use async_trait::async_trait;
use notetube_core::{ChannelProfile, RawCandidate, VideoStatSnapshot};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, VideoError};
use crate::platform::{SearchRequest, VideoPlatform};

const BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Maximum ids per `channels`/`videos` call.
const MAX_IDS_PER_CALL: usize = 50;

pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at another API root (proxies, local mocks).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn get<T: DeserializeOwned>(&self, resource: &str, params: &[(&str, &str)]) -> Result<T> {
        let key = self.api_key.as_deref().ok_or(VideoError::MissingApiKey)?;
        let url = format!("{}/{}", self.base_url, resource);

        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", key)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(VideoError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawCandidate>> {
        let max_results = request.max_results.clamp(1, 50).to_string();
        let page: SearchPage = self
            .get(
                "search",
                &[
                    ("q", request.query.as_str()),
                    ("part", "snippet"),
                    ("type", "video"),
                    ("maxResults", max_results.as_str()),
                    ("relevanceLanguage", request.language.as_str()),
                    ("order", "relevance"),
                    ("videoDimension", "2d"),
                    ("videoCaption", "closedCaption"),
                    ("videoCategoryId", request.category.as_str()),
                ],
            )
            .await?;

        let candidates = page.into_candidates();
        debug!(query = %request.query, count = candidates.len(), "Search results decoded");
        Ok(candidates)
    }

    async fn channels_batch(&self, channel_ids: &[String]) -> Result<Vec<ChannelProfile>> {
        let mut profiles = Vec::with_capacity(channel_ids.len());
        for chunk in channel_ids.chunks(MAX_IDS_PER_CALL) {
            let ids = chunk.join(",");
            let page: ChannelPage = self
                .get("channels", &[("part", "statistics,snippet"), ("id", ids.as_str())])
                .await?;
            profiles.extend(page.into_profiles());
        }
        Ok(profiles)
    }

    async fn videos_batch(&self, video_ids: &[String]) -> Result<Vec<VideoStatSnapshot>> {
        let mut snapshots = Vec::with_capacity(video_ids.len());
        for chunk in video_ids.chunks(MAX_IDS_PER_CALL) {
            let ids = chunk.join(",");
            let page: VideoPage = self
                .get("videos", &[("part", "statistics"), ("id", ids.as_str())])
                .await?;
            snapshots.extend(page.into_snapshots());
        }
        Ok(snapshots)
    }
}

// Wire format. Counts arrive as decimal strings and may be hidden.

#[derive(Deserialize)]
struct SearchPage {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: SearchSnippet,
}

#[derive(Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct SearchSnippet {
    #[serde(rename = "channelId", default)]
    channel_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Deserialize, Default)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    url: String,
}

impl Thumbnails {
    fn best_url(self) -> String {
        self.high
            .or(self.medium)
            .or(self.default)
            .map(|t| t.url)
            .unwrap_or_default()
    }
}

impl SearchPage {
    fn into_candidates(self) -> Vec<RawCandidate> {
        self.items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                Some(RawCandidate {
                    url: RawCandidate::watch_url(&video_id),
                    title: item.snippet.title,
                    description: item.snippet.description,
                    thumbnail_url: item.snippet.thumbnails.best_url(),
                    channel_id: item.snippet.channel_id,
                    video_id,
                })
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct ChannelPage {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Deserialize)]
struct ChannelItem {
    id: String,
    #[serde(default)]
    statistics: ChannelStatistics,
    #[serde(default)]
    snippet: ChannelSnippet,
}

#[derive(Deserialize, Default)]
struct ChannelStatistics {
    #[serde(rename = "subscriberCount")]
    subscriber_count: Option<String>,
}

#[derive(Deserialize, Default)]
struct ChannelSnippet {
    #[serde(rename = "defaultLanguage")]
    default_language: Option<String>,
}

impl ChannelPage {
    fn into_profiles(self) -> Vec<ChannelProfile> {
        self.items
            .into_iter()
            .map(|item| ChannelProfile {
                channel_id: item.id,
                subscriber_count: parse_count(item.statistics.subscriber_count.as_deref()),
                language: item.snippet.default_language.unwrap_or_default(),
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct VideoPage {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Deserialize)]
struct VideoItem {
    id: String,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Deserialize, Default)]
struct VideoStatistics {
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

impl VideoPage {
    fn into_snapshots(self) -> Vec<VideoStatSnapshot> {
        self.items
            .into_iter()
            .map(|item| VideoStatSnapshot {
                video_id: item.id,
                like_count: parse_count(item.statistics.like_count.as_deref()),
                view_count: parse_count(item.statistics.view_count.as_deref()),
            })
            .collect()
    }
}

fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}
