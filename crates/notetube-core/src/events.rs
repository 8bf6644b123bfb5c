//! Stage event model for the progress-streaming protocol.
//!
//! Every pipeline stage can be reported as one [`StageEvent`]. In streaming
//! mode each event is written as a single JSON line; the last line of a
//! response is either `processing_complete` or `error`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Keyword, RankedVideo};

/// Pipeline stage, in the order stages are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    FileReceived,
    FileProcessed,
    ExtractingKeywords,
    KeywordsExtracted,
    GeneratingQueries,
    QueriesGenerated,
    YoutubeSearchStarted,
    YoutubeSearchCompleted,
    ProcessingComplete,
    /// Terminal failure, reachable from any stage.
    Error,
}

impl StageStatus {
    /// Whether no further event may follow this one.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ProcessingComplete | Self::Error)
    }

    /// Wire name, identical to the serialized form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FileReceived => "file_received",
            Self::FileProcessed => "file_processed",
            Self::ExtractingKeywords => "extracting_keywords",
            Self::KeywordsExtracted => "keywords_extracted",
            Self::GeneratingQueries => "generating_queries",
            Self::QueriesGenerated => "queries_generated",
            Self::YoutubeSearchStarted => "youtube_search_started",
            Self::YoutubeSearchCompleted => "youtube_search_completed",
            Self::ProcessingComplete => "processing_complete",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record of the streaming protocol.
///
/// Stage-specific extra fields are flattened into the top-level object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    pub status: StageStatus,
    pub message: String,
    pub keywords: Vec<String>,
    pub queries: Vec<String>,
    pub videos: Vec<RankedVideo>,
    #[serde(flatten)]
    pub extras: serde_json::Map<String, serde_json::Value>,
}

impl StageEvent {
    /// Create an event. An `Error` event requires a non-empty message.
    pub fn new(status: StageStatus, message: impl Into<String>) -> Result<Self> {
        let message = message.into();
        if status == StageStatus::Error && message.trim().is_empty() {
            return Err(Error::InvalidEvent(
                "error events require a message".to_string(),
            ));
        }
        Ok(Self {
            status,
            message,
            keywords: Vec::new(),
            queries: Vec::new(),
            videos: Vec::new(),
            extras: serde_json::Map::new(),
        })
    }

    /// Shorthand for a terminal error event.
    pub fn error(message: impl Into<String>) -> Result<Self> {
        Self::new(StageStatus::Error, message)
    }

    /// Attach keyword phrases (scores are not part of the wire format).
    pub fn with_keywords(mut self, keywords: &[Keyword]) -> Self {
        self.keywords = keywords.iter().map(|k| k.phrase.clone()).collect();
        self
    }

    pub fn with_queries(mut self, queries: &[String]) -> Self {
        self.queries = queries.to_vec();
        self
    }

    pub fn with_videos(mut self, videos: &[RankedVideo]) -> Self {
        self.videos = videos.to_vec();
        self
    }

    /// Attach a stage-specific field. Reserved keys are ignored.
    pub fn with_extra(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        if !matches!(key, "status" | "message" | "keywords" | "queries" | "videos") {
            self.extras.insert(key.to_string(), value.into());
        }
        self
    }

    /// Serialize as one newline-terminated JSON record.
    pub fn to_json_line(&self) -> String {
        match serde_json::to_string(self) {
            Ok(mut line) => {
                line.push('\n');
                line
            }
            Err(e) => format!(
                "{{\"status\":\"error\",\"message\":\"event serialization failed: {}\",\"keywords\":[],\"queries\":[],\"videos\":[]}}\n",
                e.to_string().replace('"', "'")
            ),
        }
    }
}
