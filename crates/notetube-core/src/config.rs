//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Paths to all NoteTube data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Log directory (`data/logs/`).
    pub logs: PathBuf,
    /// Per-request log (`data/logs/requests.log`).
    pub request_log: PathBuf,
    /// Pipeline tuning overrides (`data/notetube.json`).
    pub tuning_file: PathBuf,
    /// Generative backend configuration (`data/generative.json`).
    pub generative_config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let logs = root.join("logs");
        let paths = Self {
            request_log: logs.join("requests.log"),
            tuning_file: root.join("notetube.json"),
            generative_config_file: root.join("generative.json"),
            logs,
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.logs)?;
        Ok(())
    }
}

/// Pipeline constants. Fixed by configuration, never by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineTuning {
    /// Number of search queries synthesized per request.
    #[serde(default = "default_max_queries")]
    pub max_queries: usize,
    /// Size of the final ranked slice.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_min_subscribers")]
    pub min_subscribers: u64,
    #[serde(default = "default_min_likes")]
    pub min_likes: u64,
    /// Result cap for each platform search call.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_keyword_top_n")]
    pub keyword_top_n: usize,
    #[serde(default = "default_ngram_min")]
    pub ngram_min: usize,
    #[serde(default = "default_ngram_max")]
    pub ngram_max: usize,
    /// Platform content category (27 = Education).
    #[serde(default = "default_category_id")]
    pub category_id: String,
    /// Language used when detection fails.
    #[serde(default = "default_fallback_language")]
    pub fallback_language: String,
    /// `rake` or `textrank`.
    #[serde(default = "default_keyword_algorithm")]
    pub keyword_algorithm: String,
    #[serde(default = "default_log_max_lines")]
    pub log_max_lines: usize,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

fn default_max_queries() -> usize {
    3
}
fn default_top_k() -> usize {
    10
}
fn default_min_subscribers() -> u64 {
    30_000
}
fn default_min_likes() -> u64 {
    1_000
}
fn default_max_results() -> u32 {
    50
}
fn default_keyword_top_n() -> usize {
    10
}
fn default_ngram_min() -> usize {
    1
}
fn default_ngram_max() -> usize {
    4
}
fn default_category_id() -> String {
    "27".into()
}
fn default_fallback_language() -> String {
    "it".into()
}
fn default_keyword_algorithm() -> String {
    "rake".into()
}
fn default_log_max_lines() -> usize {
    1_000
}
fn default_max_upload_mb() -> usize {
    20
}

impl Default for PipelineTuning {
    fn default() -> Self {
        Self {
            max_queries: default_max_queries(),
            top_k: default_top_k(),
            min_subscribers: default_min_subscribers(),
            min_likes: default_min_likes(),
            max_results: default_max_results(),
            keyword_top_n: default_keyword_top_n(),
            ngram_min: default_ngram_min(),
            ngram_max: default_ngram_max(),
            category_id: default_category_id(),
            fallback_language: default_fallback_language(),
            keyword_algorithm: default_keyword_algorithm(),
            log_max_lines: default_log_max_lines(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl PipelineTuning {
    /// Load tuning from a JSON file, falling back to defaults for missing
    /// fields or an unreadable file.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str::<PipelineTuning>(&raw) {
            Ok(tuning) => {
                info!("Loaded pipeline tuning from {}", path.display());
                tuning.sanitized()
            }
            Err(e) => {
                warn!("Ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp values that would make the pipeline degenerate.
    fn sanitized(mut self) -> Self {
        self.ngram_min = self.ngram_min.max(1);
        self.ngram_max = self.ngram_max.max(self.ngram_min);
        self.max_results = self.max_results.clamp(1, 50);
        self
    }
}

/// Top-level NoteTube configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteTubeConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    pub tuning: PipelineTuning,
    /// Video platform API key. Never serialized.
    #[serde(skip)]
    pub youtube_api_key: Option<String>,
    /// Allowed CORS origin; permissive when unset.
    pub cors_origin: Option<String>,
}

impl NoteTubeConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        let data_paths = DataPaths::new(data_dir)?;
        let tuning = PipelineTuning::load(&data_paths.tuning_file);

        let youtube_api_key = std::env::var("YOUTUBE_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let cors_origin = std::env::var("CORS_ORIGIN")
            .ok()
            .filter(|o| !o.trim().is_empty());

        Ok(Self {
            port,
            data_paths,
            tuning,
            youtube_api_key,
            cors_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_paths_created() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path()).unwrap();
        assert!(paths.logs.is_dir());
        assert_eq!(paths.request_log, dir.path().join("logs").join("requests.log"));
    }

    #[test]
    fn test_tuning_defaults() {
        let tuning = PipelineTuning::default();
        assert_eq!(tuning.max_queries, 3);
        assert_eq!(tuning.top_k, 10);
        assert_eq!(tuning.min_subscribers, 30_000);
        assert_eq!(tuning.min_likes, 1_000);
        assert_eq!(tuning.category_id, "27");
    }

    #[test]
    fn test_tuning_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notetube.json");
        std::fs::write(&path, r#"{"max_queries": 5, "keyword_algorithm": "textrank"}"#).unwrap();

        let tuning = PipelineTuning::load(&path);
        assert_eq!(tuning.max_queries, 5);
        assert_eq!(tuning.keyword_algorithm, "textrank");
        assert_eq!(tuning.top_k, 10);
    }

    #[test]
    fn test_tuning_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notetube.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(PipelineTuning::load(&path), PipelineTuning::default());
    }

    #[test]
    fn test_tuning_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notetube.json");
        std::fs::write(&path, r#"{"ngram_min": 0, "ngram_max": 0, "max_results": 500}"#).unwrap();

        let tuning = PipelineTuning::load(&path);
        assert_eq!(tuning.ngram_min, 1);
        assert_eq!(tuning.ngram_max, 1);
        assert_eq!(tuning.max_results, 50);
    }
}
