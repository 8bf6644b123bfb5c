//! Generative backend configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "gemma3:4b";

/// Stored generative configuration (`generative.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerativeConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// How long the model stays loaded after a call, in Ollama duration syntax.
    #[serde(default = "default_keep_alive")]
    pub keep_alive: String,
}

fn default_request_timeout() -> u64 {
    60
}
fn default_connect_timeout() -> u64 {
    5
}
fn default_keep_alive() -> String {
    "10m".into()
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            host: None,
            model: None,
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            keep_alive: default_keep_alive(),
        }
    }
}

impl GenerativeConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: GenerativeConfig = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        if config.host.is_none() {
            config.host = std::env::var("OLLAMA_HOST").ok().filter(|h| !h.trim().is_empty());
        }
        if config.model.is_none() {
            config.model = std::env::var("OLLAMA_MODEL").ok().filter(|m| !m.trim().is_empty());
        }

        info!(
            "Generative backend: {} (model {})",
            config.host(),
            config.model()
        );
        config
    }

    /// Base URL without a trailing slash.
    pub fn host(&self) -> String {
        self.host
            .as_deref()
            .unwrap_or(DEFAULT_OLLAMA_HOST)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn model(&self) -> String {
        self.model.clone().unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.into())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }
}
