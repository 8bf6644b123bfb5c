//! Generative backend implementations.
//!
//! The pipeline only needs single-shot, non-streaming completions, so the
//! backend interface is one `generate` call plus a model availability check.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::GenerativeConfig;
use crate::types::GenerateOutcome;

/// A text generation service.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Run one completion. Never fails; degraded paths are outcomes.
    async fn generate(&self, prompt: &str, model: &str, timeout: Duration) -> GenerateOutcome;

    /// Whether `model` is installed and the service answers.
    async fn health_check(&self, model: &str) -> bool;
}

/// Local Ollama server over its HTTP API.
pub struct OllamaBackend {
    client: Client,
    host: String,
    keep_alive: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

impl OllamaBackend {
    pub fn new(config: &GenerativeConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self {
            client,
            host: config.host(),
            keep_alive: config.keep_alive.clone(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

/// `gemma3` matches an installed `gemma3:latest`.
fn model_matches(installed: &str, wanted: &str) -> bool {
    installed == wanted
        || (!wanted.contains(':') && installed == format!("{}:latest", wanted))
}

#[async_trait]
impl GenerativeBackend for OllamaBackend {
    async fn generate(&self, prompt: &str, model: &str, timeout: Duration) -> GenerateOutcome {
        let body = json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
            "keep_alive": self.keep_alive,
        });

        debug!("Generating with {} via {}", model, self.host);

        let response = match self
            .client
            .post(format!("{}/api/generate", self.host))
            .timeout(timeout)
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                return GenerateOutcome::Unavailable(format!("timed out after {:?}", timeout))
            }
            Err(e) => return GenerateOutcome::Unavailable(format!("request failed: {}", e)),
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return GenerateOutcome::Unavailable(format!("API error {}: {}", status, body));
        }

        match response.json::<GenerateResponse>().await {
            Ok(parsed) => GenerateOutcome::from_text(parsed.response),
            Err(e) => GenerateOutcome::Unavailable(format!("malformed response: {}", e)),
        }
    }

    async fn health_check(&self, model: &str) -> bool {
        let response = match self
            .client
            .get(format!("{}/api/tags", self.host))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!("Ollama health check returned {}", r.status());
                return false;
            }
            Err(e) => {
                warn!("Ollama unreachable at {}: {}", self.host, e);
                return false;
            }
        };

        match response.json::<TagsResponse>().await {
            Ok(tags) => tags.models.iter().any(|m| model_matches(&m.name, model)),
            Err(e) => {
                warn!("Unexpected /api/tags payload: {}", e);
                false
            }
        }
    }
}
