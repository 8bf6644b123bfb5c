//! Shared application state.

use std::sync::Arc;

use notetube_core::NoteTubeConfig;
use notetube_query::GenerativeConfig;
use notetube_runtime::Pipeline;

use crate::request_log::RequestLog;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: NoteTubeConfig,
    pub generative: GenerativeConfig,
    pub pipeline: Arc<Pipeline>,
    pub request_log: Arc<RequestLog>,
}

impl AppState {
    pub fn new(config: NoteTubeConfig, generative: GenerativeConfig, pipeline: Pipeline) -> Self {
        let request_log = RequestLog::new(
            &config.data_paths.request_log,
            config.tuning.log_max_lines,
        );
        Self {
            config,
            generative,
            pipeline: Arc::new(pipeline),
            request_log: Arc::new(request_log),
        }
    }

    pub fn video_api_key_configured(&self) -> bool {
        self.config.youtube_api_key.is_some()
    }
}
