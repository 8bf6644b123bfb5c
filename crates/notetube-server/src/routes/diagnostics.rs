//! Diagnostics routes: health, request log tail, about.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::warn;

use crate::state::AppState;

const DEFAULT_LOG_LINES: usize = 50;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/logs", get(logs))
        .route("/about", get(about))
}

/// GET /api/health
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let synthesizer = state.pipeline.synthesizer();
    let available = synthesizer.health_check().await;

    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "generative": {
            "host": state.generative.host(),
            "model": synthesizer.model(),
            "available": available,
        },
        "video_api_key_configured": state.video_api_key_configured(),
    }))
}

#[derive(Debug, Deserialize)]
struct LogsQuery {
    lines: Option<usize>,
}

/// GET /api/logs?lines=N
async fn logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogsQuery>,
) -> impl IntoResponse {
    let lines = query
        .lines
        .unwrap_or(DEFAULT_LOG_LINES)
        .min(state.config.tuning.log_max_lines);

    let log = Arc::clone(&state.request_log);
    let result = tokio::task::spawn_blocking(move || log.tail(lines)).await;

    match result {
        Ok(Ok(entries)) => {
            let total = entries.len();
            Json(serde_json::json!({ "entries": entries, "total": total })).into_response()
        }
        Ok(Err(e)) => {
            warn!("Failed to read request log: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": format!("could not read request log: {}", e) })),
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": format!("log reader failed: {}", e) })),
        )
            .into_response(),
    }
}

/// GET /api/about
async fn about(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "NoteTube",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Turns study notes into a ranked list of educational videos.",
        "keyword_algorithm": state.pipeline.keyword_algorithm(),
        "tuning": state.pipeline.tuning(),
    }))
}
