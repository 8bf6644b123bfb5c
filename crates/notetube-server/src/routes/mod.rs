//! HTTP route handlers.

pub mod diagnostics;
pub mod process;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.tuning.max_upload_mb.max(1) * 1024 * 1024;
    let cors = cors_layer(state.config.cors_origin.as_deref());

    Router::new()
        .nest("/api", api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(process::routes())
        .merge(diagnostics::routes())
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    match origin {
        None => CorsLayer::permissive(),
        Some(origin) => match HeaderValue::from_str(origin) {
            Ok(value) => CorsLayer::new()
                .allow_origin(value)
                .allow_methods(Any)
                .allow_headers(Any),
            Err(_) => {
                warn!("Invalid CORS_ORIGIN '{}', allowing any origin", origin);
                CorsLayer::permissive()
            }
        },
    }
}
