//! Submission route: runs the discovery pipeline on uploaded notes.
//!
//! `POST /api/process` takes a multipart form with an optional `file`, an
//! optional `text` and an optional `stream` flag. Aggregate mode answers with
//! one JSON object; stream mode answers with newline-delimited stage events.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use notetube_core::StageEvent;
use notetube_runtime::{NullSink, PipelineError, PipelineInput, PipelineResult, ProcessResponse, UploadedFile};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use crate::request_log::{Outcome, RequestLogEntry};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/process", post(process))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProcessQuery {
    stream: Option<String>,
}

/// Parsed submission form.
#[derive(Debug, Default)]
struct ProcessForm {
    file: Option<UploadedFile>,
    text: Option<String>,
    stream: bool,
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

async fn read_form(mut multipart: Multipart) -> Result<ProcessForm, String> {
    let mut form = ProcessForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("invalid form data: {}", e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("could not read upload: {}", e))?;
                // Browsers send an empty part when no file was chosen.
                if !filename.is_empty() || !bytes.is_empty() {
                    form.file = Some(UploadedFile {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "text" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| format!("invalid text field: {}", e))?;
                form.text = Some(text);
            }
            "stream" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("invalid stream field: {}", e))?;
                form.stream = is_truthy(&value);
            }
            other => debug!("Ignoring form field '{}'", other),
        }
    }
    Ok(form)
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message.into() })),
    )
        .into_response()
}

/// Fill the log entry from a finished run.
fn finish_entry(
    entry: &mut RequestLogEntry,
    outcome: &Result<PipelineResult, PipelineError>,
    started: Instant,
) {
    entry.duration_ms = started.elapsed().as_millis() as u64;
    match outcome {
        Ok(result) => {
            entry.outcome = Outcome::Ok;
            entry.keywords = result.keywords.iter().map(|k| k.phrase.clone()).collect();
            entry.queries = result.queries.clone();
            entry.videos = result.videos.len();
        }
        Err(PipelineError::Cancelled) => entry.outcome = Outcome::Cancelled,
        Err(e) => {
            entry.outcome = Outcome::Error;
            entry.error = Some(e.to_string());
        }
    }
}

/// POST /api/process
async fn process(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProcessQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let started = Instant::now();

    let multipart = match multipart {
        Ok(m) => m,
        Err(e) => return bad_request(format!("expected multipart/form-data: {}", e.body_text())),
    };
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(message) => return bad_request(message),
    };

    let stream = form.stream || query.stream.as_deref().map(is_truthy).unwrap_or(false);
    let mode = if stream { "stream" } else { "aggregate" };
    let filename = form.file.as_ref().map(|f| f.filename.clone());
    let text_chars = form.text.as_deref().map(|t| t.chars().count()).unwrap_or(0);
    info!(
        "Process request: mode={}, file={:?}, text_chars={}",
        mode, filename, text_chars
    );

    let input = PipelineInput {
        file: form.file,
        text: form.text,
    };
    let entry = RequestLogEntry::new(mode, filename, text_chars);

    if stream {
        stream_response(state, input, entry, started)
    } else {
        aggregate_response(state, input, entry, started).await
    }
}

async fn aggregate_response(
    state: Arc<AppState>,
    input: PipelineInput,
    mut entry: RequestLogEntry,
    started: Instant,
) -> Response {
    let outcome = state.pipeline.run(input, &mut NullSink).await;
    finish_entry(&mut entry, &outcome, started);

    let response = match outcome {
        Ok(result) => Json(ProcessResponse::from(result)).into_response(),
        Err(PipelineError::Input(message)) => bad_request(message),
        Err(e) => {
            error!("Pipeline failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    };

    state.request_log.record(entry);
    response
}

fn stream_response(
    state: Arc<AppState>,
    input: PipelineInput,
    mut entry: RequestLogEntry,
    started: Instant,
) -> Response {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<StageEvent>();
    let (done_tx, done_rx) = tokio::sync::oneshot::channel::<RequestLogEntry>();

    let pipeline = Arc::clone(&state.pipeline);
    let request_log = Arc::clone(&state.request_log);
    tokio::spawn(async move {
        let mut tx = tx;
        let outcome = pipeline.run(input, &mut tx).await;
        if let Err(PipelineError::Internal(message)) = &outcome {
            error!("Pipeline failed: {}", message);
            if let Ok(event) = StageEvent::error(message.clone()) {
                let _ = tx.send(event);
            }
        }
        drop(tx);

        finish_entry(&mut entry, &outcome, started);
        if matches!(outcome, Err(PipelineError::Cancelled)) {
            request_log.record(entry);
        } else if let Err(entry) = done_tx.send(entry) {
            // Body already gone.
            request_log.record(entry);
        }
    });

    // The log line is written once the last event has been handed to the
    // connection.
    let request_log = Arc::clone(&state.request_log);
    let body = async_stream::stream! {
        while let Some(event) = rx.recv().await {
            yield Ok::<_, Infallible>(event.to_json_line());
        }
        if let Ok(entry) = done_rx.await {
            request_log.record(entry);
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(body))
        .unwrap_or_else(|e| {
            error!("Failed to build streaming response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}
