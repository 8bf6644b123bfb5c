//! HTTP surface tests: drive the router in-process with `oneshot` and check
//! response shapes, status codes and the stage-event stream.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use notetube_core::{
    ChannelProfile, DataPaths, Keyword, NoteTubeConfig, PipelineTuning, RawCandidate,
    VideoStatSnapshot,
};
use notetube_ingest::{ExtractionParams, FileExtractor, KeywordAdapter, KeywordExtractor};
use notetube_query::{GenerateOutcome, GenerativeBackend, GenerativeConfig, QuerySynthesizer};
use notetube_runtime::Pipeline;
use notetube_server::{build_router, AppState};
use notetube_video::{SearchRequest, VideoPlatform};
use tower::ServiceExt;

const BOUNDARY: &str = "notetube-test-boundary";

struct FixedKeywords;

impl KeywordExtractor for FixedKeywords {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn extract(&self, _text: &str, _params: &ExtractionParams) -> Vec<Keyword> {
        vec![Keyword::new("cpu", 0.9), Keyword::new("memory", 0.5)]
    }
}

struct EchoBackend;

#[async_trait]
impl GenerativeBackend for EchoBackend {
    async fn generate(&self, _prompt: &str, _model: &str, _timeout: Duration) -> GenerateOutcome {
        GenerateOutcome::from_text("cpu\nmemory")
    }

    async fn health_check(&self, _model: &str) -> bool {
        true
    }
}

struct CatalogPlatform {
    results: HashMap<String, Vec<RawCandidate>>,
}

impl CatalogPlatform {
    fn new() -> Self {
        let mut results = HashMap::new();
        results.insert("cpu".to_string(), vec![candidate("x"), candidate("y")]);
        results.insert("memory".to_string(), vec![candidate("x")]);
        Self { results }
    }
}

#[async_trait]
impl VideoPlatform for CatalogPlatform {
    async fn search(&self, request: &SearchRequest) -> notetube_video::Result<Vec<RawCandidate>> {
        Ok(self.results.get(&request.query).cloned().unwrap_or_default())
    }

    async fn channels_batch(&self, ids: &[String]) -> notetube_video::Result<Vec<ChannelProfile>> {
        Ok(ids
            .iter()
            .map(|id| ChannelProfile {
                channel_id: id.clone(),
                subscriber_count: 250_000,
                language: "en".into(),
            })
            .collect())
    }

    async fn videos_batch(&self, ids: &[String]) -> notetube_video::Result<Vec<VideoStatSnapshot>> {
        Ok(ids
            .iter()
            .map(|id| VideoStatSnapshot {
                video_id: id.clone(),
                like_count: if id == "y" { 4_000 } else { 2_000 },
                view_count: 100_000,
            })
            .collect())
    }
}

fn candidate(id: &str) -> RawCandidate {
    RawCandidate {
        video_id: id.into(),
        title: format!("Video {}", id),
        description: "lecture".into(),
        thumbnail_url: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id),
        channel_id: "edu".into(),
        url: RawCandidate::watch_url(id),
    }
}

fn test_app(dir: &tempfile::TempDir) -> Router {
    let tuning = PipelineTuning {
        max_queries: 2,
        ..Default::default()
    };
    let config = NoteTubeConfig {
        port: 0,
        data_paths: DataPaths::new(dir.path()).unwrap(),
        tuning: tuning.clone(),
        youtube_api_key: None,
        cors_origin: None,
    };
    let keywords = KeywordAdapter::with_extractor(Box::new(FixedKeywords), "it");
    let synthesizer =
        QuerySynthesizer::new(Arc::new(EchoBackend), "gemma3:4b", Duration::from_secs(5));
    let pipeline = Pipeline::new(
        Arc::new(FileExtractor::new()),
        Arc::new(keywords),
        Arc::new(synthesizer),
        Arc::new(CatalogPlatform::new()),
        tuning,
    );
    let state = AppState::new(config, GenerativeConfig::default(), pipeline);
    build_router(Arc::new(state))
}

/// Hand-built multipart body. Each part is (name, optional filename, content).
fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
    let mut body = String::new();
    for (name, filename, content) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match filename {
            Some(f) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                name, f
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                name
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

fn process_request(uri: &str, parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_aggregate_response_shape() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(process_request(
            "/api/process",
            &[("text", None, "The CPU reads instructions from memory.")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["keywords"], serde_json::json!(["cpu", "memory"]));
    assert_eq!(json["queries"], serde_json::json!(["cpu", "memory"]));

    let videos = json["videos"].as_array().unwrap();
    let ids: Vec<&str> = videos.iter().map(|v| v["video_id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["y", "x"]);
    assert_eq!(videos[0]["engagement_score"], 1.0);
    assert_eq!(videos[1]["engagement_score"], 0.5);
    assert!(videos[0]["thumbnail"].is_string());
    assert!(videos[0]["channel_subscribers"].is_number());
}

#[tokio::test]
async fn test_empty_text_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(process_request("/api/process", &[("text", None, "   ")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "no text provided");
}

#[tokio::test]
async fn test_unsupported_file_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(process_request(
            "/api/process",
            &[("file", Some("setup.exe"), "MZ binary")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("unsupported file format"));
}

#[tokio::test]
async fn test_non_multipart_body_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let request = Request::builder()
        .method("POST")
        .uri("/api/process")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"text": "cpu"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_truncated_stream_field_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    // The stream part never reaches a closing boundary.
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"text\"\r\n\r\ncpu memory\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"stream\"\r\n\r\ntru",
        b = BOUNDARY
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/process")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_stream_form_field_emits_ndjson() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(process_request(
            "/api/process",
            &[
                ("file", Some("notes.txt"), "Registers, cache and main memory."),
                ("stream", None, "true"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/x-ndjson"
    );

    let body = body_string(response).await;
    let events: Vec<serde_json::Value> = body
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let statuses: Vec<&str> = events.iter().map(|e| e["status"].as_str().unwrap()).collect();
    assert_eq!(
        statuses,
        vec![
            "file_received",
            "file_processed",
            "extracting_keywords",
            "keywords_extracted",
            "generating_queries",
            "queries_generated",
            "youtube_search_started",
            "youtube_search_completed",
            "processing_complete",
        ]
    );
    assert_eq!(events[0]["filename"], "notes.txt");
    let last = events.last().unwrap();
    assert_eq!(last["videos"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_stream_query_param_reports_error_event() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(process_request("/api/process?stream=1", &[("text", None, "")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 1);
    let event: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(event["status"], "error");
    assert_eq!(event["message"], "no text provided");
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let response = get(test_app(&dir), "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["generative"]["available"], true);
    assert_eq!(json["generative"]["model"], "gemma3:4b");
    assert_eq!(json["video_api_key_configured"], false);
}

#[tokio::test]
async fn test_about() {
    let dir = tempfile::tempdir().unwrap();
    let json = body_json(get(test_app(&dir), "/api/about").await).await;

    assert_eq!(json["name"], "NoteTube");
    assert_eq!(json["keyword_algorithm"], "fixed");
    assert_eq!(json["tuning"]["max_queries"], 2);
    assert_eq!(json["tuning"]["top_k"], 10);
}

#[tokio::test]
async fn test_requests_are_logged() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .clone()
        .oneshot(process_request("/api/process", &[("text", None, "cpu memory")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_string(response).await;

    // The log line is written off the request path.
    let mut entries = Vec::new();
    for _ in 0..50 {
        let json = body_json(get(app.clone(), "/api/logs?lines=10").await).await;
        entries = json["entries"].as_array().cloned().unwrap_or_default();
        if !entries.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["mode"], "aggregate");
    assert_eq!(entries[0]["outcome"], "ok");
    assert_eq!(entries[0]["videos"], 2);
    assert_eq!(entries[0]["queries"], serde_json::json!(["cpu", "memory"]));
}

#[tokio::test]
async fn test_logs_empty() {
    let dir = tempfile::tempdir().unwrap();
    let json = body_json(get(test_app(&dir), "/api/logs").await).await;
    assert_eq!(json["total"], 0);
    assert!(json["entries"].as_array().unwrap().is_empty());
}
