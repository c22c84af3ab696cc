//! Integration tests for the HTTP endpoints.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::StreamExt;
use reform_core::{
    ChatMessage, ContentStream, Embedder, LLMClient, Pipeline, QueryResult, ReformError, Result,
    Settings, VectorIndex,
};
use std::sync::Arc;
use tower::ServiceExt;

struct StaticEmbedder;

#[async_trait]
impl Embedder for StaticEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![0.0, 1.0])
    }

    fn model_name(&self) -> &str {
        "static"
    }
}

struct StaticIndex;

#[async_trait]
impl VectorIndex for StaticIndex {
    async fn query(&self, _collection: &str, _embedding: &[f32], _top_k: usize) -> Result<QueryResult> {
        Ok(QueryResult::single(
            vec!["Walls were painted white.".to_string()],
            vec![0.1],
        ))
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

struct ScriptedLlm {
    fragments: Vec<&'static str>,
    fail_midway: bool,
}

#[async_trait]
impl LLMClient for ScriptedLlm {
    async fn chat_completion(
        &self,
        _messages: &[ChatMessage],
        _model: &str,
        _temperature: f32,
    ) -> Result<String> {
        Ok(self.fragments.concat())
    }

    async fn chat_stream(
        &self,
        _messages: &[ChatMessage],
        _model: &str,
        _temperature: f32,
    ) -> Result<ContentStream> {
        let mut items: Vec<Result<String>> =
            self.fragments.iter().map(|f| Ok(f.to_string())).collect();
        if self.fail_midway {
            items.push(Err(ReformError::ExternalError("connection reset".into())));
        }
        Ok(futures::stream::iter(items).boxed())
    }
}

fn app_with(fragments: Vec<&'static str>, fail_midway: bool) -> axum::Router {
    let pipeline = Pipeline::new(
        Arc::new(Settings::default()),
        Arc::new(StaticEmbedder),
        Arc::new(StaticIndex),
        Arc::new(ScriptedLlm {
            fragments,
            fail_midway,
        }),
    );
    reform_server::router(Arc::new(pipeline))
}

fn app() -> axum::Router {
    app_with(vec!["Improved:", " ", " Walls painted."], false)
}

fn post_raw(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/reform-description")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json(body: serde_json::Value) -> Request<Body> {
    post_raw(&body.to_string())
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, String, String) {
    let resp = app.oneshot(request).await.unwrap();
    let status = resp.status();
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = axum::body::to_bytes(resp.into_body(), 1_000_000)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_missing_prompt_is_bad_request() {
    for body in [
        serde_json::json!({}),
        serde_json::json!({ "use_streaming": true }),
    ] {
        let (status, _, text) = send(app(), post_json(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["error"], "No prompt provided");
    }
}

#[tokio::test]
async fn test_empty_prompt_reaches_validation() {
    let body = serde_json::json!({ "prompt": "" });
    let (status, _, text) = send(app(), post_json(body)).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        json["content"],
        "Validation error: Input too short (minimum 5 characters)"
    );
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (status, _, text) = send(app(), post_raw("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(text.contains("No prompt provided"));
}

#[tokio::test]
async fn test_blocking_returns_content() {
    let body = serde_json::json!({ "prompt": "paint the walls" });
    let (status, content_type, text) = send(app(), post_json(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("application/json"));
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["content"], "Improved:  Walls painted.");
}

#[tokio::test]
async fn test_blocking_validation_error_is_content() {
    let body = serde_json::json!({ "prompt": "abc" });
    let (status, _, text) = send(app(), post_json(body)).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        json["content"],
        "Validation error: Input too short (minimum 5 characters)"
    );
}

#[tokio::test]
async fn test_streaming_events_skip_whitespace_and_end_with_done() {
    let body = serde_json::json!({ "prompt": "paint the walls", "use_streaming": true });
    let (status, content_type, text) = send(app(), post_json(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(
        text,
        "data: {\"content\":\"Improved:\"}\n\n\
         data: {\"content\":\" Walls painted.\"}\n\n\
         data: {\"done\":true}\n\n"
    );
}

#[tokio::test]
async fn test_streaming_failure_ends_with_error_then_done() {
    let app = app_with(vec!["Improved:"], true);
    let body = serde_json::json!({ "prompt": "paint the walls", "use_streaming": true });
    let (status, _, text) = send(app, post_json(body)).await;
    assert_eq!(status, StatusCode::OK);

    let events: Vec<&str> = text.split("\n\n").filter(|e| !e.is_empty()).collect();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], "data: {\"content\":\"Improved:\"}");
    assert!(events[1].starts_with("data: {\"content\":\"Error: "));
    assert_eq!(events[2], "data: {\"done\":true}");
}

#[tokio::test]
async fn test_streaming_validation_error_is_single_event() {
    let body = serde_json::json!({ "prompt": "ab", "use_streaming": true });
    let (_, _, text) = send(app(), post_json(body)).await;
    assert!(text.starts_with("data: {\"content\":\"Validation error: "));
    assert!(text.ends_with("data: {\"done\":true}\n\n"));
}

#[tokio::test]
async fn test_cors_headers_present() {
    let request = Request::builder()
        .uri("/health")
        .header("origin", "http://example.com")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(request).await.unwrap();
    assert!(resp
        .headers()
        .contains_key("access-control-allow-origin"));
}
