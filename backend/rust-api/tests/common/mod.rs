#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tower::ServiceExt;

use literacy_hint_gateway::{
    config::Config,
    create_router,
    services::completion_client::{CompletionClient, CompletionError, CompletionRequest},
    AppState,
};

pub const FRONTEND_ORIGIN: &str = "https://proyectotesis.netlify.app";

/// Completion client that always answers with the same text.
pub struct ReplyClient {
    pub reply: String,
    pub calls: AtomicUsize,
}

#[async_trait]
impl CompletionClient for ReplyClient {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Completion client that always fails like an unreachable provider.
pub struct FailingClient;

#[async_trait]
impl CompletionClient for FailingClient {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        Err(CompletionError::Network("connection refused".to_string()))
    }
}

pub fn test_config() -> Config {
    Config {
        allowed_origin: FRONTEND_ORIGIN.to_string(),
        ..Config::default()
    }
}

pub fn create_test_app(client: Arc<dyn CompletionClient>) -> Router {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    create_router(Arc::new(AppState::with_client(test_config(), client)))
}

pub fn replying_app(reply: &str) -> Router {
    create_test_app(Arc::new(ReplyClient {
        reply: reply.to_string(),
        calls: AtomicUsize::new(0),
    }))
}

pub fn failing_app() -> Router {
    create_test_app(Arc::new(FailingClient))
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    read_json(response).await
}

pub async fn read_json(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "Response is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&body)
        )
    });
    (status, json)
}
