use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::metrics;

/// Liveness probe. Does not touch the completion provider.
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "ok": true })))
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

pub mod exercises;
pub mod hints;
