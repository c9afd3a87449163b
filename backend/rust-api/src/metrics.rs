use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

use crate::services::fallback::{Endpoint, FallbackReason};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Completion provider metrics
    pub static ref UPSTREAM_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "upstream_requests_total",
        "Total number of completion API calls",
        &["endpoint", "outcome"]
    )
    .unwrap();

    pub static ref UPSTREAM_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "upstream_request_duration_seconds",
        "Completion API latency in seconds",
        &["endpoint"],
        vec![0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]
    )
    .unwrap();

    // Degraded responses
    pub static ref FALLBACKS_SERVED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "fallbacks_served_total",
        "Total number of static fallback responses",
        &["endpoint", "reason"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: time a completion call and count its outcome
pub async fn track_upstream_call<F, E>(endpoint: Endpoint, future: F) -> Result<String, E>
where
    F: std::future::Future<Output = Result<String, E>>,
{
    let start = std::time::Instant::now();
    let result = future.await;
    let duration = start.elapsed().as_secs_f64();

    let outcome = match &result {
        Ok(text) if text.trim().is_empty() => "empty",
        Ok(_) => "ok",
        Err(_) => "error",
    };

    UPSTREAM_REQUESTS_TOTAL
        .with_label_values(&[endpoint.label(), outcome])
        .inc();

    UPSTREAM_REQUEST_DURATION_SECONDS
        .with_label_values(&[endpoint.label()])
        .observe(duration);

    result
}

/// Record a fallback substitution
pub fn record_fallback(endpoint: Endpoint, reason: FallbackReason) {
    FALLBACKS_SERVED_TOTAL
        .with_label_values(&[endpoint.label(), reason.label()])
        .inc();
}
