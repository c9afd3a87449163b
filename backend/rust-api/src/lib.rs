use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;

pub use config::Config;
pub use services::AppState;

/// CORS restricted to the single configured frontend origin, GET and POST only.
/// Other origins get no `Access-Control-Allow-Origin` header at all.
fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let origin = match allowed_origin.parse::<HeaderValue>() {
        Ok(_) if allowed_origin == "*" => {
            tracing::warn!("CORS origin is a wildcard, any site may call the API");
            AllowOrigin::any()
        }
        Ok(origin) => AllowOrigin::list([origin]),
        Err(e) => {
            tracing::error!(
                "Invalid CORS origin {:?}, cross-origin requests will be refused: {}",
                allowed_origin,
                e
            );
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(AllowHeaders::mirror_request())
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = cors_layer(&app_state.config.allowed_origin);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .nest("/api", api_routes())
        .with_state(app_state)
        .layer(cors)
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/hint", post(handlers::hints::syllable_hint))
        .route("/exercises", post(handlers::exercises::generate_exercises))
        .route("/match/hint", post(handlers::hints::match_hint))
        .route("/math/hint", post(handlers::hints::math_hint))
}
