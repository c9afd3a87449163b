use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::extractors::LenientJson;
use crate::models::hint::{MatchHintRequest, MathHintRequest, SyllableHintRequest};
use crate::services::AppState;

pub async fn syllable_hint(
    State(state): State<Arc<AppState>>,
    LenientJson(req): LenientJson<SyllableHintRequest>,
) -> impl IntoResponse {
    Json(state.hint_service().syllable_hint(&req).await)
}

pub async fn match_hint(
    State(state): State<Arc<AppState>>,
    LenientJson(req): LenientJson<MatchHintRequest>,
) -> impl IntoResponse {
    Json(state.hint_service().match_hint(&req).await)
}

pub async fn math_hint(
    State(state): State<Arc<AppState>>,
    LenientJson(req): LenientJson<MathHintRequest>,
) -> impl IntoResponse {
    Json(state.hint_service().math_hint(&req).await)
}
