use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::extractors::LenientJson;
use crate::models::exercise::ExerciseRequest;
use crate::services::AppState;

pub async fn generate_exercises(
    State(state): State<Arc<AppState>>,
    LenientJson(req): LenientJson<ExerciseRequest>,
) -> impl IntoResponse {
    let count = req.count();
    Json(state.exercise_service().generate(count).await)
}
