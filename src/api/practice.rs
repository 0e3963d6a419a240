use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::models::{PracticeRequest, PracticeSet};
use crate::state::AppState;

/// POST /practice - Practice problems for a topic (difficulty defaults to medium).
pub async fn generate_problems(
    State(state): State<AppState>,
    Json(req): Json<PracticeRequest>,
) -> Result<Json<PracticeSet>, ApiError> {
    let difficulty = req.difficulty.unwrap_or_default();
    let set = state
        .retrieval
        .generate_practice_problems(&req.topic, difficulty)
        .await?;
    Ok(Json(set))
}
