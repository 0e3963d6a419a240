use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::models::{GradeRequest, GradeResult};
use crate::state::AppState;

/// POST /grade
pub async fn grade_answer(
    State(state): State<AppState>,
    Json(req): Json<GradeRequest>,
) -> Result<Json<GradeResult>, ApiError> {
    let graded = state
        .retrieval
        .grade_answer(
            &req.question,
            &req.student_answer,
            req.reference_answer.as_deref(),
        )
        .await?;
    Ok(Json(graded))
}
