use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::models::{LearnResponse, SearchQuery, SearchResult, Topic};
use crate::state::AppState;

/// POST /search - Answer a question across every topic.
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchQuery>,
) -> Result<Json<SearchResult>, ApiError> {
    let result = state.retrieval.search(&req.query, None).await?;
    Ok(Json(result))
}

/// POST /learn/{topic} - Answer a question within one topic.
///
/// An unknown topic is not an HTTP error: the body carries an `error` field
/// listing the topics that do exist.
pub async fn learn_topic(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    Json(req): Json<SearchQuery>,
) -> Result<Json<LearnResponse>, ApiError> {
    let topics = state.retrieval.topics();
    let known = topic.parse::<Topic>().ok().filter(|t| topics.contains(t));

    let Some(known) = known else {
        let available: Vec<&str> = topics.iter().map(Topic::as_str).collect();
        tracing::info!("Rejected unknown topic {topic}");
        return Ok(Json(LearnResponse::UnknownTopic {
            error: format!(
                "Topic {topic} not found. Available topics: {}",
                available.join(", ")
            ),
        }));
    };

    let result = state.retrieval.search(&req.query, Some(known)).await?;
    Ok(Json(LearnResponse::Answer(result)))
}
