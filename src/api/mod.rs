//! Axum HTTP handlers and the router that wires them.

pub mod grade;
pub mod health;
pub mod practice;
pub mod search;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/search", post(search::search))
        .route("/learn/{topic}", post(search::learn_topic))
        .route("/practice", post(practice::generate_problems))
        .route("/grade", post(grade::grade_answer))
        .with_state(state)
        .layer(cors)
}

/// Allow the configured frontend origin with credentials.
fn cors_layer(origin: &str) -> CorsLayer {
    // Credentials cannot be combined with wildcard methods/headers, so mirror them.
    let layer = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(AllowOrigin::exact(value)),
        Err(e) => {
            tracing::warn!("Ignoring invalid CORS origin {origin:?}: {e}");
            layer
        }
    }
}
