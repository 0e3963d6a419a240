use axum::Json;

use crate::models::HealthCheck;

/// API version reported by the health check. Independent of the crate version.
pub const API_VERSION: &str = "0.1.0";

/// GET /health
pub async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "healthy".to_string(),
        version: API_VERSION.to_string(),
    })
}
