//! Error types for configuration, topic parsing, the vendor boundary and
//! HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Startup configuration problems. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("please set the ABACUS_API_KEY environment variable")]
    MissingApiKey,

    #[error("unknown backend '{0}' (expected 'live' or 'placeholder')")]
    InvalidBackend(String),

    #[error("{var} must be a non-negative integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be a boolean, got '{value}'")]
    InvalidBool { var: &'static str, value: String },
}

/// Errors that can occur when calling the vendor API.
#[derive(Debug, Error)]
pub enum VendorError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with a non-success HTTP status.
    #[error("API error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    /// The envelope came back with `success: false`.
    #[error("{method} failed: {message}")]
    Rejected { method: String, message: String },

    /// The body did not match the expected envelope.
    #[error("malformed {method} response: {message}")]
    Malformed { method: String, message: String },
}

/// A topic name outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown topic: {0}")]
pub struct UnknownTopic(pub String);

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Internal(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{err:#}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.to_string();
        tracing::error!("Request failed: {detail}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "detail": detail })),
        )
            .into_response()
    }
}
