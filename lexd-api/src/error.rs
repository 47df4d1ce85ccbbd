//! Error types for lexd-api

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// External call exceeded its deadline (504)
    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    /// Completion response carried no usable JSON (502)
    #[error("Generation unparsable: {0}")]
    GenerationUnparsable(String),

    /// Import failed partway (500)
    #[error("Import failed for '{word}': {reason}")]
    ImportFailed { word: String, reason: String },

    /// Persistence layer failure (500)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<lexd_common::Error> for ApiError {
    fn from(err: lexd_common::Error) -> Self {
        match err {
            lexd_common::Error::NotFound(msg) => ApiError::NotFound(msg),
            lexd_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            lexd_common::Error::UpstreamTimeout(msg) => ApiError::UpstreamTimeout(msg),
            lexd_common::Error::GenerationUnparsable(msg) => ApiError::GenerationUnparsable(msg),
            lexd_common::Error::ImportFailed { word, reason } => {
                ApiError::ImportFailed { word, reason }
            }
            lexd_common::Error::Database(e) => ApiError::Storage(e.to_string()),
            lexd_common::Error::Io(e) => ApiError::Storage(e.to_string()),
            lexd_common::Error::Config(msg) => ApiError::Internal(msg),
            lexd_common::Error::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::UpstreamTimeout(msg) => {
                (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT", msg)
            }
            ApiError::GenerationUnparsable(msg) => {
                (StatusCode::BAD_GATEWAY, "GENERATION_UNPARSABLE", msg)
            }
            ApiError::ImportFailed { word, reason } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IMPORT_FAILED",
                format!("{}: {}", word, reason),
            ),
            ApiError::Storage(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
