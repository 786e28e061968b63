//! Error types for the cache server
//!
//! Provides unified error handling using thiserror. Engine-level absence and
//! rejection are sentinels, not errors; this taxonomy covers the boundary
//! failures the transports surface to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache server.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid request data (missing or malformed identifier fields)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Value exceeds the configured entry size ceiling
    #[error("Value too large: {0}")]
    ValueTooLarge(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::ValueTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            CacheError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
