//! Error types for the metrics cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the metrics cache.
///
/// Fetch failures from a caller-supplied fetch function are never wrapped
/// here; `cached_fetch` hands them back unchanged.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Parameters could not be turned into a canonical key
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Endpoint identifier or derived key is unusable
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalidation pattern failed to compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// No entry stored under the key
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidParams(_)
            | CacheError::InvalidKey(_)
            | CacheError::InvalidPattern(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the metrics cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CacheError::InvalidParams("x".into()), StatusCode::BAD_REQUEST),
            (CacheError::InvalidKey("x".into()), StatusCode::BAD_REQUEST),
            (CacheError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (CacheError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_invalid_pattern_from_regex_error() {
        #[allow(clippy::invalid_regex)]
        let err: CacheError = regex::Regex::new("(unclosed").unwrap_err().into();
        assert!(matches!(err, CacheError::InvalidPattern(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
