//! Response DTOs for the cache admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

/// Response body for a cache lookup (POST /lookup)
#[derive(Debug, Clone, Serialize)]
pub struct LookupResponse {
    /// The derived cache key
    pub key: String,
    /// The cached response body
    pub payload: Value,
}

impl LookupResponse {
    pub fn new(key: impl Into<String>, payload: Value) -> Self {
        Self {
            key: key.into(),
            payload,
        }
    }
}

/// Response body for storing and deleting entries (PUT/DELETE /entries)
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    /// Success message
    pub message: String,
    /// The derived cache key
    pub key: String,
}

impl EntryResponse {
    /// Creates a response for a stored entry
    pub fn stored(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' cached successfully", key),
            key,
        }
    }

    /// Creates a response for a deleted entry
    pub fn deleted(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for bulk removals (invalidate, cleanup)
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResponse {
    /// Number of entries removed
    pub removed: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
