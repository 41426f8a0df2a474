//! Request DTOs for the cache admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::TtlCategory;

/// Identifies one cached response (POST /lookup, DELETE /entries)
#[derive(Debug, Clone, Deserialize)]
pub struct EntryRequest {
    /// Endpoint identifier, e.g. `dashboard/overview`
    pub endpoint: String,
    /// Query parameters; omitted means none
    #[serde(default)]
    pub params: Value,
}

/// Request body for storing a response (PUT /entries)
///
/// Exactly one of `ttl_ms` and `category` selects the lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    pub endpoint: String,
    #[serde(default)]
    pub params: Value,
    /// The response body to cache
    pub payload: Value,
    /// Explicit lifetime in milliseconds
    #[serde(default)]
    pub ttl_ms: Option<u64>,
    /// Named lifetime class
    #[serde(default)]
    pub category: Option<TtlCategory>,
}

impl StoreRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid. The
    /// lifetime choice is checked where it is resolved, in the store handler.
    pub fn validate(&self) -> Option<String> {
        if self.endpoint.is_empty() {
            return Some("Endpoint cannot be empty".to_string());
        }
        None
    }
}

/// Request body for pattern invalidation (POST /invalidate)
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    /// Regular expression matched against cache keys
    pub pattern: String,
}
