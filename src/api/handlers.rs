//! API Handlers
//!
//! HTTP request handlers for each cache admin endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use std::time::Duration;

use crate::cache::{derive_key, CacheStats, DataCategory, MetricsCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    EntryRequest, EntryResponse, HealthResponse, InvalidateRequest, LookupResponse,
    RemovedResponse, StoreRequest,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache handle
    pub cache: MetricsCache,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: MetricsCache) -> Self {
        Self { cache }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(MetricsCache::new(config))
    }
}

/// Handler for POST /lookup
///
/// Returns the cached payload for an endpoint and its parameters.
pub async fn lookup_handler(
    State(state): State<AppState>,
    Json(req): Json<EntryRequest>,
) -> Result<Json<LookupResponse>> {
    let key = derive_key(&req.endpoint, &req.params)?;

    match state.cache.get_by_key(&key).await {
        Some(payload) => Ok(Json(LookupResponse::new(key, payload))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for PUT /entries
///
/// Caches a response body with an explicit or category lifetime.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<EntryResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidParams(error_msg));
    }

    let ttl = match (req.ttl_ms, req.category) {
        (Some(ms), None) => Duration::from_millis(ms),
        (None, Some(category)) => state.cache.ttl_for(category),
        (None, None) => {
            return Err(CacheError::InvalidParams(
                "Either ttl_ms or category is required".to_string(),
            ))
        }
        (Some(_), Some(_)) => {
            return Err(CacheError::InvalidParams(
                "Specify only one of ttl_ms and category".to_string(),
            ))
        }
    };

    let key = derive_key(&req.endpoint, &req.params)?;
    state.cache.set_by_key(key.clone(), req.payload, ttl).await;

    Ok(Json(EntryResponse::stored(key)))
}

/// Handler for DELETE /entries
pub async fn delete_handler(
    State(state): State<AppState>,
    Json(req): Json<EntryRequest>,
) -> Result<Json<EntryResponse>> {
    let key = derive_key(&req.endpoint, &req.params)?;

    if state.cache.delete_by_key(&key).await {
        Ok(Json(EntryResponse::deleted(key)))
    } else {
        Err(CacheError::NotFound(key))
    }
}

/// Handler for POST /invalidate
///
/// Removes every entry whose key matches a regular expression.
pub async fn invalidate_pattern_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<RemovedResponse>> {
    let removed = state.cache.invalidate_by_pattern(&req.pattern).await?;
    Ok(Json(RemovedResponse { removed }))
}

/// Handler for DELETE /invalidate/:category
///
/// `all` removes every entry; any other value must name a data category.
pub async fn invalidate_category_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<RemovedResponse>> {
    let removed = if category.eq_ignore_ascii_case("all") {
        state.cache.invalidate_all().await
    } else {
        let category: DataCategory = category.parse()?;
        state.cache.invalidate_category(category).await?
    };

    Ok(Json(RemovedResponse { removed }))
}

/// Handler for POST /cleanup
///
/// Purges expired entries without waiting for the sweep.
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.cache.clear_expired().await;
    Json(RemovedResponse { removed })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats().await)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
