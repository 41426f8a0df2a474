//! API Routes
//!
//! Configures the Axum router with all cache admin endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cleanup_handler, delete_handler, health_handler, invalidate_category_handler,
    invalidate_pattern_handler, lookup_handler, stats_handler, store_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /stats` - Cache statistics
/// - `POST /lookup` - Read a cached response
/// - `PUT /entries` - Cache a response
/// - `DELETE /entries` - Drop one cached response
/// - `POST /invalidate` - Drop entries matching a pattern
/// - `DELETE /invalidate/:category` - Drop a data category, or `all`
/// - `POST /cleanup` - Purge expired entries now
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/lookup", post(lookup_handler))
        .route("/entries", delete(delete_handler).put(store_handler))
        .route("/invalidate", post(invalidate_pattern_handler))
        .route("/invalidate/:category", delete(invalidate_category_handler))
        .route("/cleanup", post(cleanup_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
