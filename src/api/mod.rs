//! API Module
//!
//! HTTP handlers and routing for the cache admin REST API.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache statistics
//! - `POST /lookup`, `PUT /entries`, `DELETE /entries` - Single entries
//! - `POST /invalidate`, `DELETE /invalidate/:category` - Bulk invalidation
//! - `POST /cleanup` - Purge expired entries

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
