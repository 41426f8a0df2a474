//! Metrics Cache - In-process cache for dashboard metric responses
//!
//! Caches responses keyed by endpoint and parameters, with per-entry TTL,
//! least-hit eviction, a background expiry sweep and pattern invalidation.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{DataCategory, MetricsCache, TtlCategory};
pub use config::Config;
pub use error::CacheError;
pub use fetch::Fetched;
