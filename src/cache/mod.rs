//! Cache Module
//!
//! Provides in-memory caching of metric responses with TTL expiration and
//! least-hit eviction.

mod category;
mod clock;
mod entry;
mod eviction;
mod key;
mod metrics_cache;
mod stats;
mod store;


// Re-export public types
pub use category::{DataCategory, TtlCategory, TtlDefaults};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::derive_key;
pub use metrics_cache::MetricsCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed derived key length in bytes
pub const MAX_KEY_LENGTH: usize = 2048;
