//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Expiry sweep: Removes expired cache entries at the configured interval

mod sweep;

pub use sweep::spawn_sweep_task;
