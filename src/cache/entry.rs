//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use serde_json::Value;

// == Cache Entry ==
/// A cached response payload with its expiry and usage metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached response body
    pub payload: Value,
    /// Insertion timestamp (clock milliseconds)
    pub created_at: u64,
    /// Lifetime fixed at insertion
    pub ttl: Duration,
    /// Successful reads since insertion; the eviction signal
    pub hit_count: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a fresh entry stamped at `now_ms` with a zero hit count.
    ///
    /// # Arguments
    /// * `payload` - The value to store
    /// * `now_ms` - Current clock reading
    /// * `ttl` - How long the entry stays fresh
    pub fn new(payload: Value, now_ms: u64, ttl: Duration) -> Self {
        Self {
            payload,
            created_at: now_ms,
            ttl,
            hit_count: 0,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired only once strictly more than `ttl` has elapsed, so
    /// a read at exactly `created_at + ttl` still succeeds.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at) > self.ttl_ms()
    }

    // == Hit ==
    /// Records a successful read.
    pub fn hit(&mut self) {
        self.hit_count = self.hit_count.saturating_add(1);
    }

    // == Time To Live ==
    /// Returns the remaining lifetime in milliseconds, zero once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        let expires_at = self.created_at.saturating_add(self.ttl_ms());
        expires_at.saturating_sub(now_ms)
    }

    fn ttl_ms(&self) -> u64 {
        self.ttl.as_millis() as u64
    }
}
