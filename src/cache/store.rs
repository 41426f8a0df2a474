//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with TTL expiration and
//! least-hit eviction. Operates on already-derived keys and is not
//! synchronized; `MetricsCache` wraps it in a lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::cache::eviction::select_victim;
use crate::cache::stats::Counters;
use crate::cache::{CacheEntry, CacheStats, Clock};

// == Cache Store ==
/// Keyed payload storage with a size cap.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Lookup and eviction counters
    counters: Counters,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Time source for stamping and expiring entries
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the store can hold, at least 1
    /// * `clock` - Time source used for expiry
    pub fn new(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            counters: Counters::default(),
            max_entries: max_entries.max(1),
            clock,
        }
    }

    // == Get ==
    /// Returns the payload for `key` and bumps its hit count.
    ///
    /// An expired entry is removed on the spot and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();

        let expired = match self.entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => {
                entry.hit();
                self.counters.record_hit();
                return Some(entry.payload.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
            debug!(key, "Dropped expired entry on read");
        }
        self.counters.record_miss();
        None
    }

    // == Set ==
    /// Stores `payload` under `key` with the given TTL.
    ///
    /// Overwriting replaces the entry entirely, hit count included. Whenever
    /// the store is full, the least-hit entry is evicted first, even if `key`
    /// is already present; the victim may be `key` itself.
    pub fn set(&mut self, key: String, payload: Value, ttl: Duration) {
        if self.entries.len() >= self.max_entries {
            self.evict_one();
        }

        let entry = CacheEntry::new(payload, self.clock.now_ms(), ttl);
        self.entries.insert(key, entry);
    }

    // == Has ==
    /// Returns true if `key` holds a live entry. Does not count as a hit.
    pub fn has(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired(now))
            .unwrap_or(false)
    }

    // == Delete ==
    /// Removes the entry for `key`. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry. Returns the number removed.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Evict One ==
    /// Removes the entry with the lowest hit count.
    ///
    /// Returns the evicted key, or None if the store is empty.
    pub fn evict_one(&mut self) -> Option<String> {
        let victim = select_victim(&self.entries)?;
        self.entries.remove(&victim);
        self.counters.record_eviction();
        debug!(key = %victim, "Evicted least-hit entry");
        Some(victim)
    }

    // == Invalidate Matching ==
    /// Removes every entry whose key matches `pattern`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_matching(&mut self, pattern: &Regex) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !pattern.is_match(key));
        before - self.entries.len()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }

    // == Stats ==
    /// Returns a snapshot of current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now_ms();

        CacheStats {
            size: self.entries.len(),
            max_size: self.max_entries,
            expired_count: self
                .entries
                .values()
                .filter(|entry| entry.is_expired(now))
                .count(),
            total_hits: self.entries.values().map(|entry| entry.hit_count).sum(),
            hit_rate_estimate: self.counters.hit_rate(),
            misses: self.counters.misses,
            evictions: self.counters.evictions,
        }
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Max Entries ==
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}
