//! Cache Statistics Module
//!
//! Running lookup counters and the snapshot reported to observers.

use serde::Serialize;

// == Counters ==
/// Running counters kept by the store across its lifetime.
#[derive(Debug, Clone, Default)]
pub struct Counters {
    /// Lookups that returned a payload
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries removed to make room
    pub evictions: u64,
}

impl Counters {
    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Hit Rate ==
    /// Calculates hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Cache Stats ==
/// Point-in-time view of the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Entries currently stored, expired ones included until swept
    pub size: usize,
    /// Configured entry cap
    pub max_size: usize,
    /// Stored entries already past their TTL
    pub expired_count: usize,
    /// Sum of hit counts over stored entries
    pub total_hits: u64,
    /// Lookup hit ratio since construction
    pub hit_rate_estimate: f64,
    /// Lookups that missed since construction
    pub misses: u64,
    /// Entries evicted since construction
    pub evictions: u64,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_default() {
        let counters = Counters::default();
        assert_eq!(counters.hits, 0);
        assert_eq!(counters.misses, 0);
        assert_eq!(counters.evictions, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(Counters::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut counters = Counters::default();
        counters.record_hit();
        counters.record_hit();
        counters.record_hit();
        counters.record_miss();
        assert_eq!(counters.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_eviction() {
        let mut counters = Counters::default();
        counters.record_eviction();
        counters.record_eviction();
        assert_eq!(counters.evictions, 2);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = CacheStats {
            size: 3,
            max_size: 100,
            expired_count: 1,
            total_hits: 7,
            hit_rate_estimate: 0.5,
            misses: 7,
            evictions: 0,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["max_size"], 100);
        assert_eq!(json["hit_rate_estimate"], 0.5);
    }
}
