//! Metrics Cache Module
//!
//! The shared cache handle used by request code: endpoint + parameter keyed
//! reads and writes, invalidation helpers, and ownership of the expiry sweep.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{
    derive_key, CacheStats, CacheStore, Clock, DataCategory, SystemClock, TtlCategory,
    TtlDefaults,
};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::spawn_sweep_task;

// == Metrics Cache ==
/// Cheaply cloneable handle to one cache instance.
///
/// All clones share the same store. The store sits behind a single lock so
/// each read-modify-write sequence (lazy expiry on read, evict-then-insert on
/// write, scan-then-delete on sweep) is atomic with respect to the others.
///
/// The expiry sweep is not running after construction; call [`start`] from
/// within a tokio runtime. Dropping the last handle stops it.
///
/// [`start`]: MetricsCache::start
#[derive(Debug, Clone)]
pub struct MetricsCache {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    store: Arc<RwLock<CacheStore>>,
    ttl: TtlDefaults,
    cleanup_interval: Duration,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let slot = self.sweeper.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

impl MetricsCache {
    // == Constructors ==
    /// Creates a cache from configuration using the system clock.
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Creates a cache that reads time from `clock`.
    ///
    /// A zero cache size or sweep interval falls back to the default.
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Self {
        let config = config.sanitized();
        let store = CacheStore::new(config.max_cache_size, clock);

        Self {
            inner: Arc::new(Inner {
                store: Arc::new(RwLock::new(store)),
                ttl: config.ttl,
                cleanup_interval: config.cleanup_period(),
                sweeper: Mutex::new(None),
            }),
        }
    }

    // == Lifecycle ==
    /// Starts the background expiry sweep.
    ///
    /// Calling it again replaces the running sweep rather than adding a
    /// second one. Fails if no tokio runtime is available.
    pub fn start(&self) -> Result<()> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(CacheError::Internal(
                "Expiry sweep requires a tokio runtime".to_string(),
            ));
        }

        let mut slot = self.sweeper_slot();
        if let Some(previous) = slot.take() {
            previous.abort();
            debug!("Replaced running expiry sweep");
        }
        *slot = Some(spawn_sweep_task(
            self.inner.store.clone(),
            self.inner.cleanup_interval,
        ));
        Ok(())
    }

    /// Stops the background expiry sweep. Safe to call repeatedly.
    pub fn stop(&self) {
        if let Some(handle) = self.sweeper_slot().take() {
            handle.abort();
            info!("Expiry sweep stopped");
        }
    }

    /// Returns true while a sweep task is scheduled.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper_slot()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Stops the sweep and drops every entry.
    pub async fn dispose(&self) {
        self.stop();
        let removed = self.inner.store.write().await.clear();
        info!(removed, "Metrics cache disposed");
    }

    fn sweeper_slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inner.sweeper.lock().unwrap_or_else(|e| e.into_inner())
    }

    // == Reads ==
    /// Returns the cached payload for `endpoint` and `params`, if fresh.
    ///
    /// A hit bumps the entry's hit count. An expired entry is removed.
    pub async fn get<P>(&self, endpoint: &str, params: &P) -> Result<Option<Value>>
    where
        P: Serialize + ?Sized,
    {
        let key = derive_key(endpoint, params)?;
        Ok(self.get_by_key(&key).await)
    }

    /// Like [`get`](MetricsCache::get) for a key already built with `derive_key`.
    pub async fn get_by_key(&self, key: &str) -> Option<Value> {
        self.inner.store.write().await.get(key)
    }

    /// Returns true if a fresh entry exists. Does not count as a hit.
    pub async fn has<P>(&self, endpoint: &str, params: &P) -> Result<bool>
    where
        P: Serialize + ?Sized,
    {
        let key = derive_key(endpoint, params)?;
        Ok(self.inner.store.read().await.has(&key))
    }

    // == Writes ==
    /// Caches `payload` for `endpoint` and `params` for `ttl`.
    pub async fn set<P>(
        &self,
        endpoint: &str,
        params: &P,
        payload: Value,
        ttl: Duration,
    ) -> Result<()>
    where
        P: Serialize + ?Sized,
    {
        let key = derive_key(endpoint, params)?;
        self.set_by_key(key, payload, ttl).await;
        Ok(())
    }

    /// Like [`set`](MetricsCache::set) for a key already built with `derive_key`.
    pub async fn set_by_key(&self, key: String, payload: Value, ttl: Duration) {
        self.inner.store.write().await.set(key, payload, ttl);
    }

    /// Caches `payload` using the configured lifetime for `category`.
    pub async fn set_for<P>(
        &self,
        endpoint: &str,
        params: &P,
        payload: Value,
        category: TtlCategory,
    ) -> Result<()>
    where
        P: Serialize + ?Sized,
    {
        self.set(endpoint, params, payload, self.ttl_for(category))
            .await
    }

    /// Configured lifetime for `category`.
    pub fn ttl_for(&self, category: TtlCategory) -> Duration {
        self.inner.ttl.get(category)
    }

    // == Invalidation ==
    /// Removes the entry for `endpoint` and `params`. Returns whether one existed.
    pub async fn delete<P>(&self, endpoint: &str, params: &P) -> Result<bool>
    where
        P: Serialize + ?Sized,
    {
        let key = derive_key(endpoint, params)?;
        Ok(self.delete_by_key(&key).await)
    }

    /// Like [`delete`](MetricsCache::delete) for a key already built with `derive_key`.
    pub async fn delete_by_key(&self, key: &str) -> bool {
        self.inner.store.write().await.delete(key)
    }

    /// Removes every entry whose key matches the regular expression `pattern`.
    ///
    /// Returns the number of entries removed.
    pub async fn invalidate_by_pattern(&self, pattern: &str) -> Result<usize> {
        let regex = Regex::new(pattern)?;
        let removed = self.inner.store.write().await.invalidate_matching(&regex);
        debug!(pattern, removed, "Invalidated entries by pattern");
        Ok(removed)
    }

    /// Removes every entry belonging to `category`.
    pub async fn invalidate_category(&self, category: DataCategory) -> Result<usize> {
        self.invalidate_by_pattern(&regex::escape(category.pattern()))
            .await
    }

    /// Removes every entry.
    pub async fn invalidate_all(&self) -> usize {
        let removed = self.clear().await;
        debug!(removed, "Invalidated all entries");
        removed
    }

    /// Removes every entry. Returns the number removed.
    pub async fn clear(&self) -> usize {
        self.inner.store.write().await.clear()
    }

    /// Removes expired entries now, without waiting for the sweep.
    pub async fn clear_expired(&self) -> usize {
        self.inner.store.write().await.cleanup_expired()
    }

    // == Stats ==
    /// Returns a snapshot of cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.inner.store.read().await.stats()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use serde_json::json;

    const MINUTE: Duration = Duration::from_secs(60);

    fn cache_with(max_cache_size: usize) -> (MetricsCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let config = Config {
            max_cache_size,
            ..Config::default()
        };
        (MetricsCache::with_clock(&config, clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_set_and_get_roundtrip() {
        let (cache, _) = cache_with(100);

        cache
            .set("dashboard/overview", &json!({"range": "7d"}), json!({"total": 42}), MINUTE)
            .await
            .unwrap();

        let payload = cache
            .get("dashboard/overview", &json!({"range": "7d"}))
            .await
            .unwrap();
        assert_eq!(payload, Some(json!({"total": 42})));
    }

    #[tokio::test]
    async fn test_get_rejects_malformed_params() {
        let (cache, _) = cache_with(100);
        let result = cache.get("users", &json!("not-a-map")).await;
        assert!(matches!(result, Err(CacheError::InvalidParams(_))));
    }

    #[tokio::test]
    async fn test_set_for_uses_category_ttl() {
        let (cache, clock) = cache_with(100);
        let params = json!({});

        cache
            .set_for("metrics/live", &params, json!(7), TtlCategory::Realtime)
            .await
            .unwrap();

        clock.advance(Duration::from_secs(30));
        assert!(cache.has("metrics/live", &params).await.unwrap());
        clock.advance(Duration::from_millis(1));
        assert!(!cache.has("metrics/live", &params).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let (cache, _) = cache_with(100);
        let params = json!({"id": 7});

        cache.set("investors/detail", &params, json!(1), MINUTE).await.unwrap();

        assert!(cache.delete("investors/detail", &params).await.unwrap());
        assert!(!cache.delete("investors/detail", &params).await.unwrap());
        assert_eq!(cache.get("investors/detail", &params).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_by_key_matches_endpoint_and_params() {
        let (cache, _) = cache_with(100);
        let params = json!({"id": 7, "range": "30d"});
        let key = derive_key("investors/detail", &params).unwrap();

        cache.set("investors/detail", &params, json!("x"), MINUTE).await.unwrap();

        assert_eq!(cache.get_by_key(&key).await, Some(json!("x")));
        assert_eq!(cache.stats().await.total_hits, 1);
        assert!(cache.delete_by_key(&key).await);
        assert!(!cache.has("investors/detail", &params).await.unwrap());
        assert_eq!(cache.get_by_key(&key).await, None);
    }

    #[tokio::test]
    async fn test_invalidate_category() {
        let (cache, _) = cache_with(100);
        let none = json!({});

        cache.set("dashboard/overview", &none, json!(1), MINUTE).await.unwrap();
        cache.set("dashboard/kyc-summary", &none, json!(2), MINUTE).await.unwrap();
        cache.set("kyc/pending", &none, json!(3), MINUTE).await.unwrap();
        cache.set("users/list", &none, json!(4), MINUTE).await.unwrap();

        assert_eq!(cache.invalidate_category(DataCategory::Kyc).await.unwrap(), 2);
        assert!(cache.has("dashboard/overview", &none).await.unwrap());
        assert!(cache.has("users/list", &none).await.unwrap());

        assert_eq!(cache.invalidate_all().await, 2);
        assert_eq!(cache.stats().await.size, 0);
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_an_error() {
        let (cache, _) = cache_with(100);
        cache.set("users", &json!({}), json!(1), MINUTE).await.unwrap();

        let result = cache.invalidate_by_pattern("users[").await;
        assert!(matches!(result, Err(CacheError::InvalidPattern(_))));
        assert_eq!(cache.stats().await.size, 1);
    }

    #[tokio::test]
    async fn test_clear_expired() {
        let (cache, clock) = cache_with(100);
        let none = json!({});

        cache.set("short", &none, json!(1), Duration::from_secs(1)).await.unwrap();
        cache.set("long", &none, json!(2), MINUTE).await.unwrap();
        clock.advance(Duration::from_secs(2));

        assert_eq!(cache.stats().await.expired_count, 1);
        assert_eq!(cache.clear_expired().await, 1);
        assert_eq!(cache.stats().await.size, 1);
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let (cache, _) = cache_with(100);
        let other = cache.clone();

        cache.set("reports/monthly", &json!({}), json!("r"), MINUTE).await.unwrap();
        assert_eq!(
            other.get("reports/monthly", &json!({})).await.unwrap(),
            Some(json!("r"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_sweeps_and_stop_halts() {
        let (cache, clock) = cache_with(100);
        let interval = Config::default().cleanup_period();
        let none = json!({});

        cache.start().unwrap();
        assert!(cache.is_sweeping());

        cache.set("a", &none, json!(1), Duration::from_secs(1)).await.unwrap();
        clock.advance(Duration::from_secs(2));
        tokio::time::sleep(interval + Duration::from_millis(1)).await;
        assert_eq!(cache.stats().await.size, 0);

        cache.stop();
        cache.stop();
        assert!(!cache.is_sweeping());

        cache.set("b", &none, json!(2), Duration::from_secs(1)).await.unwrap();
        clock.advance(Duration::from_secs(2));
        tokio::time::sleep(interval * 3).await;
        assert_eq!(cache.stats().await.size, 1, "No sweep should run after stop");
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_leaves_no_stray_sweep() {
        let (cache, clock) = cache_with(100);
        let interval = Config::default().cleanup_period();

        cache.start().unwrap();
        cache.start().unwrap();
        cache.stop();

        cache.set("a", &json!({}), json!(1), Duration::ZERO).await.unwrap();
        clock.advance(Duration::from_millis(1));
        tokio::time::sleep(interval * 2).await;

        assert_eq!(cache.stats().await.size, 1);
    }

    #[tokio::test]
    async fn test_zero_cache_size_falls_back_to_default() {
        let (cache, _) = cache_with(0);

        cache.set("a", &json!({}), json!(1), MINUTE).await.unwrap();
        cache.set("b", &json!({}), json!(2), MINUTE).await.unwrap();

        let stats = cache.stats().await;
        assert_eq!(stats.max_size, Config::default().max_cache_size);
        assert_eq!(stats.size, 2);
        assert!(stats.size <= stats.max_size);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_cleanup_interval_falls_back_to_default() {
        let clock = Arc::new(ManualClock::new());
        let config = Config {
            cleanup_interval: 0,
            ..Config::default()
        };
        let cache = MetricsCache::with_clock(&config, clock.clone());
        let interval = Config::default().cleanup_period();

        cache.set("a", &json!({}), json!(1), Duration::ZERO).await.unwrap();
        clock.advance(Duration::from_millis(1));
        cache.start().unwrap();

        tokio::time::sleep(interval - Duration::from_secs(1)).await;
        assert_eq!(cache.stats().await.size, 1, "Sweep should wait a full default interval");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(cache.stats().await.size, 0);
        cache.stop();
    }

    #[test]
    fn test_start_outside_runtime_fails() {
        let (cache, _) = cache_with(100);
        assert!(matches!(cache.start(), Err(CacheError::Internal(_))));
    }

    #[tokio::test]
    async fn test_dispose_stops_and_clears() {
        let (cache, _) = cache_with(100);
        cache.start().unwrap();
        cache.set("a", &json!({}), json!(1), MINUTE).await.unwrap();

        cache.dispose().await;

        assert!(!cache.is_sweeping());
        assert_eq!(cache.stats().await.size, 0);
    }
}
