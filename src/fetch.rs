//! Cache-aware fetching
//!
//! Wraps a caller-supplied fetch operation so repeated requests for the same
//! endpoint and parameters are served from the cache.
//!
//! There is no in-flight de-duplication: two concurrent misses for the same
//! key both call their fetch function, and the later result overwrites the
//! earlier one. The lock is never held while a fetch is pending.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::{MetricsCache, TtlCategory};
use crate::error::CacheError;

// == Fetched ==
/// Payload returned by [`MetricsCache::cached_fetch`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fetched {
    pub payload: Value,
    /// True when served from the cache without calling the fetch function
    pub from_cache: bool,
}

impl MetricsCache {
    // == Cached Fetch ==
    /// Returns the cached payload, or calls `fetch` and caches its result.
    ///
    /// A failed fetch is returned unchanged and nothing is cached. Key
    /// derivation errors are converted into the caller's error type so they
    /// fail the request instead of silently bypassing the cache.
    pub async fn cached_fetch<P, F, Fut, E>(
        &self,
        endpoint: &str,
        params: &P,
        fetch: F,
        ttl: Duration,
    ) -> Result<Fetched, E>
    where
        P: Serialize + ?Sized,
        F: FnOnce(&P) -> Fut,
        Fut: Future<Output = Result<Value, E>>,
        E: From<CacheError>,
    {
        if let Some(payload) = self.get(endpoint, params).await? {
            debug!(endpoint, "Serving from cache");
            return Ok(Fetched {
                payload,
                from_cache: true,
            });
        }

        let payload = fetch(params).await?;
        self.set(endpoint, params, payload.clone(), ttl).await?;

        Ok(Fetched {
            payload,
            from_cache: false,
        })
    }

    /// [`cached_fetch`](Self::cached_fetch) with the configured lifetime for `category`.
    pub async fn cached_fetch_for<P, F, Fut, E>(
        &self,
        endpoint: &str,
        params: &P,
        fetch: F,
        category: TtlCategory,
    ) -> Result<Fetched, E>
    where
        P: Serialize + ?Sized,
        F: FnOnce(&P) -> Fut,
        Fut: Future<Output = Result<Value, E>>,
        E: From<CacheError>,
    {
        self.cached_fetch(endpoint, params, fetch, self.ttl_for(category))
            .await
    }
}
