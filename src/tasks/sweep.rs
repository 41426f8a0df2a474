//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Shortest period between sweeps; smaller intervals are raised to this.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Spawns a background task that periodically purges expired cache entries.
///
/// The task sleeps for `interval` (at least `MIN_SWEEP_INTERVAL`) between sweeps and takes the store's write
/// lock only for the duration of each sweep. It runs until the returned
/// handle is aborted.
///
/// Must be called from within a tokio runtime.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(CacheStore::new(100, Arc::new(SystemClock::new()))));
/// let handle = spawn_sweep_task(store.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task(store: Arc<RwLock<CacheStore>>, interval: Duration) -> JoinHandle<()> {
    let interval = interval.max(MIN_SWEEP_INTERVAL);

    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "Starting expiry sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.write().await.cleanup_expired();

            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
