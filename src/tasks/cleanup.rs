//! Prune Task
//!
//! Background task that periodically runs the cache's eviction sweep to drop
//! expired entries nobody has read since they expired.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a background task that prunes expired cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Each sweep holds the write lock only for its own duration.
///
/// # Arguments
/// * `cache` - Shared cache handle
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_prune_task(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Starting cache prune task");

        loop {
            tokio::time::sleep(interval).await;

            let (removed, size_bytes) = {
                let mut cache_guard = cache.write().await;
                let removed = cache_guard.prune();
                (removed, cache_guard.stats().size_bytes)
            };

            if removed > 0 {
                info!(removed, size_bytes, "Cache prune removed expired entries");
            } else {
                debug!("Cache prune: no expired entries found");
            }
        }
    })
}
