//! Cache Module
//!
//! Provides a byte-bounded in-memory cache with TTL expiration, sliding
//! expiration on read and expiry-ordered eviction.

mod entry;
mod stats;
mod store;


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::BoundedCache;

// == Public Constants ==
/// Default byte budget (100 MiB)
pub const DEFAULT_MAX_BYTES: usize = 100 * 1024 * 1024;

/// Default time to live (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// A single entry may use at most `1 / MAX_ENTRY_FRACTION` of the budget
pub const MAX_ENTRY_FRACTION: usize = 10;

// == Shared Handle ==
/// Cache handle shared between the query layer and HTTP handlers.
///
/// Every operation, reads included, takes the write lock: `get` refreshes
/// expiry and counters.
pub type SharedCache = Arc<RwLock<BoundedCache>>;

/// Wraps a cache into a [`SharedCache`].
pub fn shared(cache: BoundedCache) -> SharedCache {
    Arc::new(RwLock::new(cache))
}
