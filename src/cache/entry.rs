//! Cache Entry Module
//!
//! Defines a single cached value together with its expiry and accounted size.

use std::time::{Duration, Instant};

use serde_json::Value;

/// Stand-in lifetime for TTLs too long to represent as an `Instant` (100 years)
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 86_400);

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Instant after which the entry is dead
    pub expires_at: Instant,
    /// Serialized length of `value`, fixed at insertion
    pub size_bytes: usize,
    /// Insertion sequence, used to break ties between equal expiries
    pub seq: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from `now`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `size_bytes` - Serialized size of `value`
    /// * `ttl` - Time to live measured from `now`
    /// * `seq` - Insertion sequence number
    pub fn new(value: Value, size_bytes: usize, ttl: Duration, seq: u64, now: Instant) -> Self {
        Self {
            value,
            expires_at: expiry_after(now, ttl),
            size_bytes,
            seq,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is dead at `now`.
    ///
    /// Boundary condition: an entry whose expiry equals `now` is already
    /// expired, so a zero TTL never yields a readable entry.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at <= now
    }

    // == Refresh ==
    /// Pushes the expiry out to `now + ttl`.
    pub fn refresh(&mut self, ttl: Duration, now: Instant) {
        self.expires_at = expiry_after(now, ttl);
    }
}

/// `now + ttl`, clamped to [`FAR_FUTURE`] when the sum is not representable.
fn expiry_after(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}
