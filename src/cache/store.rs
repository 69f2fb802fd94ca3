//! Bounded Cache Store Module
//!
//! Byte-bounded key/value cache with per-entry TTL, sliding expiration on
//! read and an expiry-ordered eviction sweep.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, MAX_ENTRY_FRACTION};

// == Bounded Cache ==
/// In-memory cache bounded by the serialized size of its values.
///
/// Every successful [`get`](Self::get) pushes the entry's expiry out to
/// `now + default_ttl`. This is the cache's *default* TTL, not the TTL the
/// entry was stored with, so a read can shorten the life of an entry that
/// was written with a long TTL as well as lengthen a short one.
#[derive(Debug)]
pub struct BoundedCache {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Running sum of `size_bytes` over `entries`
    total_bytes: usize,
    /// Byte budget
    max_bytes: usize,
    /// TTL for writes without an explicit one and for read refreshes
    default_ttl: Duration,
    /// Next insertion sequence number
    next_seq: u64,
    /// Performance statistics
    stats: CacheStats,
}

impl BoundedCache {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `max_bytes` - Byte budget for all entries combined
    /// * `default_ttl` - TTL used when `set` gets none, and on every hit
    pub fn new(max_bytes: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            total_bytes: 0,
            max_bytes,
            default_ttl,
            next_seq: 0,
            stats: CacheStats::new(max_bytes),
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// Writes that cannot be stored are dropped without an error: empty keys,
    /// values that fail to serialize, and values whose serialized size is
    /// above a tenth of the byte budget. In those cases the cache is left
    /// exactly as it was, including any previous entry under `key`.
    ///
    /// # Arguments
    /// * `key` - The key to store under
    /// * `value` - Any serializable value; stored as JSON
    /// * `ttl` - Time to live (uses `default_ttl` if None). A zero TTL
    ///   stores an entry that is already expired.
    pub fn set<T>(&mut self, key: impl Into<String>, value: &T, ttl: Option<Duration>)
    where
        T: Serialize + ?Sized,
    {
        let key = key.into();
        if key.is_empty() {
            warn!("Refusing to cache a value under an empty key");
            self.stats.record_rejection();
            return;
        }

        let (value, size_bytes) = match serialize(value) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(key = %key, error = %err, "Value is not serializable, not caching");
                self.stats.record_rejection();
                return;
            }
        };

        if self.exceeds_entry_limit(size_bytes) {
            debug!(
                key = %key,
                size_bytes,
                max_bytes = self.max_bytes,
                "Value too large for cache, skipping"
            );
            self.stats.record_rejection();
            return;
        }

        // Overwrite case: release the old entry's bytes before making room
        self.remove_entry(&key);

        if self.total_bytes + size_bytes > self.max_bytes {
            self.evict(size_bytes);
        }

        let now = Instant::now();
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, size_bytes, ttl, self.next_seq, now);
        self.next_seq += 1;

        self.total_bytes += size_bytes;
        self.entries.insert(key, entry);
    }

    // == Get ==
    /// Returns a clone of the value under `key` if it is live.
    ///
    /// Expired entries are removed and reported as absent. A hit refreshes the
    /// entry's expiry to `now + default_ttl`, so this read mutates the cache.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let now = Instant::now();

        match self.entries.get_mut(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                entry.refresh(self.default_ttl, now);
                self.stats.record_hit();
                return Some(entry.value.clone());
            }
            Some(_) => {
                self.remove_entry(key);
            }
            None => {}
        }

        self.stats.record_miss();
        None
    }

    // == Typed Get ==
    /// Reads the value under `key` and deserializes it into `T`.
    ///
    /// A live value that does not fit `T` is reported as absent. The read
    /// still counts as a hit and still refreshes the entry.
    pub fn get_as<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(err) => {
                debug!(key = %key, error = %err, "Cached value has an unexpected shape");
                None
            }
        }
    }

    // == Invalidate ==
    /// Removes the entry under `key`. Does nothing if it is absent.
    pub fn invalidate(&mut self, key: &str) {
        if self.remove_entry(key).is_some() {
            debug!(key = %key, "Invalidated cache entry");
        }
    }

    // == Clear ==
    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_bytes = 0;
    }

    // == Prune ==
    /// Runs the eviction sweep without reserving room for a new entry.
    ///
    /// Since the sweep visits entries soonest-expiring first, this removes
    /// every expired entry and stops at the first live one.
    ///
    /// Returns the number of entries removed.
    pub fn prune(&mut self) -> usize {
        self.evict(0)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size_bytes: self.total_bytes,
            entry_count: self.entries.len(),
            ..self.stats.clone()
        }
    }

    // == Length ==
    /// Returns the number of entries present, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Eviction Sweep ==
    /// Walks entries soonest-expiring first (ties: oldest insertion first),
    /// removing each one that is expired or whose removal is still needed to
    /// fit `reserve` more bytes under the budget. Stops at the first entry
    /// that is neither.
    ///
    /// This approximates LRU: an entry refreshed by a read moves later in the
    /// walk, but entries are never reordered by actual access time.
    fn evict(&mut self, reserve: usize) -> usize {
        let now = Instant::now();

        let mut order: Vec<(Instant, u64, String)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.expires_at, entry.seq, key.clone()))
            .collect();
        order.sort_unstable_by_key(|(expires_at, seq, _)| (*expires_at, *seq));

        let mut removed = 0;
        for (expires_at, _, key) in order {
            let over_budget = self.total_bytes + reserve > self.max_bytes;
            if expires_at <= now || over_budget {
                self.remove_entry(&key);
                removed += 1;
            } else {
                break;
            }
        }

        if removed > 0 {
            debug!(
                removed,
                size_bytes = self.total_bytes,
                "Eviction sweep removed entries"
            );
        }
        self.stats.record_evictions(removed);
        removed
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.total_bytes -= entry.size_bytes;
        Some(entry)
    }

    fn exceeds_entry_limit(&self, size_bytes: usize) -> bool {
        // size > max / fraction, kept in integers
        size_bytes.saturating_mul(MAX_ENTRY_FRACTION) > self.max_bytes
    }
}

/// Converts `value` to JSON and measures its serialized length.
fn serialize<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<(Value, usize)> {
    let value = serde_json::to_value(value)?;
    let size = serde_json::to_vec(&value)?.len();
    Ok((value, size))
}
