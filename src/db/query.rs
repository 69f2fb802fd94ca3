//! Cached Query Layer
//!
//! Wraps an [`Executor`] with the shared cache: reads may be served from the
//! cache, and writers invalidate the keys their statements affect.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, error};

use crate::cache::SharedCache;
use crate::db::Executor;
use crate::error::Result;

// == Cache Key ==
/// Derives the cache key for a statement: the SQL text, a dash, then the
/// JSON encoding of the parameter list.
///
/// `cache_key("SELECT 1", &[])` is `"SELECT 1-[]"`.
pub fn cache_key(sql: &str, params: &[Value]) -> String {
    // Serializing a slice of Values cannot fail
    let params = serde_json::to_string(params).unwrap_or_else(|_| "[]".to_string());
    format!("{sql}-{params}")
}

// == Query Options ==
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOptions {
    /// Read from and write to the cache
    pub cache: bool,
    /// TTL for a freshly cached result (cache default if None)
    pub ttl: Option<Duration>,
    /// Skip the cache read but still cache the fresh result
    pub force_refresh: bool,
}

impl QueryOptions {
    /// Options for a cached read with the given TTL.
    pub fn cached(ttl: Duration) -> Self {
        Self {
            cache: true,
            ttl: Some(ttl),
            force_refresh: false,
        }
    }

    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }
}

// == Query Layer ==
/// Statement runner memoizing results in the shared cache.
#[derive(Clone)]
pub struct QueryLayer {
    cache: SharedCache,
    executor: Arc<dyn Executor>,
    /// Results that come back faster than this are not worth caching
    cache_threshold: Duration,
}

impl QueryLayer {
    pub fn new(cache: SharedCache, executor: Arc<dyn Executor>, cache_threshold: Duration) -> Self {
        Self {
            cache,
            executor,
            cache_threshold,
        }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    // == Query ==
    /// Runs `sql` with `params`, consulting the cache as `options` say.
    ///
    /// A cached result is stored only when the statement took at least the
    /// configured threshold to execute.
    pub async fn query(
        &self,
        sql: &str,
        params: &[Value],
        options: QueryOptions,
    ) -> Result<Vec<Value>> {
        let key = cache_key(sql, params);

        if options.cache && !options.force_refresh {
            let cached = self.cache.write().await.get_as::<Vec<Value>>(&key);
            if let Some(rows) = cached {
                debug!(sql, "Cache hit");
                return Ok(rows);
            }
        }

        debug!(sql, "Executing query");
        let started = Instant::now();
        let rows = self.executor.execute(sql, params).await.map_err(|err| {
            error!(sql, error = %err, "Query execution failed");
            err
        })?;
        let elapsed = started.elapsed();
        debug!(sql, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "Query execution time");

        if options.cache && elapsed >= self.cache_threshold {
            self.cache.write().await.set(key, &rows, options.ttl);
            debug!(sql, "Cached query result");
        }

        Ok(rows)
    }

    // == Invalidate ==
    /// Drops the cached result of `sql` with `params`.
    pub async fn invalidate(&self, sql: &str, params: &[Value]) {
        self.invalidate_key(&cache_key(sql, params)).await;
    }

    /// Drops an arbitrary cache key, e.g. a stored ETag.
    pub async fn invalidate_key(&self, key: &str) {
        self.cache.write().await.invalidate(key);
    }
}
