//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_MAX_BYTES, DEFAULT_TTL};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Byte budget of the query cache
    pub max_bytes: usize,
    /// Default TTL in milliseconds; also the sliding refresh applied on reads
    pub default_ttl_ms: u64,
    /// TTL in milliseconds for the cached message list and its ETag
    pub messages_ttl_ms: u64,
    /// Queries faster than this many milliseconds are not cached
    pub query_cache_threshold_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background prune task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_BYTES` - Cache byte budget (default: 104857600)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `MESSAGES_CACHE_TTL_MS` - Message list TTL in milliseconds (default: 60000)
    /// - `QUERY_CACHE_THRESHOLD_MS` - Minimum query time to cache (default: 0)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Prune frequency in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_bytes: env_or("CACHE_MAX_BYTES", defaults.max_bytes),
            default_ttl_ms: env_or("CACHE_DEFAULT_TTL_MS", defaults.default_ttl_ms),
            messages_ttl_ms: env_or("MESSAGES_CACHE_TTL_MS", defaults.messages_ttl_ms),
            query_cache_threshold_ms: env_or(
                "QUERY_CACHE_THRESHOLD_MS",
                defaults.query_cache_threshold_ms,
            ),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn messages_ttl(&self) -> Duration {
        Duration::from_millis(self.messages_ttl_ms)
    }

    pub fn query_cache_threshold(&self) -> Duration {
        Duration::from_millis(self.query_cache_threshold_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            default_ttl_ms: DEFAULT_TTL.as_millis() as u64,
            messages_ttl_ms: 60_000,
            query_cache_threshold_ms: 0,
            server_port: 3000,
            cleanup_interval: 30,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
