//! Response DTOs for the message API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

/// Response body for GET /messages
#[derive(Debug, Clone, Serialize)]
pub struct MessageListResponse {
    /// Rows of the messages table, newest first
    pub messages: Vec<Value>,
}

/// Response body for POST /messages
#[derive(Debug, Clone, Serialize)]
pub struct MessageCreatedResponse {
    pub message: String,
    /// Time of creation in RFC 3339
    pub timestamp: String,
}

impl MessageCreatedResponse {
    pub fn new() -> Self {
        Self {
            message: "Message sent successfully".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl Default for MessageCreatedResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for cache maintenance endpoints
#[derive(Debug, Clone, Serialize)]
pub struct AckResponse {
    pub message: String,
}

impl AckResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Bytes currently accounted to entries
    pub size_bytes: usize,
    /// Current number of entries in cache
    pub entry_count: usize,
    /// Configured byte budget
    pub max_bytes: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Writes dropped as oversized or unserializable
    pub rejections: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            size_bytes: stats.size_bytes,
            entry_count: stats.entry_count,
            max_bytes: stats.max_bytes,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            rejections: stats.rejections,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
