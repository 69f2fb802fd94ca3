//! Folio Cache - a bounded query cache behind a contact-message API
//!
//! Memoizes query results in a byte-bounded in-memory cache with TTL and
//! sliding expiration, and serves a cached, ETag-aware message list.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{BoundedCache, SharedCache};
pub use config::Config;
pub use tasks::spawn_prune_task;
