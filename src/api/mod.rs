//! API Module
//!
//! HTTP handlers and routing for the message API and cache maintenance.
//!
//! # Endpoints
//! - `GET /messages` - List messages
//! - `POST /messages` - Store a message
//! - `GET /stats` - Get cache statistics
//! - `DELETE /cache` - Clear the cache
//! - `DELETE /cache/:key` - Invalidate a cache key
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
