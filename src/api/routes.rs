//! API Routes
//!
//! Configures the Axum router with the message and cache endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    compression::{predicate::SizeAbove, CompressionLayer},
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_cache_handler, create_message_handler, health_handler, invalidate_handler,
    list_messages_handler, method_not_allowed_handler, stats_handler, AppState,
};

/// Bodies at or below this size are sent uncompressed
pub const GZIP_MIN_BYTES: u16 = 1024;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /messages` - List messages (cached, ETag aware)
/// - `POST /messages` - Store a message and invalidate the cached list
/// - `GET /stats` - Cache statistics
/// - `DELETE /cache` - Clear the cache
/// - `DELETE /cache/:key` - Invalidate one cache key
/// - `GET /health` - Health check endpoint
///
/// Any other method on `/messages` is answered with 405, an `Allow` header
/// and a JSON `{"message": "Method not allowed"}` body.
///
/// # Middleware
/// - Compression: gzip for bodies above [`GZIP_MIN_BYTES`] when accepted
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new().compress_when(SizeAbove::new(GZIP_MIN_BYTES));

    Router::new()
        .route(
            "/messages",
            get(list_messages_handler)
                .post(create_message_handler)
                .fallback(method_not_allowed_handler),
        )
        .route("/stats", get(stats_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/:key", delete(invalidate_handler))
        .route("/health", get(health_handler))
        .layer(compression)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
