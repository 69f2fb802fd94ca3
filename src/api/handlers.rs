//! API Handlers
//!
//! HTTP request handlers for the message endpoints and cache maintenance.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{shared, BoundedCache, SharedCache};
use crate::config::Config;
use crate::db::{
    cache_key, Executor, MemoryDatabase, QueryLayer, QueryOptions, INSERT_MESSAGE_SQL,
    LIST_MESSAGES_SQL,
};
use crate::error::{AppError, Result};
use crate::models::{
    AckResponse, HealthResponse, MessageCreatedResponse, MessageListResponse, NewMessage,
    StatsResponse,
};

/// Cache key holding the ETag of the last message list served
pub const MESSAGES_ETAG_KEY: &str = "messages-list-etag";

/// Header reporting handler time
pub const X_RESPONSE_TIME: HeaderName = HeaderName::from_static("x-response-time");

/// Handlers slower than this are logged at warn level
const SLOW_RESPONSE: Duration = Duration::from_secs(1);

/// Application state shared across all handlers.
///
/// The cache handle is the same one the query layer uses, so entries written
/// by handlers (ETags) and by queries (result sets) share one byte budget.
#[derive(Clone)]
pub struct AppState {
    /// Shared query cache
    pub cache: SharedCache,
    /// Cached statement runner
    pub db: QueryLayer,
    /// TTL of the cached message list and its ETag
    pub messages_ttl: Duration,
}

impl AppState {
    /// Creates a new AppState around `cache` and `executor`.
    pub fn new(cache: BoundedCache, executor: Arc<dyn Executor>, config: &Config) -> Self {
        let cache = shared(cache);
        let db = QueryLayer::new(cache.clone(), executor, config.query_cache_threshold());
        Self {
            cache,
            db,
            messages_ttl: config.messages_ttl(),
        }
    }

    /// Creates a new AppState from configuration with an in-memory database.
    pub fn from_config(config: &Config) -> Self {
        let cache = BoundedCache::new(config.max_bytes, config.default_ttl());
        Self::new(cache, Arc::new(MemoryDatabase::new()), config)
    }
}

/// Handler for GET /messages
///
/// Serves the message list from the query cache. A request whose
/// `If-None-Match` equals the cached ETag gets 304 without touching the list.
pub async fn list_messages_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    let started = Instant::now();

    if let Some(tag) = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
    {
        let cached: Option<String> = state.cache.write().await.get_as(MESSAGES_ETAG_KEY);
        if cached.as_deref() == Some(tag) {
            debug!(etag = tag, "ETag matched, not modified");
            let headers = [(header::ETAG, tag.to_string())];
            return Ok((StatusCode::NOT_MODIFIED, headers).into_response());
        }
    }

    let rows = state
        .db
        .query(
            LIST_MESSAGES_SQL,
            &[],
            QueryOptions::cached(state.messages_ttl),
        )
        .await?;

    let body = serde_json::to_string(&MessageListResponse { messages: rows })
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let etag = etag_for(&body);
    state
        .cache
        .write()
        .await
        .set(MESSAGES_ETAG_KEY, &etag, Some(state.messages_ttl));

    let headers = [
        (header::CONTENT_TYPE, "application/json".to_string()),
        (
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.messages_ttl.as_secs()),
        ),
        (header::ETAG, etag),
        (X_RESPONSE_TIME, response_time(started, "GET /messages")),
    ];
    Ok((StatusCode::OK, headers, body).into_response())
}

/// Handler for POST /messages
///
/// Validates and stores a contact message, then drops the cached list and its
/// ETag so the next GET sees the new row.
pub async fn create_message_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let started = Instant::now();

    let body: Value = if body.is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(&body).map_err(|_| AppError::InvalidBody)?
    };
    if !body.is_object() {
        return Err(AppError::InvalidBody);
    }

    let message = NewMessage::from_json(&body).map_err(AppError::Validation)?;

    state
        .db
        .query(INSERT_MESSAGE_SQL, &message.params(), QueryOptions::default())
        .await?;

    state.db.invalidate(LIST_MESSAGES_SQL, &[]).await;
    state.db.invalidate_key(MESSAGES_ETAG_KEY).await;
    info!(list_key = %cache_key(LIST_MESSAGES_SQL, &[]), "Message stored, list cache invalidated");

    let headers = [(X_RESPONSE_TIME, response_time(started, "POST /messages"))];
    Ok((
        StatusCode::CREATED,
        headers,
        Json(MessageCreatedResponse::new()),
    ))
}

/// Fallback for unsupported methods on /messages
pub async fn method_not_allowed_handler() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET, POST")],
        Json(AckResponse::new("Method not allowed")),
    )
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::from(cache.stats()))
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<AckResponse> {
    state.cache.write().await.clear();
    info!("Cache cleared");
    Json(AckResponse::new("Cache cleared"))
}

/// Handler for DELETE /cache/:key
///
/// Succeeds whether or not the key was present.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<AckResponse> {
    state.db.invalidate_key(&key).await;
    Json(AckResponse::new(format!("Key '{}' invalidated", key)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Fingerprint of a response body, quoted as an HTTP entity tag.
fn etag_for(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    let mut digest = hasher.finish().to_be_bytes().to_vec();
    digest.extend_from_slice(&(body.len() as u64).to_be_bytes());
    format!("\"{}\"", URL_SAFE_NO_PAD.encode(digest))
}

/// Formats the elapsed handler time and flags slow responses.
fn response_time(started: Instant, route: &str) -> String {
    let elapsed = started.elapsed();
    if elapsed > SLOW_RESPONSE {
        warn!(route, elapsed_ms = elapsed.as_millis() as u64, "Slow operation detected");
    }
    format!("{:.2}ms", elapsed.as_secs_f64() * 1000.0)
}
