//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use folio_cache::{api::create_router, AppState, Config};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> (Router, AppState) {
    let state = AppState::from_config(&Config::default());
    (create_router(state.clone()), state)
}

fn create_test_app_with(config: Config) -> (Router, AppState) {
    let state = AppState::from_config(&config);
    (create_router(state.clone()), state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_message(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/messages")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_messages() -> Request<Body> {
    Request::builder().uri("/messages").body(Body::empty()).unwrap()
}

const VALID_MESSAGE: &str =
    r#"{"name":"Ada","email":"ada@example.com","message":"Hello from the contact form"}"#;

// == POST /messages ==

#[tokio::test]
async fn test_post_message_created() {
    let (app, _) = create_test_app();

    let response = app.oneshot(post_message(VALID_MESSAGE)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().contains_key("x-response-time"));
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Message sent successfully");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_post_message_validation_errors() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(post_message(r#"{"name":"","email":"not-an-email","message":"short"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    let errors: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap())
        .collect();
    assert_eq!(errors, vec!["Invalid name", "Invalid email", "Invalid message"]);
}

#[tokio::test]
async fn test_post_message_invalid_body() {
    let (app, _) = create_test_app();

    let response = app.oneshot(post_message("not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Invalid request body");
}

// == GET /messages ==

#[tokio::test]
async fn test_get_messages_empty() {
    let (app, _) = create_test_app();

    let response = app.oneshot(get_messages()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=60");
    assert!(headers.contains_key(header::ETAG));
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["messages"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_get_messages_after_post_sees_new_row() {
    let (app, _) = create_test_app();

    // Prime the cache with the empty list
    let response = app.clone().oneshot(get_messages()).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["messages"].as_array().unwrap().len(), 0);

    app.clone().oneshot(post_message(VALID_MESSAGE)).await.unwrap();

    let response = app.oneshot(get_messages()).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    let messages = json["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["name"], "Ada");
    assert_eq!(messages[0]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_get_messages_not_modified() {
    let (app, _) = create_test_app();

    let response = app.clone().oneshot(get_messages()).await.unwrap();
    let etag = response.headers()[header::ETAG].to_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/messages")
                .header(header::IF_NONE_MATCH, &etag)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(response.headers()[header::ETAG], etag.as_str());
}

#[tokio::test]
async fn test_get_messages_stale_etag_after_post() {
    let (app, _) = create_test_app();

    let response = app.clone().oneshot(get_messages()).await.unwrap();
    let etag = response.headers()[header::ETAG].to_str().unwrap().to_string();

    app.clone().oneshot(post_message(VALID_MESSAGE)).await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/messages")
                .header(header::IF_NONE_MATCH, &etag)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_ne!(response.headers()[header::ETAG], etag.as_str());
}

#[tokio::test]
async fn test_get_messages_unknown_etag() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/messages")
                .header(header::IF_NONE_MATCH, "\"something-else\"")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_messages_gzip_for_large_bodies() {
    let (app, _) = create_test_app();

    for i in 0..20 {
        let body = format!(
            r#"{{"name":"Sender {i}","email":"sender{i}@example.com","message":"This is message number {i}, long enough."}}"#
        );
        let response = app.clone().oneshot(post_message(&body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/messages")
                .header(header::ACCEPT_ENCODING, "gzip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_ENCODING], "gzip");
}

#[tokio::test]
async fn test_get_messages_small_body_not_compressed() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/messages")
                .header(header::ACCEPT_ENCODING, "gzip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(!response.headers().contains_key(header::CONTENT_ENCODING));
}

#[tokio::test]
async fn test_messages_method_not_allowed() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/messages")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let allow = response.headers()[header::ALLOW].to_str().unwrap();
    assert!(allow.contains("GET"));
    assert!(allow.contains("POST"));
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Method not allowed");
}

// == Cache Endpoints ==

#[tokio::test]
async fn test_stats_after_list() {
    let (app, _) = create_test_app();

    app.clone().oneshot(get_messages()).await.unwrap();

    let response = app
        .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    // Cached list plus its ETag
    assert_eq!(json["entry_count"], 2);
    assert!(json["size_bytes"].as_u64().unwrap() > 0);
    assert_eq!(json["max_bytes"], 100 * 1024 * 1024);
}

#[tokio::test]
async fn test_clear_cache_endpoint() {
    let (app, state) = create_test_app();

    app.clone().oneshot(get_messages()).await.unwrap();
    assert_eq!(state.cache.read().await.len(), 2);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/cache")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stats = state.cache.read().await.stats();
    assert_eq!(stats.entry_count, 0);
    assert_eq!(stats.size_bytes, 0);
}

#[tokio::test]
async fn test_invalidate_key_endpoint_idempotent() {
    let (app, state) = create_test_app();
    state.cache.write().await.set("some-key", "value", None);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/cache/some-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert!(state.cache.write().await.get("some-key").is_none());
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}

// == Expiry ==

#[tokio::test]
async fn test_cached_etag_expires_with_messages_ttl() {
    let config = Config {
        messages_ttl_ms: 20,
        default_ttl_ms: 20,
        ..Config::default()
    };
    let (app, _) = create_test_app_with(config);

    let response = app.clone().oneshot(get_messages()).await.unwrap();
    let etag = response.headers()[header::ETAG].to_str().unwrap().to_string();

    tokio::time::sleep(Duration::from_millis(50)).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/messages")
                .header(header::IF_NONE_MATCH, &etag)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // ETag expired, so the list is rebuilt even though the body is unchanged
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ETAG], etag.as_str());
}
