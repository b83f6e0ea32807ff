//! Router behavior against in-memory and failing stores.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use typespeed_core::error::{Result, TypeSpeedError};
use typespeed_relay::{
    app_state::AppState,
    router::build_router,
    store::{MemoryStore, MetricStore},
};

/// A store whose backend is gone.
struct DownStore;

#[async_trait]
impl MetricStore for DownStore {
    async fn ping(&self) -> Result<()> {
        Err(TypeSpeedError::ConnectFailure("connection refused".into()))
    }
    async fn set(&self, _: &str, _: &str) -> Result<()> {
        Err(TypeSpeedError::StoreWrite("connection refused".into()))
    }
    async fn set_if_absent(&self, _: &str, _: &str) -> Result<bool> {
        Err(TypeSpeedError::StoreWrite("connection refused".into()))
    }
    async fn get(&self, _: &str) -> Result<String> {
        Err(TypeSpeedError::StoreRead(
            "Connection refused (os error 111)".into(),
        ))
    }
}

fn app_with(store: Arc<dyn MetricStore>) -> Router {
    build_router(AppState::new(store))
}

fn request(method: Method) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn get_returns_cached_value() {
    let store = Arc::new(MemoryStore::new());
    store.set("type_speed", "87.50").await.unwrap();

    let resp = app_with(store).oneshot(request(Method::GET)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");

    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "wpm": "87.50" }));
}

#[tokio::test]
async fn any_method_reads_the_value() {
    let store = Arc::new(MemoryStore::new());
    store.set("type_speed", "70.00").await.unwrap();

    let resp = app_with(store).oneshot(request(Method::POST)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn store_down_is_500_with_raw_message() {
    let resp = app_with(Arc::new(DownStore))
        .oneshot(request(Method::GET))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Connection refused (os error 111)");
}

#[tokio::test]
async fn missing_key_is_500() {
    let resp = app_with(Arc::new(MemoryStore::new()))
        .oneshot(request(Method::GET))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(!body.is_empty());
}

#[tokio::test]
async fn options_is_bare_preflight_even_when_store_is_down() {
    let resp = app_with(Arc::new(DownStore))
        .oneshot(request(Method::OPTIONS))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let headers = resp.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, Authorization"
    );

    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(body.is_empty());
}
