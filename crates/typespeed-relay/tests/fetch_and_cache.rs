//! End-to-end: mocked upstream -> scheduler tick -> store -> HTTP read.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use tower::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use typespeed_core::ErrorKind;
use typespeed_relay::{
    app_state::AppState,
    config::{FailurePolicy, ScheduleSection, UpstreamSection},
    fetcher::{ApiFetcher, MetricSource},
    router::build_router,
    scheduler::{Scheduler, TickOutcome},
    store::{MemoryStore, MetricStore, SharedStore},
};

fn upstream(server: &MockServer) -> UpstreamSection {
    UpstreamSection {
        url: format!("{}/results/last", server.uri()),
        api_key: "secret-key".into(),
        auth_scheme: "ApeKey".into(),
    }
}

fn keep() -> ScheduleSection {
    ScheduleSection {
        interval_secs: 5,
        on_failure: FailurePolicy::Keep,
    }
}

#[tokio::test]
async fn fetcher_forwards_ape_key_and_formats_wpm() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results/last"))
        .and(header("Authorization", "ApeKey secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Last result retrieved",
            "data": { "wpm": 87.5, "acc": 96.1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ApiFetcher::new(&upstream(&server)).unwrap();
    assert_eq!(fetcher.fetch().await.unwrap(), "87.50");
}

#[tokio::test]
async fn non_json_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let fetcher = ApiFetcher::new(&upstream(&server)).unwrap();
    let err = fetcher.fetch().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeError);
}

#[tokio::test]
async fn error_status_with_json_body_is_judged_by_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "message": "Invalid ApeKey" })),
        )
        .mount(&server)
        .await;

    let fetcher = ApiFetcher::new(&upstream(&server)).unwrap();
    let err = fetcher.fetch().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingField);
}

#[tokio::test]
async fn tick_then_get_serves_the_fetched_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results/last"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": { "wpm": 112.25 } })),
        )
        .mount(&server)
        .await;

    let store: SharedStore = Arc::new(MemoryStore::new());
    let fetcher = Arc::new(ApiFetcher::new(&upstream(&server)).unwrap());
    let scheduler = Scheduler::new(fetcher, store.clone(), &keep()).unwrap();

    assert_eq!(scheduler.tick().await, TickOutcome::Stored("112.25".into()));

    let resp = build_router(AppState::new(store))
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["wpm"], "112.25");
}

#[tokio::test]
async fn failed_tick_keeps_previous_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": { "wpm": 90 } })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let store: SharedStore = Arc::new(MemoryStore::new());
    let fetcher = Arc::new(ApiFetcher::new(&upstream(&server)).unwrap());
    let scheduler = Scheduler::new(fetcher, store.clone(), &keep()).unwrap();

    assert_eq!(scheduler.tick().await, TickOutcome::Stored("90.00".into()));
    assert_eq!(scheduler.tick().await, TickOutcome::Skipped);
    assert_eq!(store.get("type_speed").await.unwrap(), "90.00");
}

#[tokio::test]
async fn concurrent_reads_see_whole_values() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    store.set("type_speed", "0").await.unwrap();
    let app = build_router(AppState::new(store.clone()));

    let writer = {
        let store = store.clone();
        tokio::spawn(async move {
            for n in 1..=50u32 {
                store.set("type_speed", &format!("{n}.00")).await.unwrap();
                tokio::task::yield_now().await;
            }
        })
    };

    for _ in 0..50 {
        let resp = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let wpm = json["wpm"].as_str().unwrap();
        assert!(wpm == "0" || wpm.ends_with(".00"), "torn value: {wpm}");
    }

    writer.await.unwrap();
    assert_eq!(store.get("type_speed").await.unwrap(), "50.00");
}
