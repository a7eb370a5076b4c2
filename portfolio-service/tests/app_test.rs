mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{memory_state, TestApp};
use portfolio_service::handlers::{HELLO_MESSAGE, ROOT_MESSAGE};
use portfolio_service::startup::build_router;
use serde_json::Value;
use service_core::middleware::REQUEST_ID_HEADER;
use tower::util::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_and_hello_return_fixed_messages() {
    let (_, state) = memory_state();
    let app = build_router(state);

    for (uri, expected) in [("/", ROOT_MESSAGE), ("/api/hello", HELLO_MESSAGE)] {
        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["message"], expected);
        }
    }
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let (_, state) = memory_state();
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/hello")
                .header(REQUEST_ID_HEADER, "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let (_, state) = memory_state();
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/artworks")
                .header("origin", "https://portfolio.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (_, state) = memory_state();
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("/api/nope"));
}

#[tokio::test]
async fn health_and_readiness_with_store() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");

    assert_eq!(app.get("/ready").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn readiness_fails_without_store() {
    let app = TestApp::spawn_without_store().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["database"], "not configured");

    assert_eq!(
        app.get("/ready").await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn diagnostics_report_store_state() {
    let app = TestApp::spawn().await;
    app.seed_artwork("Moth Queen", &["fantasy"]).await;

    let body: Value = app.get("/test").await.json().await.unwrap();

    assert_eq!(body["backend"], "running");
    assert_eq!(body["database_url"], "set");
    assert_eq!(body["database_name"], "portfolio_test");
    assert_eq!(body["connection_status"], "connected");
    assert_eq!(body["collections"], serde_json::json!(["artwork"]));
}

#[tokio::test]
async fn diagnostics_without_store_still_answer() {
    let app = TestApp::spawn_without_store().await;

    let response = app.get("/test").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["database_url"], "not set");
    assert_eq!(body["connection_status"], "not connected");
    assert_eq!(body["database_name"], "portfolio_test");
    assert_eq!(body["database"], "not available");
}
