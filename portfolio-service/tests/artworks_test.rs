mod common;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn tag_filter_and_limit_are_applied() {
    let app = TestApp::spawn().await;
    app.seed_artwork("Moth Queen", &["fantasy"]).await;
    app.seed_artwork("Harbor at Dusk", &["landscape"]).await;
    app.seed_artwork("Dragon Tea", &["fantasy", "cozy"]).await;
    app.seed_artwork("Portrait of M.", &["portrait"]).await;
    app.seed_artwork("Witch Market", &["fantasy"]).await;

    let response = app.get("/api/artworks?tag=fantasy&limit=2").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    let items = body["items"].as_array().expect("items should be an array");
    assert_eq!(items.len(), 2);
    for item in items {
        let tags = item["tags"].as_array().unwrap();
        assert!(tags.iter().any(|t| t == "fantasy"));
    }
}

#[tokio::test]
async fn listing_without_filter_returns_everything_up_to_default_limit() {
    let app = TestApp::spawn().await;
    for i in 0..30 {
        app.seed_artwork(&format!("Sketch {}", i), &[]).await;
    }

    let response = app.get("/api/artworks").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 24);
}

#[tokio::test]
async fn listed_artwork_carries_id_and_fields() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_artwork("Tide", &["seascape"]).await;

    let body: Value = app.get("/api/artworks").await.json().await.unwrap();
    let item = &body["items"][0];

    assert_eq!(item["id"], seeded.id.as_str());
    assert_eq!(item["title"], "Tide");
    assert_eq!(item["image_url"], "https://cdn.example/Tide.png");
    assert_eq!(item["tags"][0], "seascape");
    assert!(item["year"].is_null());
}

#[tokio::test]
async fn unknown_tag_yields_empty_list() {
    let app = TestApp::spawn().await;
    app.seed_artwork("Moth Queen", &["fantasy"]).await;

    let body: Value = app
        .get("/api/artworks?tag=brutalism")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["items"], serde_json::json!([]));
}

#[tokio::test]
async fn out_of_range_limit_is_rejected() {
    let app = TestApp::spawn().await;

    for query in ["limit=0", "limit=101", "limit=-3"] {
        let response = app.get(&format!("/api/artworks?{}", query)).await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "{} should be rejected",
            query
        );
        let body: Value = response.json().await.unwrap();
        assert!(body["fields"]["limit"].is_array());
    }
}

#[tokio::test]
async fn non_numeric_limit_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/artworks?limit=many").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert!(body["fields"]["query"].is_array());
}

#[tokio::test]
async fn listing_without_store_is_a_server_error() {
    let app = TestApp::spawn_without_store().await;

    let response = app.get("/api/artworks?tag=fantasy").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Database not initialized");
    assert!(body.get("items").is_none());
}
