mod common;

use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use common::{hashing, live_app, spawn_mock, USER_LAT, USER_LON};
use nearbite::application::recommend::RecommendRequest;
use nearbite::domain::ports::place_fetcher::PlaceFetcher;
use nearbite::infrastructure::feeds::overpass::OverpassFeed;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

async fn elements(body: String) -> (StatusCode, String) {
    if !body.contains("node[\"amenity\"=\"restaurant\"]")
        || !body.contains("way[\"amenity\"=\"restaurant\"]")
        || !body.contains("out center;")
    {
        return (StatusCode::BAD_REQUEST, "unexpected query".into());
    }
    let payload = json!({
        "version": 0.6,
        "elements": [
            {"type": "node", "id": 11, "lat": 41.9005, "lon": 12.5005,
             "tags": {"name": "Luigi's", "amenity": "restaurant", "cuisine": "pizza"}},
            {"type": "node", "id": 12, "lat": 41.9004, "lon": 12.5004,
             "tags": {"name": "Sakura", "amenity": "restaurant", "cuisine": "sushi"}},
            {"type": "node", "id": 13, "lat": 41.9003, "lon": 12.5003,
             "tags": {"amenity": "bar"}}
        ]
    });
    (StatusCode::OK, payload.to_string())
}

async fn mock() -> String {
    let router = Router::new()
        .route("/ok", post(elements))
        .route("/error", post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "overloaded") }))
        .route("/html", post(|| async { "<html><body>rate limited</body></html>" }))
        .route("/remark", post(|| async { r#"{"remark": "runtime error: timeout"}"# }))
        .route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                r#"{"elements": []}"#
            }),
        );
    spawn_mock(router).await
}

fn feed(base: &str, path: &str) -> OverpassFeed {
    OverpassFeed::new(format!("{base}{path}"), Duration::from_secs(5))
}

#[tokio::test]
async fn test_fetch_normalizes_elements() {
    let base = mock().await;
    let records = feed(&base, "/ok").fetch(USER_LAT, USER_LON, 1000.0).await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "11");
    assert_eq!(records[0].cuisine.as_deref(), Some("pizza"));
    assert_eq!(records[1].name, "Sakura");
}

#[tokio::test]
async fn test_error_status_yields_empty() {
    let base = mock().await;
    assert!(feed(&base, "/error").fetch(USER_LAT, USER_LON, 100.0).await.is_empty());
}

#[tokio::test]
async fn test_non_json_body_yields_empty() {
    let base = mock().await;
    assert!(feed(&base, "/html").fetch(USER_LAT, USER_LON, 100.0).await.is_empty());
}

#[tokio::test]
async fn test_missing_elements_yields_empty() {
    let base = mock().await;
    assert!(feed(&base, "/remark").fetch(USER_LAT, USER_LON, 100.0).await.is_empty());
}

#[tokio::test]
async fn test_timeout_yields_empty() {
    let base = mock().await;
    let slow = OverpassFeed::new(format!("{base}/slow"), Duration::from_millis(200));
    assert!(slow.fetch(USER_LAT, USER_LON, 100.0).await.is_empty());
}

#[tokio::test]
async fn test_connection_refused_yields_empty() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let unreachable = OverpassFeed::new(format!("http://{addr}/api/interpreter"), Duration::from_secs(2));
    assert!(unreachable.fetch(USER_LAT, USER_LON, 100.0).await.is_empty());
}

#[tokio::test]
async fn test_live_recommendation_through_mock() {
    let base = mock().await;
    let app = live_app(Arc::new(feed(&base, "/ok")), hashing());

    let results = app
        .recommend(&RecommendRequest::new("pizza", USER_LAT, USER_LON).radius(1000.0))
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].restaurant.name, "Luigi's");
}

#[tokio::test]
async fn test_upstream_failure_is_an_empty_answer() {
    let base = mock().await;
    let app = live_app(Arc::new(feed(&base, "/error")), hashing());
    let results = app
        .recommend(&RecommendRequest::new("pizza", USER_LAT, USER_LON))
        .await
        .unwrap();
    assert!(results.is_empty());
}
