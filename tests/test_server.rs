mod common;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use http_body_util::BodyExt;
use nearbite::domain::entities::ranked::RankedRestaurant;
use nearbite::domain::error::DomainError;
use nearbite::domain::ports::response_generator::ResponseGenerator;
use nearbite::domain::values::scoring::ScoringPolicy;
use nearbite::infrastructure::candidates::LiveCandidates;
use nearbite::server::build_router;
use nearbite::NearBite;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

struct BrokenGenerator;

#[async_trait]
impl ResponseGenerator for BrokenGenerator {
    fn name(&self) -> &str {
        "broken"
    }

    async fn generate(&self, _query: &str, _results: &[RankedRestaurant]) -> Result<String, DomainError> {
        Err(DomainError::Generation("upstream model offline".into()))
    }
}

fn app() -> Arc<NearBite> {
    Arc::new(live_app(FixedFetcher::new(pizza_scenario()), hashing()))
}

async fn get(app: Arc<NearBite>, uri: &str) -> (StatusCode, Value) {
    let response = build_router(app)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_recommend_returns_ranked_results() {
    let (status, body) = get(app(), "/recommend?query=pizza&user_lat=41.9&user_lon=12.5&radius=1000").await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["name"], "Luigi's");
    assert_eq!(results[0]["cuisine"], "pizza");
    for field in ["similarity", "distance_km", "distance_score", "rating_score", "final_score"] {
        assert!(results[0][field].is_number(), "missing {field}");
    }
}

#[tokio::test]
async fn test_recommend_defaults_k_to_five() {
    let records = (0..8)
        .map(|i| {
            let (lat, lon) = north_of_user(0.01 * i as f64);
            place(&i.to_string(), &format!("Spot {i}"), Some("pizza"), lat, lon)
        })
        .collect();
    let app = Arc::new(live_app(FixedFetcher::new(records), hashing()));
    let (status, body) = get(app, "/recommend?query=pizza&user_lat=41.9&user_lon=12.5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_missing_query_is_bad_request() {
    let (status, body) = get(app(), "/recommend?user_lat=41.9&user_lon=12.5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_non_numeric_latitude_is_bad_request() {
    let (status, _) = get(app(), "/recommend?query=pizza&user_lat=north&user_lon=12.5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_k_is_bad_request() {
    let (status, body) = get(app(), "/recommend?query=pizza&user_lat=41.9&user_lon=12.5&k=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_chat_returns_response_text() {
    let (status, body) = get(app(), "/chat?query=pizza&user_lat=41.9&user_lon=12.5&radius=1000").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["response"].as_str().unwrap().contains("Luigi's"));
}

#[tokio::test]
async fn test_chat_with_nothing_nearby() {
    let app = Arc::new(live_app(FixedFetcher::new(vec![]), hashing()));
    let (status, body) = get(app, "/chat?query=pizza&user_lat=41.9&user_lon=12.5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Sorry, I couldn't find any restaurants nearby.");
}

#[tokio::test]
async fn test_generation_failure_is_bad_gateway() {
    let embedder = hashing();
    let source = Arc::new(LiveCandidates::new(FixedFetcher::new(pizza_scenario()), Arc::clone(&embedder)));
    let app = Arc::new(
        NearBite::with_providers(source, embedder, Arc::new(BrokenGenerator), ScoringPolicy::live(), 50).unwrap(),
    );

    let (status, body) = get(app, "/chat?query=pizza&user_lat=41.9&user_lon=12.5&radius=1000").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "GENERATION_ERROR");
}

#[tokio::test]
async fn test_info_reports_configuration() {
    let (status, body) = get(app(), "/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "live");
    assert_eq!(body["embedding_model"], "hashing-256");
    assert_eq!(body["dimension"], 256);
    assert_eq!(body["generator"], "template");
}
