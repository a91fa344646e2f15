mod common;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use common::spawn_mock;
use nearbite::domain::entities::ranked::RankedRestaurant;
use nearbite::domain::entities::restaurant::Restaurant;
use nearbite::domain::error::DomainError;
use nearbite::domain::ports::response_generator::ResponseGenerator;
use nearbite::infrastructure::generation::OpenAiChatGenerator;
use serde_json::{json, Value};

fn results() -> Vec<RankedRestaurant> {
    let mut restaurant = Restaurant::new("1", "Luigi's");
    restaurant.cuisine = Some("pizza".into());
    vec![RankedRestaurant {
        restaurant,
        similarity: 0.8,
        distance_km: Some(0.24),
        distance_score: 0.75,
        rating_score: 0.0,
        final_score: 0.78,
    }]
}

async fn completions(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer test-key");
    let messages = body["messages"].as_array().cloned().unwrap_or_default();
    let well_formed = authorized
        && body["model"] == "gpt-4o-mini"
        && (body["temperature"].as_f64().unwrap_or_default() - 0.3).abs() < 1e-6
        && body["max_tokens"] == 350
        && messages.len() == 2
        && messages[0]["role"] == "system"
        && messages[0]["content"].as_str().unwrap_or_default().contains("Do not use Markdown.")
        && messages[1]["content"]
            .as_str()
            .unwrap_or_default()
            .contains("- Luigi's (pizza), 0.2 km");
    if !well_formed {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "unexpected request"})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "choices": [{"message": {"role": "assistant", "content": "  Luigi's is the pizza place closest to you.  "}}]
        })),
    )
}

async fn mock() -> String {
    let router = Router::new()
        .route("/v1/chat/completions", post(completions))
        .route("/down/v1/chat/completions", post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }))
        .route("/empty/v1/chat/completions", post(|| async { Json(json!({"choices": []})) }));
    spawn_mock(router).await
}

#[tokio::test]
async fn test_chat_completion_is_trimmed() {
    let base = mock().await;
    let generator = OpenAiChatGenerator::new("test-key".into(), None, Some(base));
    let text = generator.generate("pizza", &results()).await.unwrap();
    assert_eq!(text, "Luigi's is the pizza place closest to you.");
}

#[tokio::test]
async fn test_upstream_error_is_generation_error() {
    let base = mock().await;
    let generator = OpenAiChatGenerator::new("test-key".into(), None, Some(format!("{base}/down")));
    let result = generator.generate("pizza", &results()).await;
    assert!(matches!(result, Err(DomainError::Generation(_))));
}

#[tokio::test]
async fn test_empty_choices_is_generation_error() {
    let base = mock().await;
    let generator = OpenAiChatGenerator::new("test-key".into(), None, Some(format!("{base}/empty")));
    let result = generator.generate("pizza", &results()).await;
    assert!(matches!(result, Err(DomainError::Generation(_))));
}
