use crate::application::recommend::{RecommendRequest, DEFAULT_CHAT_K, DEFAULT_K, DEFAULT_RADIUS_METERS};
use crate::domain::entities::ranked::RankedRestaurant;
use crate::server::error::ApiError;
use crate::{NearBite, ServiceInfo};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query string shared by `/recommend` and `/chat`. `radius` is in meters.
#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    pub query: String,
    pub user_lat: f64,
    pub user_lon: f64,
    #[serde(default = "default_radius")]
    pub radius: f64,
    pub k: Option<usize>,
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS_METERS
}

impl RecommendParams {
    fn into_request(self, default_k: usize) -> RecommendRequest {
        RecommendRequest {
            query: self.query,
            lat: self.user_lat,
            lon: self.user_lon,
            radius_meters: self.radius,
            k: self.k.unwrap_or(default_k),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub results: Vec<RankedRestaurant>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn info(State(app): State<Arc<NearBite>>) -> Json<ServiceInfo> {
    Json(app.info().clone())
}

pub async fn recommend(
    State(app): State<Arc<NearBite>>,
    params: Result<Query<RecommendParams>, QueryRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let Query(params) = params?;
    let request = params.into_request(DEFAULT_K);
    let results = app.recommend(&request).await?;
    tracing::info!(query = %request.query, k = request.k, returned = results.len(), "recommend");
    Ok(Json(RecommendResponse { results }))
}

pub async fn chat(
    State(app): State<Arc<NearBite>>,
    params: Result<Query<RecommendParams>, QueryRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Query(params) = params?;
    let request = params.into_request(DEFAULT_CHAT_K);
    let response = app.chat(&request).await?;
    Ok(Json(ChatResponse { response }))
}
