//! Shared test helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use nearbite::domain::entities::restaurant::Restaurant;
use nearbite::domain::error::DomainError;
use nearbite::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use nearbite::domain::ports::place_fetcher::PlaceFetcher;
use nearbite::domain::values::scoring::ScoringPolicy;
use nearbite::infrastructure::candidates::LiveCandidates;
use nearbite::infrastructure::embeddings::hashing::HashingProvider;
use nearbite::infrastructure::generation::TemplateGenerator;
use nearbite::NearBite;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const USER_LAT: f64 = 41.9;
pub const USER_LON: f64 = 12.5;

/// Returns the same records for every area and counts the calls.
pub struct FixedFetcher {
    records: Vec<Restaurant>,
    calls: AtomicUsize,
}

impl FixedFetcher {
    pub fn new(records: Vec<Restaurant>) -> Arc<Self> {
        Arc::new(Self {
            records,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlaceFetcher for FixedFetcher {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn fetch(&self, _lat: f64, _lon: f64, _radius_meters: f64) -> Vec<Restaurant> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.records.clone()
    }
}

/// Every text maps to the same vector, so similarity is always 1.
pub struct ConstantProvider;

#[async_trait]
impl EmbeddingProvider for ConstantProvider {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0, 0.0, 0.0]).collect())
    }

    fn dimension(&self) -> usize {
        4
    }

    fn name(&self) -> &str {
        "constant"
    }
}

/// Fails every call.
pub struct FailingProvider;

#[async_trait]
impl EmbeddingProvider for FailingProvider {
    async fn embed(&self, _texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        Err(DomainError::Embedding("model unavailable".into()))
    }

    fn dimension(&self) -> usize {
        4
    }

    fn name(&self) -> &str {
        "failing"
    }
}

pub fn place(id: &str, name: &str, cuisine: Option<&str>, lat: f64, lon: f64) -> Restaurant {
    Restaurant {
        cuisine: cuisine.map(str::to_string),
        lat: Some(lat),
        lon: Some(lon),
        amenity: Some("restaurant".into()),
        ..Restaurant::new(id, name)
    }
}

/// A point `km` due north of the user.
pub fn north_of_user(km: f64) -> (f64, f64) {
    (USER_LAT + km / 111.194_926_644_558_73, USER_LON)
}

/// Luigi's serves pizza but sits furthest away of the three.
pub fn pizza_scenario() -> Vec<Restaurant> {
    vec![
        place("1", "Luigi's", Some("pizza"), 41.9005, 12.5005),
        place("2", "Sakura", Some("sushi"), 41.9004, 12.5004),
        Restaurant {
            amenity: Some("bar".into()),
            ..place("3", "The Tap", None, 41.9003, 12.5003)
        },
    ]
}

pub fn live_app(fetcher: Arc<dyn PlaceFetcher>, embedder: Arc<dyn EmbeddingProvider>) -> NearBite {
    live_app_with_ttl(fetcher, embedder, Duration::ZERO)
}

pub fn live_app_with_ttl(
    fetcher: Arc<dyn PlaceFetcher>,
    embedder: Arc<dyn EmbeddingProvider>,
    ttl: Duration,
) -> NearBite {
    let source = Arc::new(LiveCandidates::new(fetcher, Arc::clone(&embedder)).with_cache_ttl(ttl));
    NearBite::with_providers(source, embedder, Arc::new(TemplateGenerator::new()), ScoringPolicy::live(), 50).unwrap()
}

pub fn hashing() -> Arc<dyn EmbeddingProvider> {
    Arc::new(HashingProvider::default())
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_mock(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
