use crate::domain::entities::ranked::RankedRestaurant;
use crate::domain::error::DomainError;
use crate::domain::ports::candidate_source::{CandidateSource, SearchArea};
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::domain::values::geo_point::GeoPoint;
use crate::domain::values::scoring::ScoringPolicy;
use serde::Deserialize;
use std::sync::Arc;

pub const DEFAULT_RADIUS_METERS: f64 = 100.0;
pub const DEFAULT_K: usize = 5;
pub const DEFAULT_CHAT_K: usize = 20;
pub const DEFAULT_MAX_K: usize = 50;

/// One recommendation call. Radius is in meters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecommendRequest {
    pub query: String,
    pub lat: f64,
    pub lon: f64,
    pub radius_meters: f64,
    pub k: usize,
}

impl RecommendRequest {
    pub fn new(query: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            query: query.into(),
            lat,
            lon,
            radius_meters: DEFAULT_RADIUS_METERS,
            k: DEFAULT_K,
        }
    }

    pub fn radius(mut self, radius_meters: f64) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn validate(&self, max_k: usize) -> Result<SearchArea, DomainError> {
        if self.query.trim().is_empty() {
            return Err(DomainError::InvalidInput("Query must not be empty".into()));
        }
        let center = GeoPoint::new(self.lat, self.lon).map_err(DomainError::InvalidInput)?;
        if !self.radius_meters.is_finite() || self.radius_meters <= 0.0 {
            return Err(DomainError::InvalidInput(format!(
                "Radius must be a positive number of meters, got {}",
                self.radius_meters
            )));
        }
        if self.k == 0 || self.k > max_k {
            return Err(DomainError::InvalidInput(format!(
                "k must be between 1 and {max_k}, got {}",
                self.k
            )));
        }
        Ok(SearchArea {
            center,
            radius_meters: self.radius_meters,
        })
    }
}

/// Semantic retrieval re-ranked by distance and, when weighted, rating.
pub struct RecommendUseCase {
    source: Arc<dyn CandidateSource>,
    embedder: Arc<dyn EmbeddingProvider>,
    policy: ScoringPolicy,
    max_k: usize,
}

impl RecommendUseCase {
    pub fn new(
        source: Arc<dyn CandidateSource>,
        embedder: Arc<dyn EmbeddingProvider>,
        policy: ScoringPolicy,
    ) -> Result<Self, DomainError> {
        policy.validate().map_err(DomainError::Config)?;
        Ok(Self {
            source,
            embedder,
            policy,
            max_k: DEFAULT_MAX_K,
        })
    }

    pub fn with_max_k(mut self, max_k: usize) -> Self {
        self.max_k = max_k.max(1);
        self
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn max_k(&self) -> usize {
        self.max_k
    }

    pub async fn execute(&self, request: &RecommendRequest) -> Result<Vec<RankedRestaurant>, DomainError> {
        let area = request.validate(self.max_k)?;

        let pool = self.source.candidates(&area).await?;
        if pool.is_empty() {
            tracing::info!(mode = %self.source.mode(), "No candidates in range");
            return Ok(vec![]);
        }

        let query_vector = self
            .embedder
            .embed(std::slice::from_ref(&request.query), InputType::Query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::Embedding("No vector returned for the query".into()))?;

        let hits = pool.index().search(&query_vector, request.k)?;
        let radius_km = area.radius_km();

        let mut ranked = Vec::with_capacity(hits.len());
        for hit in hits {
            let restaurant = pool.records().get(hit.ordinal).cloned().ok_or_else(|| {
                DomainError::Index(format!("Hit ordinal {} has no record", hit.ordinal))
            })?;
            let distance_km = restaurant.location().map(|p| area.center.distance_km(&p));
            let similarity = f64::from(hit.score);
            let scores = self.policy.score(similarity, distance_km, restaurant.rating, radius_km);
            ranked.push(RankedRestaurant {
                restaurant,
                similarity,
                distance_km,
                distance_score: scores.distance_score,
                rating_score: scores.rating_score,
                final_score: scores.final_score,
            });
        }

        // Stable: equal final scores keep similarity order.
        ranked.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        ranked.truncate(request.k);

        tracing::debug!(
            candidates = pool.len(),
            returned = ranked.len(),
            k = request.k,
            radius_km,
            "Ranked recommendations"
        );
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_defaults() {
        let area = RecommendRequest::new("pizza", 41.9, 12.5).validate(DEFAULT_MAX_K).unwrap();
        assert_eq!(area.radius_meters, DEFAULT_RADIUS_METERS);
        assert!((area.radius_km() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let base = RecommendRequest::new("pizza", 0.0, 0.0);
        let invalid = [
            RecommendRequest::new("   ", 0.0, 0.0),
            RecommendRequest::new("pizza", 91.0, 0.0),
            RecommendRequest::new("pizza", 0.0, -180.5),
            RecommendRequest::new("pizza", f64::NAN, 0.0),
            base.clone().radius(0.0),
            base.clone().radius(f64::INFINITY),
            base.clone().k(0),
            base.clone().k(51),
        ];
        for request in invalid {
            assert!(
                matches!(request.validate(DEFAULT_MAX_K), Err(DomainError::InvalidInput(_))),
                "{request:?} should be rejected"
            );
        }
        assert!(base.k(50).validate(DEFAULT_MAX_K).is_ok());
    }
}
