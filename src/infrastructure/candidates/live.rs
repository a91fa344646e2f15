use crate::domain::entities::restaurant::Restaurant;
use crate::domain::error::DomainError;
use crate::domain::ports::candidate_source::{CandidatePool, CandidateSource, SearchArea};
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::place_fetcher::PlaceFetcher;
use crate::domain::values::source_mode::SourceMode;
use crate::infrastructure::candidates::cache::PoolCache;
use crate::infrastructure::embeddings::embed_documents;
use crate::infrastructure::index::flat::FlatIndex;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Candidates fetched around the user and indexed for this request only.
pub struct LiveCandidates {
    fetcher: Arc<dyn PlaceFetcher>,
    embedder: Arc<dyn EmbeddingProvider>,
    cache: Option<PoolCache>,
}

impl LiveCandidates {
    pub fn new(fetcher: Arc<dyn PlaceFetcher>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            fetcher,
            embedder,
            cache: None,
        }
    }

    /// Reuse built pools for the same area for `ttl`. A zero TTL disables caching.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = (!ttl.is_zero()).then(|| PoolCache::new(ttl));
        self
    }

    async fn build_pool(&self, records: Vec<Restaurant>) -> Result<CandidatePool, DomainError> {
        let descriptions: Vec<String> = records.iter().map(Restaurant::description).collect();
        let vectors = embed_documents(self.embedder.as_ref(), &descriptions).await?;
        let index = FlatIndex::build(self.embedder.dimension(), vectors)?;
        CandidatePool::new(Arc::new(records), Arc::new(index))
    }
}

#[async_trait]
impl CandidateSource for LiveCandidates {
    fn mode(&self) -> SourceMode {
        SourceMode::Live
    }

    async fn candidates(&self, area: &SearchArea) -> Result<CandidatePool, DomainError> {
        if let Some(pool) = self.cache.as_ref().and_then(|c| c.get(area)) {
            tracing::debug!(records = pool.len(), "Using cached candidates");
            return Ok(pool);
        }

        let records = self
            .fetcher
            .fetch(area.center.lat, area.center.lon, area.radius_meters)
            .await;
        if records.is_empty() {
            return Ok(CandidatePool::empty());
        }

        let pool = self.build_pool(records).await?;
        if let Some(cache) = &self.cache {
            cache.insert(area, pool.clone());
        }
        Ok(pool)
    }
}
