use crate::domain::entities::restaurant::Restaurant;
use crate::domain::error::DomainError;
use crate::domain::ports::candidate_source::{CandidatePool, CandidateSource, SearchArea};
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::values::source_mode::SourceMode;
use crate::infrastructure::dataset::store::ArtifactStore;
use crate::infrastructure::index::flat::FlatIndex;
use crate::infrastructure::index::sqlite::IndexMeta;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Preprocessed records and index, loaded once and shared read-only.
pub struct DatasetCandidates {
    pool: CandidatePool,
    meta: Option<IndexMeta>,
}

impl DatasetCandidates {
    /// Load artifacts built with the same model as `embedder`.
    pub fn load(dir: &Path, embedder: &dyn EmbeddingProvider) -> Result<Self, DomainError> {
        let (records, index, meta) = ArtifactStore::new(dir).load(embedder.name(), embedder.dimension())?;
        tracing::info!(
            build_id = %meta.build_id,
            records = records.len(),
            model = %meta.model,
            built_at = %meta.built_at,
            "Loaded dataset artifacts"
        );
        Ok(Self {
            pool: CandidatePool::new(Arc::new(records), Arc::new(index))?,
            meta: Some(meta),
        })
    }

    /// In-memory dataset, for callers that already hold records and their index.
    pub fn from_parts(records: Vec<Restaurant>, index: FlatIndex) -> Result<Self, DomainError> {
        Ok(Self {
            pool: CandidatePool::new(Arc::new(records), Arc::new(index))?,
            meta: None,
        })
    }

    pub fn meta(&self) -> Option<&IndexMeta> {
        self.meta.as_ref()
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

#[async_trait]
impl CandidateSource for DatasetCandidates {
    fn mode(&self) -> SourceMode {
        SourceMode::Dataset
    }

    async fn candidates(&self, _area: &SearchArea) -> Result<CandidatePool, DomainError> {
        Ok(self.pool.clone())
    }
}
