use crate::domain::entities::restaurant::Restaurant;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::infrastructure::dataset::ingest::read_restaurants;
use crate::infrastructure::dataset::store::ArtifactStore;
use crate::infrastructure::embeddings::embed_documents;
use crate::infrastructure::index::flat::FlatIndex;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What one offline build produced.
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessReport {
    pub build_id: String,
    pub model: String,
    pub dimension: usize,
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub records: usize,
    pub output_dir: PathBuf,
    pub built_at: DateTime<Utc>,
}

/// CSV in, records file plus persisted index out.
pub struct PreprocessUseCase {
    embedder: Arc<dyn EmbeddingProvider>,
}

impl PreprocessUseCase {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder }
    }

    pub async fn execute(&self, csv_path: &Path, out_dir: &Path) -> Result<PreprocessReport, DomainError> {
        let outcome = read_restaurants(csv_path)?;
        if outcome.records.is_empty() {
            return Err(DomainError::InvalidInput(format!(
                "{} has no usable rows ({} read, all dropped)",
                csv_path.display(),
                outcome.rows_read
            )));
        }

        let descriptions: Vec<String> = outcome.records.iter().map(Restaurant::description).collect();
        tracing::info!(records = descriptions.len(), model = self.embedder.name(), "Embedding descriptions");
        let vectors = embed_documents(self.embedder.as_ref(), &descriptions).await?;
        let index = FlatIndex::build(self.embedder.dimension(), vectors)?;

        let meta = ArtifactStore::new(out_dir).save(&outcome.records, &index, self.embedder.name())?;

        Ok(PreprocessReport {
            build_id: meta.build_id,
            model: meta.model,
            dimension: meta.dimension,
            rows_read: outcome.rows_read,
            rows_dropped: outcome.rows_dropped,
            records: meta.record_count,
            output_dir: out_dir.to_path_buf(),
            built_at: meta.built_at,
        })
    }
}
