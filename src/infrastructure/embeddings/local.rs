//! Local sentence-embedding model via fastembed.
//!
//! - Model files are downloaded into the cache directory on first use
//! - Loading happens once, at construction; failure there is fatal
//! - Inference runs on the blocking thread pool

use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use fastembed::{InitOptions, TextEmbedding};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// fastembed's `embed` needs `&mut self`, hence the mutex.
pub struct LocalProvider {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    dimension: usize,
}

impl LocalProvider {
    pub const DEFAULT_MODEL: &'static str = "all-MiniLM-L6-v2";

    pub fn new(model_name: &str, cache_dir: PathBuf) -> Result<Self, DomainError> {
        let model_enum = Self::parse_model_name(model_name)?;

        std::fs::create_dir_all(&cache_dir).map_err(|e| {
            DomainError::Config(format!(
                "Failed to create model cache {}: {e}",
                cache_dir.display()
            ))
        })?;

        let options = InitOptions::new(model_enum)
            .with_cache_dir(cache_dir)
            .with_show_download_progress(false);

        let mut model = TextEmbedding::try_new(options)
            .map_err(|e| DomainError::Embedding(format!("Model initialization failed: {e}")))?;
        let dimension = Self::probe_dimension(&mut model)?;

        tracing::info!(model = model_name, dimension, "Loaded embedding model");

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            model_name: model_name.to_string(),
            dimension,
        })
    }

    fn parse_model_name(name: &str) -> Result<fastembed::EmbeddingModel, DomainError> {
        match name.to_lowercase().as_str() {
            "all-minilm-l6-v2" | "sentence-transformers/all-minilm-l6-v2" => {
                Ok(fastembed::EmbeddingModel::AllMiniLML6V2)
            }
            "all-minilm-l6-v2-q" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2Q),
            "bge-small-en-v1.5" => Ok(fastembed::EmbeddingModel::BGESmallENV15),
            "bge-base-en-v1.5" => Ok(fastembed::EmbeddingModel::BGEBaseENV15),
            _ => Err(DomainError::Config(format!(
                "Unknown model: {name}. Supported models: all-MiniLM-L6-v2, all-MiniLM-L6-v2-q, bge-small-en-v1.5, bge-base-en-v1.5"
            ))),
        }
    }

    fn probe_dimension(model: &mut TextEmbedding) -> Result<usize, DomainError> {
        let probe = model
            .embed(vec!["restaurant"], None)
            .map_err(|e| DomainError::Embedding(format!("Failed to probe dimension: {e}")))?;
        probe
            .first()
            .map(|v| v.len())
            .ok_or_else(|| DomainError::Embedding("Model returned no embedding".to_string()))
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for LocalProvider {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|e| DomainError::Embedding(format!("Failed to acquire model lock: {e}")))?;
            model
                .embed(texts, None)
                .map_err(|e| DomainError::Embedding(e.to_string()))
        })
        .await
        .map_err(|e| DomainError::Embedding(format!("Embedding task failed: {e}")))?
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_model_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = LocalProvider::new("nonexistent-model", dir.path().to_path_buf());
        assert!(matches!(result, Err(DomainError::Config(_))));
    }

    #[tokio::test]
    #[ignore = "requires model download"]
    async fn test_minilm_dimension_and_determinism() {
        let dir = tempfile::TempDir::new().unwrap();
        let provider = LocalProvider::new("all-MiniLM-L6-v2", dir.path().to_path_buf()).unwrap();
        assert_eq!(provider.dimension(), 384);

        let text = vec!["wood-fired pizza".to_string()];
        let a = provider.embed(&text, InputType::Query).await.unwrap();
        let b = provider.embed(&text, InputType::Query).await.unwrap();
        assert_eq!(a, b);
    }
}
