pub mod hashing;
#[cfg(feature = "local-embeddings")]
pub mod local;
pub mod openai;

use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};

/// Descriptions per provider call.
pub const EMBED_BATCH_SIZE: usize = 32;

/// Embed documents in fixed-size batches, preserving input order.
pub async fn embed_documents(
    embedder: &dyn EmbeddingProvider,
    texts: &[String],
) -> Result<Vec<Vec<f32>>, DomainError> {
    let mut vectors = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(EMBED_BATCH_SIZE) {
        let batch = embedder.embed(chunk, InputType::Document).await?;
        if batch.len() != chunk.len() {
            return Err(DomainError::Embedding(format!(
                "{} returned {} vectors for {} texts",
                embedder.name(),
                batch.len(),
                chunk.len()
            )));
        }
        vectors.extend(batch);
    }
    Ok(vectors)
}
