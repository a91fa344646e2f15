use crate::domain::error::DomainError;

/// Some models embed queries and documents differently; others ignore this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Document,
    Query,
}

/// Maps text to fixed-length dense vectors.
///
/// Implementations are loaded once per process and must be deterministic:
/// the same text always yields the same vector.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError>;
    fn dimension(&self) -> usize;
    /// Stable model identifier, recorded next to persisted vectors.
    fn name(&self) -> &str;
}
