use crate::domain::error::DomainError;

/// One nearest-neighbor match: the ordinal of the stored vector and its inner product with the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub ordinal: usize,
    pub score: f32,
}

/// Inner-product nearest-neighbor search over normalized vectors.
///
/// Ordinals are positions in the record list the index was built from.
pub trait VectorIndex: Send + Sync {
    fn len(&self) -> usize;
    fn dimension(&self) -> usize;
    /// Top `k` hits by descending score. `k` larger than `len()` returns every vector.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, DomainError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
