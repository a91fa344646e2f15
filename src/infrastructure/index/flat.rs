//! Exact inner-product index over L2-normalized vectors.
//!
//! Every stored row and every query goes through [`l2_normalize`], so the
//! inner product equals cosine similarity.

use crate::domain::error::DomainError;
use crate::domain::ports::vector_index::{SearchHit, VectorIndex};

/// Scale `v` to unit length. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Row-major store of normalized vectors; ordinal `i` is the `i`-th row added.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    pub fn with_capacity(dimension: usize, capacity: usize) -> Self {
        Self {
            dimension,
            data: Vec::with_capacity(dimension * capacity),
        }
    }

    /// Build from raw embeddings in record order.
    pub fn build(dimension: usize, vectors: Vec<Vec<f32>>) -> Result<Self, DomainError> {
        let mut index = Self::with_capacity(dimension, vectors.len());
        for vector in vectors {
            index.add(vector)?;
        }
        Ok(index)
    }

    /// Normalize and append one vector.
    pub fn add(&mut self, mut vector: Vec<f32>) -> Result<(), DomainError> {
        self.check_vector(&vector)?;
        l2_normalize(&mut vector);
        self.data.extend_from_slice(&vector);
        Ok(())
    }

    /// Append a row that was normalized before it was persisted.
    pub(crate) fn add_normalized(&mut self, vector: Vec<f32>) -> Result<(), DomainError> {
        self.check_vector(&vector)?;
        self.data.extend_from_slice(&vector);
        Ok(())
    }

    /// Stored (already normalized) row.
    pub fn row(&self, ordinal: usize) -> Option<&[f32]> {
        if ordinal >= self.len() {
            return None;
        }
        let start = ordinal * self.dimension;
        Some(&self.data[start..start + self.dimension])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dimension.max(1))
    }

    fn check_vector(&self, vector: &[f32]) -> Result<(), DomainError> {
        if self.dimension == 0 {
            return Err(DomainError::Index("Index dimension must be positive".into()));
        }
        if vector.len() != self.dimension {
            return Err(DomainError::Index(format!(
                "Dimension mismatch: expected {}, got {}",
                self.dimension,
                vector.len()
            )));
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(DomainError::Index("Vector contains non-finite values".into()));
        }
        Ok(())
    }
}

impl VectorIndex for FlatIndex {
    fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, DomainError> {
        if self.is_empty() || k == 0 {
            return Ok(vec![]);
        }
        self.check_vector(query)?;

        let mut query = query.to_vec();
        l2_normalize(&mut query);

        let mut hits: Vec<SearchHit> = self
            .rows()
            .enumerate()
            .map(|(ordinal, row)| SearchHit {
                ordinal,
                score: inner_product(&query, row),
            })
            .collect();

        // Stable: equal scores keep ascending ordinal order.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Ok(hits)
    }
}
