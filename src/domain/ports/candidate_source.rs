use crate::domain::entities::restaurant::Restaurant;
use crate::domain::error::DomainError;
use crate::domain::ports::vector_index::{SearchHit, VectorIndex};
use crate::domain::values::geo_point::GeoPoint;
use crate::domain::values::source_mode::SourceMode;
use async_trait::async_trait;
use std::sync::Arc;

/// The circle a request searches in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchArea {
    pub center: GeoPoint,
    pub radius_meters: f64,
}

impl SearchArea {
    pub fn radius_km(&self) -> f64 {
        self.radius_meters / 1000.0
    }
}

/// Records plus the index built over their descriptions.
///
/// Ordinal `i` in the index is record `i`; the constructor refuses pairs of
/// different sizes.
#[derive(Clone)]
pub struct CandidatePool {
    records: Arc<Vec<Restaurant>>,
    index: Arc<dyn VectorIndex>,
}

impl CandidatePool {
    pub fn new(records: Arc<Vec<Restaurant>>, index: Arc<dyn VectorIndex>) -> Result<Self, DomainError> {
        if records.len() != index.len() {
            return Err(DomainError::Index(format!(
                "Index holds {} vectors but there are {} records",
                index.len(),
                records.len()
            )));
        }
        Ok(Self { records, index })
    }

    pub fn empty() -> Self {
        Self {
            records: Arc::new(Vec::new()),
            index: Arc::new(EmptyIndex),
        }
    }

    pub fn records(&self) -> &[Restaurant] {
        &self.records
    }

    pub fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl std::fmt::Debug for CandidatePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidatePool")
            .field("records", &self.records.len())
            .field("dimension", &self.index.dimension())
            .finish()
    }
}

struct EmptyIndex;

impl VectorIndex for EmptyIndex {
    fn len(&self) -> usize {
        0
    }

    fn dimension(&self) -> usize {
        0
    }

    fn search(&self, _query: &[f32], _k: usize) -> Result<Vec<SearchHit>, DomainError> {
        Ok(vec![])
    }
}

/// Supplies the restaurants a request is ranked over.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    fn mode(&self) -> SourceMode;

    async fn candidates(&self, area: &SearchArea) -> Result<CandidatePool, DomainError>;
}
