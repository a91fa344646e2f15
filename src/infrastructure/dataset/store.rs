use crate::domain::entities::restaurant::Restaurant;
use crate::domain::error::DomainError;
use crate::domain::ports::vector_index::VectorIndex;
use crate::infrastructure::index::flat::FlatIndex;
use crate::infrastructure::index::sqlite::{IndexMeta, SqliteIndexFile};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

pub const RECORDS_FILE: &str = "records.json";
pub const INDEX_FILE: &str = "index.sqlite";

/// The records file and the index file of one preprocessing run.
///
/// The index meta carries a CRC32 of the records file, so a pair written by
/// different runs is refused on load.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn records_path(&self) -> PathBuf {
        self.dir.join(RECORDS_FILE)
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    pub fn exists(&self) -> bool {
        self.records_path().exists() && self.index_path().exists()
    }

    /// Write both artifacts under temporary names, then rename them into place.
    pub fn save(
        &self,
        records: &[Restaurant],
        index: &FlatIndex,
        model: &str,
    ) -> Result<IndexMeta, DomainError> {
        if records.len() != index.len() {
            return Err(DomainError::Index(format!(
                "Refusing to save {} records with {} vectors",
                records.len(),
                index.len()
            )));
        }
        fs::create_dir_all(&self.dir)?;

        let records_json = serde_json::to_vec_pretty(records)?;
        let meta = IndexMeta {
            build_id: uuid::Uuid::new_v4().to_string(),
            model: model.to_string(),
            dimension: index.dimension(),
            record_count: records.len(),
            built_at: Utc::now(),
            records_crc32: crc32fast::hash(&records_json),
        };

        let records_tmp = self.dir.join(format!("{RECORDS_FILE}.tmp"));
        let index_tmp = self.dir.join(format!("{INDEX_FILE}.tmp"));
        fs::write(&records_tmp, &records_json)?;
        SqliteIndexFile::new(&index_tmp).write(index, &meta)?;

        fs::rename(&index_tmp, self.index_path())?;
        fs::rename(&records_tmp, self.records_path())?;

        tracing::info!(
            dir = %self.dir.display(),
            build_id = %meta.build_id,
            records = meta.record_count,
            dimension = meta.dimension,
            "Saved dataset artifacts"
        );
        Ok(meta)
    }

    /// Load and cross-check both artifacts against each other and the active model.
    pub fn load(
        &self,
        expected_model: &str,
        expected_dimension: usize,
    ) -> Result<(Vec<Restaurant>, FlatIndex, IndexMeta), DomainError> {
        let records_path = self.records_path();
        let records_json = fs::read(&records_path).map_err(|e| {
            DomainError::NotFound(format!(
                "Cannot read {}: {e}. Run `nearbite preprocess` first",
                records_path.display()
            ))
        })?;
        let (index, meta) = SqliteIndexFile::new(self.index_path()).read()?;

        let crc = crc32fast::hash(&records_json);
        if crc != meta.records_crc32 {
            return Err(DomainError::Storage(format!(
                "{RECORDS_FILE} does not belong to {INDEX_FILE} (crc {crc:08x}, expected {:08x})",
                meta.records_crc32
            )));
        }

        let records: Vec<Restaurant> = serde_json::from_slice(&records_json)?;
        if records.len() != meta.record_count || records.len() != index.len() {
            return Err(DomainError::Storage(format!(
                "Artifact size mismatch: {} records, {} vectors, {} declared",
                records.len(),
                index.len(),
                meta.record_count
            )));
        }

        if meta.model != expected_model {
            return Err(DomainError::Config(format!(
                "Artifacts were built with model '{}' but the active model is '{expected_model}'",
                meta.model
            )));
        }
        if meta.dimension != expected_dimension {
            return Err(DomainError::Config(format!(
                "Artifacts have dimension {} but the active model produces {expected_dimension}",
                meta.dimension
            )));
        }

        Ok((records, index, meta))
    }
}
