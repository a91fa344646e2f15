use crate::domain::error::DomainError;
use crate::domain::ports::vector_index::VectorIndex;
use crate::infrastructure::index::flat::FlatIndex;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Provenance stored alongside the vectors.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct IndexMeta {
    pub build_id: String,
    pub model: String,
    pub dimension: usize,
    pub record_count: usize,
    pub built_at: DateTime<Utc>,
    /// CRC32 of the exact records file written with this index.
    pub records_crc32: u32,
}

/// A [`FlatIndex`] serialized into a single SQLite file.
pub struct SqliteIndexFile {
    path: PathBuf,
}

fn create_schema(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS vectors (
            ordinal INTEGER PRIMARY KEY,
            vector BLOB NOT NULL
        );
        ",
    )
    .map_err(|e| DomainError::Storage(format!("Schema creation failed: {e}")))
}

impl SqliteIndexFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn serialize_vector(v: &[f32]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_vector(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    /// Write `index` and `meta` into a fresh file, replacing whatever was there.
    pub fn write(&self, index: &FlatIndex, meta: &IndexMeta) -> Result<(), DomainError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        let mut conn = Connection::open(&self.path)?;
        create_schema(&conn)?;

        let tx = conn.transaction()?;
        {
            let mut meta_stmt = tx.prepare("INSERT INTO meta (key, value) VALUES (?1, ?2)")?;
            for (key, value) in [
                ("build_id", meta.build_id.clone()),
                ("model", meta.model.clone()),
                ("dimension", meta.dimension.to_string()),
                ("record_count", meta.record_count.to_string()),
                ("built_at", meta.built_at.to_rfc3339()),
                ("records_crc32", meta.records_crc32.to_string()),
            ] {
                meta_stmt.execute(params![key, value])?;
            }

            let mut vec_stmt = tx.prepare("INSERT INTO vectors (ordinal, vector) VALUES (?1, ?2)")?;
            for (ordinal, row) in index.rows().take(index.len()).enumerate() {
                vec_stmt.execute(params![ordinal as i64, Self::serialize_vector(row)])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Load the index read-only. Ordinals must run 0..n without gaps.
    pub fn read(&self) -> Result<(FlatIndex, IndexMeta), DomainError> {
        if !self.path.exists() {
            return Err(DomainError::NotFound(format!(
                "Index file {} does not exist",
                self.path.display()
            )));
        }
        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let meta = Self::read_meta(&conn)?;

        let mut index = FlatIndex::with_capacity(meta.dimension, meta.record_count);
        let mut stmt = conn.prepare("SELECT ordinal, vector FROM vectors ORDER BY ordinal")?;
        let rows = stmt.query_map([], |row| {
            let ordinal: i64 = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            Ok((ordinal, blob))
        })?;

        for (expected, row) in rows.enumerate() {
            let (ordinal, blob) = row?;
            if ordinal != expected as i64 {
                return Err(DomainError::Storage(format!(
                    "Vector ordinals are not contiguous: expected {expected}, found {ordinal}"
                )));
            }
            index.add_normalized(Self::deserialize_vector(&blob))?;
        }

        if index.len() != meta.record_count {
            return Err(DomainError::Storage(format!(
                "Index file declares {} vectors but holds {}",
                meta.record_count,
                index.len()
            )));
        }
        Ok((index, meta))
    }

    fn read_meta(conn: &Connection) -> Result<IndexMeta, DomainError> {
        let mut stmt = conn.prepare("SELECT key, value FROM meta")?;
        let map: HashMap<String, String> = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<_, _>>()?;

        let built_at = DateTime::parse_from_rfc3339(meta_field(&map, "built_at")?)
            .map_err(|e| DomainError::Storage(format!("Index metadata 'built_at' is invalid: {e}")))?
            .with_timezone(&Utc);

        Ok(IndexMeta {
            build_id: meta_field(&map, "build_id")?.to_string(),
            model: meta_field(&map, "model")?.to_string(),
            dimension: meta_number(&map, "dimension")? as usize,
            record_count: meta_number(&map, "record_count")? as usize,
            built_at,
            records_crc32: meta_number(&map, "records_crc32")? as u32,
        })
    }
}

fn meta_field<'a>(map: &'a HashMap<String, String>, key: &str) -> Result<&'a str, DomainError> {
    map.get(key)
        .map(String::as_str)
        .ok_or_else(|| DomainError::Storage(format!("Index metadata is missing '{key}'")))
}

fn meta_number(map: &HashMap<String, String>, key: &str) -> Result<u64, DomainError> {
    meta_field(map, key)?
        .parse::<u64>()
        .map_err(|e| DomainError::Storage(format!("Index metadata '{key}' is invalid: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn meta(count: usize) -> IndexMeta {
        IndexMeta {
            build_id: uuid::Uuid::new_v4().to_string(),
            model: "hashing-16".into(),
            dimension: 3,
            record_count: count,
            built_at: Utc::now(),
            records_crc32: 42,
        }
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let file = SqliteIndexFile::new(dir.path().join("index.sqlite"));
        let index = FlatIndex::build(3, vec![vec![1.0, 2.0, 2.0], vec![0.0, 0.0, 5.0]]).unwrap();
        let written = meta(2);

        file.write(&index, &written).unwrap();
        let (loaded, loaded_meta) = file.read().unwrap();

        assert_eq!(loaded, index);
        assert_eq!(loaded_meta.build_id, written.build_id);
        assert_eq!(loaded_meta.records_crc32, 42);
        assert_eq!(loaded_meta.built_at.timestamp(), written.built_at.timestamp());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let file = SqliteIndexFile::new(dir.path().join("absent.sqlite"));
        assert!(matches!(file.read(), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_count_mismatch_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = SqliteIndexFile::new(dir.path().join("index.sqlite"));
        let index = FlatIndex::build(3, vec![vec![1.0, 0.0, 0.0]]).unwrap();
        file.write(&index, &meta(5)).unwrap();
        assert!(matches!(file.read(), Err(DomainError::Storage(_))));
    }
}
