use crate::domain::ports::candidate_source::{CandidatePool, SearchArea};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const DEFAULT_MAX_ENTRIES: usize = 256;

/// Cache key: coordinates rounded to 4 decimals (about 11 m) and whole meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AreaKey {
    lat: i64,
    lon: i64,
    radius: i64,
}

impl From<&SearchArea> for AreaKey {
    fn from(area: &SearchArea) -> Self {
        Self {
            lat: (area.center.lat * 10_000.0).round() as i64,
            lon: (area.center.lon * 10_000.0).round() as i64,
            radius: area.radius_meters.round() as i64,
        }
    }
}

/// Short-lived per-area cache of built candidate pools.
pub struct PoolCache {
    ttl: Duration,
    max_entries: usize,
    entries: Mutex<HashMap<AreaKey, (Instant, CandidatePool)>>,
}

impl PoolCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, area: &SearchArea) -> Option<CandidatePool> {
        let mut entries = self.entries.lock().ok()?;
        let key = AreaKey::from(area);
        match entries.get(&key) {
            Some((stored_at, pool)) if stored_at.elapsed() < self.ttl => Some(pool.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Empty pools are not stored, so a failed fetch is retried next time.
    pub fn insert(&self, area: &SearchArea, pool: CandidatePool) {
        if pool.is_empty() {
            return;
        }
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        let ttl = self.ttl;
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
        if entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, (stored_at, _))| *stored_at)
                .map(|(key, _)| *key);
            if let Some(key) = oldest {
                entries.remove(&key);
            }
        }
        entries.insert(AreaKey::from(area), (Instant::now(), pool));
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
