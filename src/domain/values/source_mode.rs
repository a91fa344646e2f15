use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where candidate restaurants come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Fetched from the map service on every request.
    Live,
    /// Loaded once from preprocessed artifacts.
    Dataset,
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMode::Live => write!(f, "live"),
            SourceMode::Dataset => write!(f, "dataset"),
        }
    }
}

impl FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" | "osm" | "overpass" => Ok(SourceMode::Live),
            "dataset" | "static" => Ok(SourceMode::Dataset),
            _ => Err(format!("Unknown source mode: {s}")),
        }
    }
}
