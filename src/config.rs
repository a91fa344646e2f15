//! Runtime settings, read from `NEARBITE_*` environment variables.

use crate::application::recommend::DEFAULT_MAX_K;
use crate::domain::error::DomainError;
use crate::domain::values::source_mode::SourceMode;
use crate::infrastructure::feeds::overpass::{DEFAULT_OVERPASS_URL, DEFAULT_TIMEOUT};
use crate::infrastructure::generation::openai_chat::DEFAULT_CHAT_MODEL;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const ENV_PREFIX: &str = "NEARBITE_";

/// Default local sentence-embedding model
const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL_CACHE: &str = ".nearbite/models";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_BIND: &str = "127.0.0.1:8000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    Local,
    OpenAi,
    Hashing,
}

impl FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "fastembed" => Ok(Self::Local),
            "openai" => Ok(Self::OpenAi),
            "hashing" => Ok(Self::Hashing),
            _ => Err(format!("Unknown embedding provider: {s} (expected local, openai or hashing)")),
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::OpenAi => write!(f, "openai"),
            Self::Hashing => write!(f, "hashing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    Template,
    OpenAi,
}

impl FromStr for GeneratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "template" => Ok(Self::Template),
            "openai" => Ok(Self::OpenAi),
            _ => Err(format!("Unknown generator: {s} (expected template or openai)")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub mode: SourceMode,
    pub embedding_provider: EmbeddingBackend,
    pub embedding_model: String,
    #[serde(skip_serializing)]
    pub embedding_api_key: String,
    pub embedding_base_url: String,
    pub model_cache: PathBuf,
    pub data_dir: PathBuf,
    pub overpass_url: String,
    pub overpass_timeout: Duration,
    pub cache_ttl: Duration,
    /// Fixed distance-score reference overriding the mode preset.
    pub reference_km: Option<f64>,
    pub max_k: usize,
    pub generator: GeneratorKind,
    pub generator_model: String,
    pub bind: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: SourceMode::Live,
            embedding_provider: EmbeddingBackend::Local,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_api_key: String::new(),
            embedding_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model_cache: PathBuf::from(DEFAULT_MODEL_CACHE),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            overpass_timeout: DEFAULT_TIMEOUT,
            cache_ttl: Duration::ZERO,
            reference_km: None,
            max_k: DEFAULT_MAX_K,
            generator: GeneratorKind::Template,
            generator_model: DEFAULT_CHAT_MODEL.to_string(),
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset or blank keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut s = Self::default();

        if let Some(v) = get("MODE") {
            s.mode = parse_setting("MODE", &v)?;
        }
        if let Some(v) = get("EMBEDDING_PROVIDER") {
            s.embedding_provider = parse_setting("EMBEDDING_PROVIDER", &v)?;
        }
        if let Some(v) = get("EMBEDDING_MODEL") {
            s.embedding_model = v;
        }
        if let Some(v) = get("EMBEDDING_API_KEY") {
            s.embedding_api_key = v;
        }
        if let Some(v) = get("EMBEDDING_BASE_URL") {
            s.embedding_base_url = v;
        }
        if let Some(v) = get("MODEL_CACHE") {
            s.model_cache = PathBuf::from(v);
        }
        if let Some(v) = get("DATA_DIR") {
            s.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get("OVERPASS_URL") {
            s.overpass_url = v;
        }
        if let Some(v) = get("OVERPASS_TIMEOUT_SECS") {
            let secs: u64 = parse_setting("OVERPASS_TIMEOUT_SECS", &v)?;
            if secs == 0 {
                return Err(DomainError::Config(format!("{ENV_PREFIX}OVERPASS_TIMEOUT_SECS must be positive")));
            }
            s.overpass_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = get("CACHE_TTL_SECS") {
            s.cache_ttl = Duration::from_secs(parse_setting("CACHE_TTL_SECS", &v)?);
        }
        if let Some(v) = get("REFERENCE_KM") {
            let km: f64 = parse_setting("REFERENCE_KM", &v)?;
            if !km.is_finite() || km <= 0.0 {
                return Err(DomainError::Config(format!("{ENV_PREFIX}REFERENCE_KM must be positive, got {km}")));
            }
            s.reference_km = Some(km);
        }
        if let Some(v) = get("MAX_K") {
            let max_k: usize = parse_setting("MAX_K", &v)?;
            if max_k == 0 {
                return Err(DomainError::Config(format!("{ENV_PREFIX}MAX_K must be at least 1")));
            }
            s.max_k = max_k;
        }
        if let Some(v) = get("GENERATOR") {
            s.generator = parse_setting("GENERATOR", &v)?;
        }
        if let Some(v) = get("GENERATOR_MODEL") {
            s.generator_model = v;
        }
        if let Some(v) = get("BIND") {
            s.bind = v;
        }
        Ok(s)
    }
}

fn parse_setting<T>(name: &str, value: &str) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| DomainError::Config(format!("{ENV_PREFIX}{name}={value:?}: {e}")))
}
