pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod server;

use crate::application::chat::ChatUseCase;
use crate::application::preprocess::{PreprocessReport, PreprocessUseCase};
use crate::application::recommend::{RecommendRequest, RecommendUseCase};
use crate::config::{EmbeddingBackend, GeneratorKind, Settings};
use crate::domain::entities::ranked::RankedRestaurant;
use crate::domain::error::DomainError;
use crate::domain::ports::candidate_source::CandidateSource;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::response_generator::ResponseGenerator;
use crate::domain::values::scoring::{ReferenceDistance, ScoringPolicy};
use crate::domain::values::source_mode::SourceMode;
use crate::infrastructure::candidates::{DatasetCandidates, LiveCandidates};
use crate::infrastructure::embeddings::hashing::HashingProvider;
use crate::infrastructure::embeddings::openai::OpenAiProvider;
use crate::infrastructure::feeds::overpass::OverpassFeed;
use crate::infrastructure::generation::{OpenAiChatGenerator, TemplateGenerator};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// What the running service was built from.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub mode: SourceMode,
    pub embedding_model: String,
    pub dimension: usize,
    pub generator: String,
    pub policy: ScoringPolicy,
    pub max_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
}

/// The wired service: one embedder, one candidate source, one generator.
///
/// Built once at startup and shared read-only between requests.
pub struct NearBite {
    recommend_uc: Arc<RecommendUseCase>,
    chat_uc: ChatUseCase,
    info: ServiceInfo,
}

impl NearBite {
    pub async fn from_settings(settings: &Settings) -> Result<Self, DomainError> {
        let embedder = build_embedder(settings).await?;
        let generator = build_generator(settings)?;

        let mut build_id = None;
        let mut records = None;
        let source: Arc<dyn CandidateSource> = match settings.mode {
            SourceMode::Live => {
                let fetcher = Arc::new(OverpassFeed::new(&settings.overpass_url, settings.overpass_timeout));
                Arc::new(LiveCandidates::new(fetcher, Arc::clone(&embedder)).with_cache_ttl(settings.cache_ttl))
            }
            SourceMode::Dataset => {
                let dataset = DatasetCandidates::load(&settings.data_dir, embedder.as_ref())?;
                build_id = dataset.meta().map(|m| m.build_id.clone());
                records = Some(dataset.len());
                Arc::new(dataset)
            }
        };

        let mut policy = match settings.mode {
            SourceMode::Live => ScoringPolicy::live(),
            SourceMode::Dataset => ScoringPolicy::dataset(),
        };
        if let Some(km) = settings.reference_km {
            policy = policy.with_reference(ReferenceDistance::Fixed(km));
        }

        let mut app = Self::with_providers(source, embedder, generator, policy, settings.max_k)?;
        app.info.build_id = build_id;
        app.info.records = records;
        Ok(app)
    }

    pub fn with_providers(
        source: Arc<dyn CandidateSource>,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn ResponseGenerator>,
        policy: ScoringPolicy,
        max_k: usize,
    ) -> Result<Self, DomainError> {
        let info = ServiceInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            mode: source.mode(),
            embedding_model: embedder.name().to_string(),
            dimension: embedder.dimension(),
            generator: generator.name().to_string(),
            policy,
            max_k,
            build_id: None,
            records: None,
        };
        let recommend_uc = Arc::new(RecommendUseCase::new(source, embedder, policy)?.with_max_k(max_k));
        let chat_uc = ChatUseCase::new(Arc::clone(&recommend_uc), generator);

        Ok(Self {
            recommend_uc,
            chat_uc,
            info,
        })
    }

    pub async fn recommend(&self, request: &RecommendRequest) -> Result<Vec<RankedRestaurant>, DomainError> {
        self.recommend_uc.execute(request).await
    }

    pub async fn chat(&self, request: &RecommendRequest) -> Result<String, DomainError> {
        self.chat_uc.execute(request).await
    }

    pub fn info(&self) -> &ServiceInfo {
        &self.info
    }
}

/// Offline build: CSV in, dataset artifacts out, using the configured embedder.
pub async fn preprocess(settings: &Settings, csv_path: &Path, out_dir: &Path) -> Result<PreprocessReport, DomainError> {
    let embedder = build_embedder(settings).await?;
    PreprocessUseCase::new(embedder).execute(csv_path, out_dir).await
}

pub async fn build_embedder(settings: &Settings) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
    match settings.embedding_provider {
        EmbeddingBackend::Hashing => Ok(Arc::new(HashingProvider::default())),
        EmbeddingBackend::OpenAi => {
            if settings.embedding_api_key.is_empty() {
                return Err(DomainError::Config(
                    "NEARBITE_EMBEDDING_API_KEY is required for the openai provider".into(),
                ));
            }
            // The local default names a sentence-transformers model, not an API one.
            let model = (settings.embedding_model != Settings::default().embedding_model)
                .then(|| settings.embedding_model.clone());
            let provider = OpenAiProvider::new(
                settings.embedding_api_key.clone(),
                model,
                Some(settings.embedding_base_url.clone()),
            )
            .await?;
            Ok(Arc::new(provider))
        }
        EmbeddingBackend::Local => local_embedder(settings),
    }
}

#[cfg(feature = "local-embeddings")]
fn local_embedder(settings: &Settings) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
    use crate::infrastructure::embeddings::local::LocalProvider;
    Ok(Arc::new(LocalProvider::new(
        &settings.embedding_model,
        settings.model_cache.clone(),
    )?))
}

#[cfg(not(feature = "local-embeddings"))]
fn local_embedder(_settings: &Settings) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
    Err(DomainError::Config(
        "Built without the `local-embeddings` feature; set NEARBITE_EMBEDDING_PROVIDER to openai or hashing".into(),
    ))
}

pub fn build_generator(settings: &Settings) -> Result<Arc<dyn ResponseGenerator>, DomainError> {
    match settings.generator {
        GeneratorKind::Template => Ok(Arc::new(TemplateGenerator::new())),
        GeneratorKind::OpenAi => {
            if settings.embedding_api_key.is_empty() {
                return Err(DomainError::Config(
                    "NEARBITE_EMBEDDING_API_KEY is required for the openai generator".into(),
                ));
            }
            Ok(Arc::new(OpenAiChatGenerator::new(
                settings.embedding_api_key.clone(),
                Some(settings.generator_model.clone()),
                Some(settings.embedding_base_url.clone()),
            )))
        }
    }
}
