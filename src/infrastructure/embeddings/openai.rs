use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Embeddings from an OpenAI-compatible `/v1/embeddings` endpoint.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    dimension: usize,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    data: Vec<OpenAiEmbedding>,
}

#[derive(Deserialize)]
struct OpenAiEmbedding {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiProvider {
    pub const DEFAULT_MODEL: &'static str = "text-embedding-3-small";

    /// Connects and embeds one probe text to learn the vector size.
    ///
    /// An unreachable or misbehaving endpoint fails here, not on the first request.
    pub async fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Result<Self, DomainError> {
        let mut provider = Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            api_key,
            model: model.unwrap_or_else(|| Self::DEFAULT_MODEL.to_string()),
            base_url: base_url
                .unwrap_or_else(|| "https://api.openai.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            dimension: 0,
        };
        provider.dimension = provider.probe_dimension().await?;
        tracing::info!(model = %provider.model, dimension = provider.dimension, "Connected to embedding API");
        Ok(provider)
    }

    async fn probe_dimension(&self) -> Result<usize, DomainError> {
        let probe = self.request(&["restaurant".to_string()]).await?;
        match probe.first().map(Vec::len) {
            Some(0) | None => Err(DomainError::Embedding(format!(
                "Model {} returned an empty probe embedding",
                self.model
            ))),
            Some(dimension) => Ok(dimension),
        }
    }

    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        let resp = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&OpenAiRequest {
                input: texts,
                model: &self.model,
            })
            .send()
            .await
            .map_err(|e| DomainError::Embedding(format!("OpenAI API error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Embedding(format!("OpenAI API {status}: {body}")));
        }

        let mut result: OpenAiResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(format!("Parse error: {e}")))?;
        if result.data.len() != texts.len() {
            return Err(DomainError::Embedding(format!(
                "OpenAI returned {} embeddings for {} inputs",
                result.data.len(),
                texts.len()
            )));
        }
        result.data.sort_by_key(|d| d.index);
        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiProvider {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let vectors = self.request(texts).await?;
        if let Some(v) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(DomainError::Embedding(format!(
                "Model {} returned {} dimensions, expected {}",
                self.model,
                v.len(),
                self.dimension
            )));
        }
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model
    }
}
