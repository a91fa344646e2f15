use crate::application::recommend::{RecommendRequest, RecommendUseCase};
use crate::domain::error::DomainError;
use crate::domain::ports::response_generator::ResponseGenerator;
use std::sync::Arc;

pub const NO_RESULTS_RESPONSE: &str = "Sorry, I couldn't find any restaurants nearby.";

/// Ranks, then asks a generator to explain the best picks.
pub struct ChatUseCase {
    recommend: Arc<RecommendUseCase>,
    generator: Arc<dyn ResponseGenerator>,
}

impl ChatUseCase {
    pub fn new(recommend: Arc<RecommendUseCase>, generator: Arc<dyn ResponseGenerator>) -> Self {
        Self { recommend, generator }
    }

    pub async fn execute(&self, request: &RecommendRequest) -> Result<String, DomainError> {
        let results = self.recommend.execute(request).await?;
        if results.is_empty() {
            return Ok(NO_RESULTS_RESPONSE.to_string());
        }
        tracing::debug!(generator = self.generator.name(), results = results.len(), "Generating chat response");
        self.generator.generate(&request.query, &results).await
    }
}
