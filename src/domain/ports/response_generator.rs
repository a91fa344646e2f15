use crate::domain::entities::ranked::RankedRestaurant;
use crate::domain::error::DomainError;
use async_trait::async_trait;

/// Turns ranked results into a short natural-language answer.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// `results` is never empty.
    async fn generate(&self, query: &str, results: &[RankedRestaurant]) -> Result<String, DomainError>;
}
