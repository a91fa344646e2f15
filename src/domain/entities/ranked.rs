use crate::domain::entities::restaurant::Restaurant;
use serde::{Deserialize, Serialize};

/// A restaurant with the scores that placed it in the result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRestaurant {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    /// Inner product between the query and description embeddings.
    pub similarity: f64,
    /// `None` when the record has no usable coordinates.
    pub distance_km: Option<f64>,
    pub distance_score: f64,
    pub rating_score: f64,
    pub final_score: f64,
}
