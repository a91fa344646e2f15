//! Scoring policy for blending semantic similarity with distance and rating.
//!
//! A policy is plain data: the ranking engine asks it for sub-scores and the
//! weighted total, so weights can be swapped or tested without any retrieval.

use serde::{Deserialize, Serialize};

/// Fixed reference distance used by the dataset preset.
pub const DATASET_REFERENCE_KM: f64 = 100.0;

/// Highest rating on the dataset scale.
pub const MAX_RATING: f64 = 5.0;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Convex weights applied to each normalized sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub similarity: f64,
    pub distance: f64,
    pub rating: f64,
}

/// Distance at which the distance score reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "km")]
pub enum ReferenceDistance {
    /// Use the request's search radius.
    SearchRadius,
    /// Use a constant distance regardless of the request.
    Fixed(f64),
}

impl ReferenceDistance {
    pub fn resolve_km(&self, radius_km: f64) -> f64 {
        match self {
            ReferenceDistance::SearchRadius => radius_km,
            ReferenceDistance::Fixed(km) => *km,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub weights: Weights,
    pub reference: ReferenceDistance,
}

/// The three sub-scores and their weighted sum for one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub distance_score: f64,
    pub rating_score: f64,
    pub final_score: f64,
}

impl ScoringPolicy {
    /// Live map data: similarity 0.6, distance 0.4, scaled by the search radius.
    pub fn live() -> Self {
        Self {
            weights: Weights {
                similarity: 0.6,
                distance: 0.4,
                rating: 0.0,
            },
            reference: ReferenceDistance::SearchRadius,
        }
    }

    /// Rated dataset: similarity 0.4, distance 0.35, rating 0.25, scaled by 100 km.
    pub fn dataset() -> Self {
        Self {
            weights: Weights {
                similarity: 0.4,
                distance: 0.35,
                rating: 0.25,
            },
            reference: ReferenceDistance::Fixed(DATASET_REFERENCE_KM),
        }
    }

    pub fn with_reference(mut self, reference: ReferenceDistance) -> Self {
        self.reference = reference;
        self
    }

    /// Weights must be finite, non-negative and sum to one; a fixed reference must be positive.
    pub fn validate(&self) -> Result<(), String> {
        let w = &self.weights;
        for (name, value) in [
            ("similarity", w.similarity),
            ("distance", w.distance),
            ("rating", w.rating),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("Weight '{name}' must be a non-negative number, got {value}"));
            }
        }
        let sum = w.similarity + w.distance + w.rating;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(format!("Weights must sum to 1.0, got {sum}"));
        }
        if let ReferenceDistance::Fixed(km) = self.reference {
            if !km.is_finite() || km <= 0.0 {
                return Err(format!("Reference distance must be positive, got {km}"));
            }
        }
        Ok(())
    }

    /// `max(0, 1 - d / reference)`; unknown distance scores zero.
    pub fn distance_score(&self, distance_km: Option<f64>, radius_km: f64) -> f64 {
        let reference_km = self.reference.resolve_km(radius_km);
        match distance_km {
            Some(d) if d.is_finite() && reference_km > 0.0 => (1.0 - d / reference_km).max(0.0),
            _ => 0.0,
        }
    }

    /// `rating / 5` clamped to [0, 1]; unrated scores zero.
    pub fn rating_score(&self, rating: Option<f64>) -> f64 {
        rating
            .filter(|r| r.is_finite())
            .map(|r| (r / MAX_RATING).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }

    pub fn score(
        &self,
        similarity: f64,
        distance_km: Option<f64>,
        rating: Option<f64>,
        radius_km: f64,
    ) -> ScoreBreakdown {
        let distance_score = self.distance_score(distance_km, radius_km);
        let rating_score = self.rating_score(rating);
        let final_score = self.weights.similarity * similarity
            + self.weights.distance * distance_score
            + self.weights.rating * rating_score;
        ScoreBreakdown {
            distance_score,
            rating_score,
            final_score,
        }
    }
}
