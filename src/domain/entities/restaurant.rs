use crate::domain::values::geo_point::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const UNKNOWN: &str = "unknown";

/// A candidate place. Live records leave the dataset-only fields empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub cuisine: Option<String>,
    pub opening_hours: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub house_number: Option<String>,
    /// Free-form address line, when the source has one.
    pub address: Option<String>,
    pub amenity: Option<String>,
    pub average_cost_for_two: Option<f64>,
    pub price_range: Option<u8>,
    pub rating: Option<f64>,
    pub rating_text: Option<String>,
    pub votes: Option<u32>,
}

impl Restaurant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Coordinates, if both are present and valid.
    pub fn location(&self) -> Option<GeoPoint> {
        GeoPoint::from_raw(self.lat, self.lon)
    }

    /// Text fed to the embedding model.
    ///
    /// Field order is fixed; preprocessing and live ranking must produce
    /// identical text for identical records.
    pub fn description(&self) -> String {
        let mut text = format!(
            "{}. Cuisine: {}. Opening hours: {}. ",
            self.name,
            or_unknown(&self.cuisine),
            or_unknown(&self.opening_hours),
        );

        match self.location() {
            Some(p) => {
                let _ = write!(text, "Located at coordinates {p}.");
            }
            None => text.push_str("Location unknown."),
        }

        let _ = write!(
            text,
            " City: {}. Street: {}. Number: {}. Neighborhood: {}. Amenity: {}.",
            or_unknown(&self.city),
            or_unknown(&self.street),
            or_unknown(&self.house_number),
            or_unknown(&self.neighborhood),
            or_unknown(&self.amenity),
        );

        if let Some(address) = &self.address {
            let _ = write!(text, " Address: {address}.");
        }

        if self.average_cost_for_two.is_some() || self.price_range.is_some() {
            let cost = self
                .average_cost_for_two
                .map(|c| c.to_string())
                .unwrap_or_else(|| UNKNOWN.to_string());
            let price = self
                .price_range
                .map(|p| p.to_string())
                .unwrap_or_else(|| UNKNOWN.to_string());
            let _ = write!(text, " Average cost for two: {cost} ({price}/5 price level).");
        }

        if let Some(rating) = self.rating {
            let votes = self.votes.unwrap_or(0);
            let _ = write!(
                text,
                " Rating: {rating} ({}) with {votes} votes.",
                or_unknown(&self.rating_text),
            );
        }

        text
    }
}

fn or_unknown(value: &Option<String>) -> &str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or(UNKNOWN)
}
