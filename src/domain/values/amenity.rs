use serde::{Deserialize, Serialize};
use std::fmt;

/// OpenStreetMap `amenity` values treated as food places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amenity {
    Restaurant,
    FastFood,
    Cafe,
    Bar,
    Pub,
}

impl Amenity {
    pub const ALL: [Amenity; 5] = [
        Amenity::Restaurant,
        Amenity::FastFood,
        Amenity::Cafe,
        Amenity::Bar,
        Amenity::Pub,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Amenity::Restaurant => "restaurant",
            Amenity::FastFood => "fast_food",
            Amenity::Cafe => "cafe",
            Amenity::Bar => "bar",
            Amenity::Pub => "pub",
        }
    }
}

impl fmt::Display for Amenity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
