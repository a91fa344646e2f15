pub mod amenity;
pub mod geo_point;
pub mod scoring;
pub mod source_mode;
