use crate::domain::entities::restaurant::Restaurant;
use async_trait::async_trait;

/// Fetches food places around a point from an external map service.
///
/// Upstream failures are not errors: implementations log them and return an
/// empty list.
#[async_trait]
pub trait PlaceFetcher: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, lat: f64, lon: f64, radius_meters: f64) -> Vec<Restaurant>;
}
