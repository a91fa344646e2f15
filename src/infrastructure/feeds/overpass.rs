use crate::domain::entities::restaurant::Restaurant;
use crate::domain::ports::place_fetcher::PlaceFetcher;
use crate::domain::values::amenity::Amenity;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Write;
use std::time::Duration;

pub const DEFAULT_OVERPASS_URL: &str = "http://overpass-api.de/api/interpreter";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(25);

/// How much of an unexpected body to echo into the log.
const BODY_PREVIEW_CHARS: usize = 300;

/// OpenStreetMap food places via the Overpass API.
///
/// One POST per call, no retries. Any failure is logged and yields an empty list.
pub struct OverpassFeed {
    url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    id: Option<i64>,
    lat: Option<f64>,
    lon: Option<f64>,
    /// Present for ways and relations with `out center`.
    center: Option<Center>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct Center {
    lat: f64,
    lon: f64,
}

impl OverpassFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .user_agent(concat!("nearbite/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Overpass QL for every food amenity within `radius` meters.
    ///
    /// Buildings mapped as ways come back with their `center` coordinate.
    pub fn build_query(lat: f64, lon: f64, radius_meters: f64) -> String {
        let mut query = String::from("[out:json][timeout:20];\n(\n");
        for amenity in Amenity::ALL {
            for kind in ["node", "way"] {
                let _ = writeln!(
                    query,
                    "  {kind}[\"amenity\"=\"{amenity}\"](around:{radius_meters},{lat},{lon});"
                );
            }
        }
        query.push_str(");\nout center;\n");
        query
    }

    /// Turn a response into records; anything unexpected becomes an empty list.
    pub fn parse_response(status: u16, body: &str) -> Vec<Restaurant> {
        if status != 200 {
            tracing::warn!(status, body = %preview(body), "Overpass returned an error status");
            return vec![];
        }

        let data: serde_json::Value = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(e) => {
                // Overpass answers with HTML or XML when overloaded.
                tracing::warn!(error = %e, body = %preview(body), "Overpass returned invalid JSON");
                return vec![];
            }
        };

        let Some(elements) = data.get("elements").and_then(|e| e.as_array()) else {
            tracing::warn!(body = %preview(body), "No 'elements' in Overpass response");
            return vec![];
        };

        let total = elements.len();
        let records: Vec<Restaurant> = elements
            .iter()
            .filter_map(|raw| match OverpassElement::deserialize(raw) {
                Ok(element) => normalize_element(element),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping malformed Overpass element");
                    None
                }
            })
            .collect();

        tracing::debug!(total, kept = records.len(), "Parsed Overpass elements");
        records
    }
}

/// Elements without a name carry no text to embed and are dropped.
fn normalize_element(element: OverpassElement) -> Option<Restaurant> {
    let mut tags = element.tags;
    let name = tags.remove("name").filter(|n| !n.trim().is_empty())?;

    let (lat, lon) = match (element.lat, element.lon, element.center) {
        (Some(lat), Some(lon), _) => (Some(lat), Some(lon)),
        (_, _, Some(c)) => (Some(c.lat), Some(c.lon)),
        _ => (None, None),
    };

    Some(Restaurant {
        id: element.id.map(|id| id.to_string()).unwrap_or_default(),
        name: name.trim().to_string(),
        cuisine: tags.remove("cuisine"),
        opening_hours: tags.remove("opening_hours"),
        lat,
        lon,
        city: tags.remove("addr:city"),
        street: tags.remove("addr:street"),
        neighborhood: tags.remove("addr:suburb"),
        house_number: tags.remove("addr:housenumber"),
        amenity: tags.remove("amenity"),
        ..Default::default()
    })
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[async_trait]
impl PlaceFetcher for OverpassFeed {
    fn name(&self) -> &str {
        "overpass"
    }

    async fn fetch(&self, lat: f64, lon: f64, radius_meters: f64) -> Vec<Restaurant> {
        let query = Self::build_query(lat, lon, radius_meters);

        let resp = match self.client.post(&self.url).body(query).send().await {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                tracing::warn!(url = %self.url, "Overpass API timeout");
                return vec![];
            }
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "Overpass request failed");
                return vec![];
            }
        };

        let status = resp.status().as_u16();
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(status, error = %e, "Failed to read Overpass response body");
                return vec![];
            }
        };

        let records = Self::parse_response(status, &body);
        tracing::info!(lat, lon, radius_meters, found = records.len(), "Fetched places from Overpass");
        records
    }
}
