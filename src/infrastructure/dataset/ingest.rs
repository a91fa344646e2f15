//! Restaurant table ingestion.
//!
//! Expects the Zomato export layout. Rows with any empty required column or a
//! non-numeric numeric column are dropped, never repaired.

use crate::domain::entities::restaurant::Restaurant;
use crate::domain::error::DomainError;
use crate::domain::text::{clean_text, remove_replacement_chars};
use csv::{ByteRecord, ReaderBuilder};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const COL_ID: &str = "Restaurant ID";
pub const COL_NAME: &str = "Restaurant Name";
pub const COL_CITY: &str = "City";
pub const COL_ADDRESS: &str = "Address";
pub const COL_CUISINES: &str = "Cuisines";
pub const COL_COST: &str = "Average Cost for two";
pub const COL_PRICE: &str = "Price range";
pub const COL_RATING: &str = "Aggregate rating";
pub const COL_RATING_TEXT: &str = "Rating text";
pub const COL_VOTES: &str = "Votes";
pub const COL_LAT: &str = "Latitude";
pub const COL_LON: &str = "Longitude";
/// Optional; becomes the neighborhood when present.
pub const COL_LOCALITY: &str = "Locality";

pub const REQUIRED_COLUMNS: [&str; 12] = [
    COL_ID,
    COL_NAME,
    COL_CITY,
    COL_ADDRESS,
    COL_CUISINES,
    COL_COST,
    COL_PRICE,
    COL_RATING,
    COL_RATING_TEXT,
    COL_VOTES,
    COL_LAT,
    COL_LON,
];

/// Kept records in file order plus drop accounting.
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub records: Vec<Restaurant>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

/// Column positions resolved from the header row.
struct Columns {
    required: [usize; 12],
    locality: Option<usize>,
}

impl Columns {
    fn resolve(headers: &[String]) -> Result<Self, DomainError> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|&name| position(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::Parse(format!(
                "Missing required columns: {}",
                missing.join(", ")
            )));
        }

        let mut required = [0usize; 12];
        for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = position(name).unwrap_or_default();
        }
        Ok(Self {
            required,
            locality: position(COL_LOCALITY),
        })
    }
}

pub fn read_restaurants(path: &Path) -> Result<IngestOutcome, DomainError> {
    let file = File::open(path).map_err(|e| {
        DomainError::NotFound(format!("Cannot open dataset {}: {e}", path.display()))
    })?;
    read_restaurants_from(file)
}

pub fn read_restaurants_from<R: Read>(reader: R) -> Result<IngestOutcome, DomainError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = rdr
        .byte_headers()
        .map_err(|e| DomainError::Parse(format!("Cannot read CSV header: {e}")))?
        .iter()
        .map(|h| clean_header(&decode_field(h)))
        .collect();
    let columns = Columns::resolve(&headers)?;

    let mut outcome = IngestOutcome::default();
    for (line, row) in rdr.byte_records().enumerate() {
        outcome.rows_read += 1;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::debug!(line, error = %e, "Unreadable CSV row");
                outcome.rows_dropped += 1;
                continue;
            }
        };
        match parse_row(&row, &columns) {
            Some(record) => outcome.records.push(record),
            None => outcome.rows_dropped += 1,
        }
    }

    tracing::info!(
        rows_read = outcome.rows_read,
        kept = outcome.records.len(),
        dropped = outcome.rows_dropped,
        "Ingested restaurant table"
    );
    Ok(outcome)
}

fn parse_row(row: &ByteRecord, columns: &Columns) -> Option<Restaurant> {
    let mut values: Vec<String> = Vec::with_capacity(REQUIRED_COLUMNS.len());
    for &pos in &columns.required {
        let value = decode_field(row.get(pos)?);
        if value.is_empty() {
            return None;
        }
        values.push(value);
    }
    let [id, name, city, address, cuisines, cost, price, rating, rating_text, votes, lat, lon]: [String; 12] =
        values.try_into().ok()?;

    let lat = parse_finite(&lat)?;
    let lon = parse_finite(&lon)?;
    // Only coordinates are mandatory numbers; other unreadable figures become unknown.
    let average_cost_for_two = parse_finite(&cost);
    let price_range = parse_count(&price).and_then(|v| u8::try_from(v).ok());
    let rating = parse_finite(&rating);
    let votes = parse_count(&votes).and_then(|v| u32::try_from(v).ok());

    let neighborhood = columns
        .locality
        .and_then(|pos| row.get(pos))
        .map(decode_field)
        .filter(|v| !v.is_empty());

    Some(Restaurant {
        id,
        name,
        cuisine: Some(clean_text(&cuisines)),
        opening_hours: None,
        lat: Some(lat),
        lon: Some(lon),
        city: Some(city),
        street: None,
        neighborhood,
        house_number: None,
        address: Some(address),
        amenity: Some("restaurant".to_string()),
        average_cost_for_two,
        price_range,
        rating,
        rating_text: Some(clean_text(&rating_text)),
        votes,
    })
}

fn parse_finite(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whole numbers, also when written as `"3.0"`.
fn parse_count(value: &str) -> Option<u64> {
    parse_finite(value)
        .filter(|v| *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as u64)
}

/// UTF-8 when valid, Latin-1 otherwise.
fn decode_field(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    };
    remove_replacement_chars(&text).trim().to_string()
}

/// Strip byte-order marks, including one mis-decoded as Latin-1.
fn clean_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .trim_start_matches("ï»¿")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Restaurant ID,Restaurant Name,Country Code,City,Address,Locality,Cuisines,\
Average Cost for two,Price range,Aggregate rating,Rating text,Votes,Latitude,Longitude\n";

    fn ingest(rows: &str) -> IngestOutcome {
        read_restaurants_from(format!("{HEADER}{rows}").as_bytes()).unwrap()
    }

    #[test]
    fn test_reads_complete_row() {
        let out = ingest(
            "6317637,Le Petit Souffle,162,Makati City,\"Third Floor, Century City Mall\",Century City Mall,\"French, Japanese, Desserts\",1100,3,4.8,Excellent,314,14.565443,121.027535\n",
        );
        assert_eq!(out.rows_read, 1);
        assert_eq!(out.records.len(), 1);
        let r = &out.records[0];
        assert_eq!(r.id, "6317637");
        assert_eq!(r.name, "Le Petit Souffle");
        assert_eq!(r.cuisine.as_deref(), Some("french japanese desserts"));
        assert_eq!(r.rating_text.as_deref(), Some("excellent"));
        assert_eq!(r.address.as_deref(), Some("Third Floor, Century City Mall"));
        assert_eq!(r.neighborhood.as_deref(), Some("Century City Mall"));
        assert_eq!(r.price_range, Some(3));
        assert_eq!(r.votes, Some(314));
        assert_eq!(r.lat, Some(14.565443));
    }

    #[test]
    fn test_drops_rows_with_missing_values() {
        let out = ingest(
            "1,A,1,City,Addr,Loc,Cafe,100,1,3.2,Average,10,1.0,2.0\n\
             2,B,1,City,Addr,Loc,,100,1,3.2,Average,10,1.0,2.0\n\
             3,C,1,City,Addr,,Cafe,100,1,3.2,Average,10,1.0,2.0\n",
        );
        assert_eq!(out.rows_read, 3);
        assert_eq!(out.rows_dropped, 1);
        let ids: Vec<&str> = out.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(out.records[1].neighborhood.is_none());
    }

    #[test]
    fn test_drops_non_numeric_coordinates() {
        let out = ingest(
            "1,A,1,City,Addr,Loc,Cafe,100,1,3.2,Average,10,north,2.0\n\
             2,B,1,City,Addr,Loc,Cafe,100,1,3.2,Average,10,1.0,2.0\n",
        );
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].id, "2");
    }

    #[test]
    fn test_unreadable_figures_keep_the_row() {
        let out = ingest(
            "1,A,1,City,Addr,Loc,Cafe,n/a,3.0,-,Not rated,many,1.0,2.0\n\
             2,B,1,City,Addr,Loc,Cafe,250.5,2.5,4.0,Good,12.0,1.0,2.0\n",
        );
        assert_eq!(out.rows_dropped, 0);
        let a = &out.records[0];
        assert_eq!(a.price_range, Some(3));
        assert!(a.average_cost_for_two.is_none());
        assert!(a.rating.is_none());
        assert!(a.votes.is_none());
        let b = &out.records[1];
        assert_eq!(b.average_cost_for_two, Some(250.5));
        assert!(b.price_range.is_none());
        assert_eq!(b.rating, Some(4.0));
        assert_eq!(b.votes, Some(12));
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let result = read_restaurants_from("Restaurant ID,Restaurant Name\n1,A\n".as_bytes());
        match result {
            Err(DomainError::Parse(msg)) => assert!(msg.contains("Latitude")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_bom_header_and_latin1_field() {
        let mut data = "\u{feff}".as_bytes().to_vec();
        data.extend_from_slice(HEADER.as_bytes());
        data.extend_from_slice(b"1,Caf\xe9 Ole,1,S\xe3o Paulo,Rua 1,Centro,Caf\xe9,50,2,4.1,Very Good,20,-23.5,-46.6\n");

        let out = read_restaurants_from(data.as_slice()).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].name, "Café Ole");
        assert_eq!(out.records[0].city.as_deref(), Some("São Paulo"));
        assert_eq!(out.records[0].cuisine.as_deref(), Some("café"));
    }
}
