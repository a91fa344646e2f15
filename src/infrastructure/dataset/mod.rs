pub mod ingest;
pub mod store;

pub use ingest::{read_restaurants, read_restaurants_from, IngestOutcome};
pub use store::ArtifactStore;
