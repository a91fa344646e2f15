pub mod candidate_source;
pub mod embedding_port;
pub mod place_fetcher;
pub mod response_generator;
pub mod vector_index;
