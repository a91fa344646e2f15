pub mod candidates;
pub mod dataset;
pub mod embeddings;
pub mod feeds;
pub mod generation;
pub mod index;
