pub mod cache;
pub mod dataset;
pub mod live;

pub use dataset::DatasetCandidates;
pub use live::LiveCandidates;
