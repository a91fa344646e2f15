pub mod flat;
pub mod sqlite;

pub use flat::{l2_normalize, FlatIndex};
pub use sqlite::{IndexMeta, SqliteIndexFile};
