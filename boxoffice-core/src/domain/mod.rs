//! Domain types for box-office snapshots

pub mod ids;
pub mod record;

pub use ids::DatasetHash;
pub use record::{Dataset, MovieRecord};
