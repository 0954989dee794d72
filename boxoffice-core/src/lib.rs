//! Box-office core: canonical records, schema mapping, normalization, aggregation.
//!
//! This crate holds everything that turns a raw ranking into a normalized dataset:
//! - Domain types (`MovieRecord`, `Dataset`, `DatasetHash`)
//! - Data sources (the remote ranking service and local CSV snapshots)
//! - Schema mapping from source field names to the canonical record
//! - Normalization: lenient date parsing, year derivation, deterministic order
//! - The yearly revenue aggregate

pub mod aggregate;
pub mod data;
pub mod domain;
pub mod normalize;
pub mod schema;

pub use aggregate::{aggregate, YearlyAggregate};
pub use domain::{Dataset, DatasetHash, MovieRecord};
pub use normalize::{normalize, parse_release_date, NormalizeReport, NormalizedDataset};
pub use schema::{map_remote, map_table, MappedDataset, MappingReport, RawRecord};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: pipeline values can cross threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Dataset>();
        require_sync::<Dataset>();
        require_send::<MovieRecord>();
        require_sync::<MovieRecord>();
        require_send::<YearlyAggregate>();
        require_sync::<YearlyAggregate>();
        require_send::<DatasetHash>();
        require_sync::<DatasetHash>();
        require_send::<data::SourceError>();
        require_sync::<data::SourceError>();
    }
}
