//! Data sources: the remote ranking service and local CSV snapshots

pub mod endata;
pub mod provider;
pub mod snapshot;

pub use endata::{extract_table, EndataProvider, FetchConfig};
pub use provider::{DataSource, RankingProvider, SourceError};
pub use snapshot::read_snapshot;
