//! Ranking provider trait and structured error types.
//!
//! The `RankingProvider` trait abstracts over where the ranking comes from so
//! the pipeline can run against the live service or an in-memory fake in tests.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::RawRecord;

/// Structured error types for ingestion.
///
/// These are displayable directly in the CLI's abort message.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("ranking service returned an empty dataset")]
    EmptyDataset,

    #[error("response is not valid JSON: {0}")]
    MalformedResponse(String),

    #[error("snapshot is missing required column(s): {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("failed to read snapshot {}: {reason}", path.display())]
    Snapshot { path: PathBuf, reason: String },
}

/// Where a run's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    RankingService,
    LocalSnapshot,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::RankingService => write!(f, "ranking service"),
            DataSource::LocalSnapshot => write!(f, "local snapshot"),
        }
    }
}

/// A source of raw ranking entries.
///
/// Implementations return the entries exactly as the source delivered them;
/// schema mapping is the caller's job.
pub trait RankingProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the current ranking. One blocking call, no retries.
    fn fetch(&self) -> Result<Vec<RawRecord>, SourceError>;
}
