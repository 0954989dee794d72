//! Dataset loading for the runner.
//!
//! Resolves where the ranking comes from and returns a normalized dataset:
//! 1. If a snapshot path is given and the file exists → read it
//! 2. Otherwise → fetch from the ranking provider
//!
//! A snapshot path that does not exist is not an error; the run falls back to
//! the remote source with a warning.

use std::path::Path;

use boxoffice_core::data::{read_snapshot, DataSource, RankingProvider, SourceError};
use boxoffice_core::{map_remote, normalize, Dataset, DatasetHash, MappingReport, NormalizeReport};

/// Result of loading, including data source provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    /// Normalized dataset, in release order.
    pub dataset: Dataset,
    pub source: DataSource,
    pub mapping: MappingReport,
    pub normalize: NormalizeReport,
    /// BLAKE3 fingerprint of the normalized dataset.
    pub dataset_hash: DatasetHash,
}

/// Pick the source, map its schema and normalize.
pub fn load_dataset(
    snapshot: Option<&Path>,
    provider: &dyn RankingProvider,
) -> Result<LoadedData, SourceError> {
    let (mapped, source) = match snapshot {
        Some(path) if path.is_file() => {
            log::info!("loading local snapshot {}", path.display());
            (read_snapshot(path)?, DataSource::LocalSnapshot)
        }
        other => {
            if let Some(path) = other {
                log::warn!(
                    "snapshot {} not found, falling back to {}",
                    path.display(),
                    provider.name()
                );
            }
            let entries = provider.fetch()?;
            log::info!("{} returned {} entries", provider.name(), entries.len());
            (map_remote(&entries)?, DataSource::RankingService)
        }
    };

    if mapped.report.defaulted_numeric > 0 {
        log::warn!(
            "{} numeric cell(s) were missing or non-numeric and defaulted to 0",
            mapped.report.defaulted_numeric
        );
    }

    let normalized = normalize(&mapped.dataset);
    let dataset_hash = normalized.dataset.fingerprint();
    log::info!(
        "loaded {} records from {source} (hash {})",
        normalized.dataset.len(),
        dataset_hash.short()
    );

    Ok(LoadedData {
        dataset: normalized.dataset,
        source,
        mapping: mapped.report,
        normalize: normalized.report,
        dataset_hash,
    })
}
