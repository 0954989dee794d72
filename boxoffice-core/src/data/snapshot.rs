//! Local CSV snapshot reader.
//!
//! Accepts files with canonical Chinese headers (including this tool's own
//! CSV export) or the legacy English alias set. A leading UTF-8 BOM is
//! tolerated.

use std::path::Path;

use super::provider::SourceError;
use crate::schema::{self, MappedDataset};

/// Read a snapshot file and map it to canonical records.
pub fn read_snapshot(path: &Path) -> Result<MappedDataset, SourceError> {
    let snapshot_err = |reason: String| SourceError::Snapshot {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| snapshot_err(e.to_string()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| snapshot_err(e.to_string()))?
        .iter()
        .map(clean_header)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| snapshot_err(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    log::info!(
        "read {} rows from snapshot {}",
        rows.len(),
        path.display()
    );

    schema::map_table(&headers, &rows)
}

fn clean_header(h: &str) -> String {
    h.trim_start_matches('\u{feff}').trim().to_string()
}
