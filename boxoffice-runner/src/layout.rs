//! Output naming for one run.
//!
//! Everything a run writes lives in `movie_income_{YYYYmmdd_HHMMSS}/` under
//! the output root. Data files reuse the directory name as their stem; chart
//! files append a readable chart label.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::charts::ChartKind;

pub const FILE_PREFIX: &str = "movie_income";

/// Paths for every artifact of a run stamped at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    timestamp: String,
    dir: PathBuf,
}

impl RunLayout {
    pub fn new(output_root: &Path, now: NaiveDateTime) -> Self {
        let timestamp = now.format("%Y%m%d_%H%M%S").to_string();
        let dir = output_root.join(format!("{FILE_PREFIX}_{timestamp}"));
        Self { timestamp, dir }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `movie_income_{timestamp}`
    pub fn stem(&self) -> String {
        format!("{FILE_PREFIX}_{}", self.timestamp)
    }

    /// Data file with the given extension, e.g. `csv`.
    pub fn data_file(&self, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{extension}", self.stem()))
    }

    pub fn chart_file(&self, kind: ChartKind) -> PathBuf {
        self.dir
            .join(format!("{}_{}.png", self.stem(), kind.file_label()))
    }
}
