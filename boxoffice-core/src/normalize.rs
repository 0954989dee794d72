//! Normalization: date parsing, year derivation and deterministic ordering.
//!
//! Date parsing is lenient: a release time that matches none of the known
//! layouts becomes `None` instead of failing the run. The number of such
//! records is reported back in [`NormalizeReport`].

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::domain::{Dataset, MovieRecord};

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d", "%Y年%m月%d日"];

const DATETIME_FORMATS: [&str; 9] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
];

/// Diagnostics from a normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Records whose release time could not be parsed into a date.
    pub unparsed_dates: usize,
}

/// A normalized dataset together with its diagnostics.
#[derive(Debug, Clone)]
pub struct NormalizedDataset {
    pub dataset: Dataset,
    pub report: NormalizeReport,
}

/// Best-effort release date parsing. Returns `None` for empty or unrecognized input.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    // Offsets are dropped: the wall-clock date is what the source meant.
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Parse dates, derive years and sort by `(release_date, rank)`.
///
/// Records without a date sort after all dated records. The sort is stable,
/// so equal keys keep their input order. The input is left untouched.
pub fn normalize(dataset: &Dataset) -> NormalizedDataset {
    let mut report = NormalizeReport::default();

    let mut records: Vec<MovieRecord> = dataset
        .iter()
        .map(|r| {
            let release_date = parse_release_date(&r.release_time_raw);
            if release_date.is_none() {
                report.unparsed_dates += 1;
            }
            MovieRecord {
                release_date,
                year: release_date.map(|d| d.year()),
                ..r.clone()
            }
        })
        .collect();

    records.sort_by(release_order);

    if report.unparsed_dates > 0 {
        log::warn!(
            "{} of {} records have an unrecognized release date and sort last",
            report.unparsed_dates,
            records.len()
        );
    }

    NormalizedDataset {
        dataset: Dataset::new(records),
        report,
    }
}

/// `(release_date asc, nulls last)` then `rank asc`.
pub fn release_order(a: &MovieRecord, b: &MovieRecord) -> Ordering {
    let by_date = match (a.release_date, b.release_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date.then_with(|| a.rank.cmp(&b.rank))
}
