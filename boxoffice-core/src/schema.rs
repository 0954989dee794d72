//! Schema mapping: raw source rows to canonical `MovieRecord`s.
//!
//! Both ingestion paths end here:
//! - remote ranking entries keyed by the service's field names (`Irank`, `MovieName`, ...)
//! - local CSV snapshots keyed by the canonical Chinese headers or the legacy
//!   English alias set
//!
//! Coercion happens once, at this boundary. Numeric cells that are missing,
//! null or unparseable become `0.0`; the count of such cells is reported so a
//! caller can see how lenient the mapping had to be.

use serde_json::Value;

use crate::data::provider::SourceError;
use crate::domain::{Dataset, MovieRecord};

/// Untyped field → value mapping as received from a source.
pub type RawRecord = serde_json::Map<String, Value>;

/// Canonical column headers, in canonical field order.
pub const COL_RANK: &str = "排名";
pub const COL_NAME: &str = "电影名称";
pub const COL_RELEASE_TIME: &str = "上映时间";
pub const COL_RELEASE_DATE: &str = "上映日期解析";
pub const COL_YEAR: &str = "年份";
pub const COL_BOX_OFFICE: &str = "总票房(万元)";
pub const COL_AVG_TICKET_PRICE: &str = "平均票价(元)";
pub const COL_AVG_AUDIENCE: &str = "平均场次观众数";

/// The six columns a snapshot must provide; the other two are derived.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_RANK,
    COL_NAME,
    COL_RELEASE_TIME,
    COL_BOX_OFFICE,
    COL_AVG_TICKET_PRICE,
    COL_AVG_AUDIENCE,
];

/// Every exported column, in canonical field order.
pub const EXPORT_COLUMNS: [&str; 8] = [
    COL_RANK,
    COL_NAME,
    COL_RELEASE_TIME,
    COL_RELEASE_DATE,
    COL_YEAR,
    COL_BOX_OFFICE,
    COL_AVG_TICKET_PRICE,
    COL_AVG_AUDIENCE,
];

/// Legacy English headers and the canonical column each one stands for.
pub const LEGACY_ALIASES: [(&str, &str); 6] = [
    ("Rank", COL_RANK),
    ("MovieName", COL_NAME),
    ("ReleaseDate", COL_RELEASE_TIME),
    ("TotalBoxOffice(10k RMB)", COL_BOX_OFFICE),
    ("AvgTicketPrice(RMB)", COL_AVG_TICKET_PRICE),
    ("AvgAudienceCount", COL_AVG_AUDIENCE),
];

/// Which key holds each canonical field in a given source's rows.
#[derive(Debug, Clone, Copy)]
pub struct SourceKeys {
    pub rank: &'static str,
    pub name: &'static str,
    pub release_time: &'static str,
    pub box_office: &'static str,
    pub avg_ticket_price: &'static str,
    pub avg_audience: &'static str,
}

/// Field names used by the remote ranking service.
pub const REMOTE_KEYS: SourceKeys = SourceKeys {
    rank: "Irank",
    name: "MovieName",
    release_time: "ReleaseTime",
    box_office: "BoxOffice",
    avg_ticket_price: "AvgBoxOffice",
    avg_audience: "AvgAudienceCount",
};

/// Canonical snapshot headers.
pub const CANONICAL_KEYS: SourceKeys = SourceKeys {
    rank: COL_RANK,
    name: COL_NAME,
    release_time: COL_RELEASE_TIME,
    box_office: COL_BOX_OFFICE,
    avg_ticket_price: COL_AVG_TICKET_PRICE,
    avg_audience: COL_AVG_AUDIENCE,
};

/// How much defaulting the mapping needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingReport {
    /// Numeric cells (rank, revenue, price, audience) that fell back to zero.
    pub defaulted_numeric: usize,
}

/// Output of schema mapping: records in source order, dates not yet parsed.
#[derive(Debug, Clone)]
pub struct MappedDataset {
    pub dataset: Dataset,
    pub report: MappingReport,
}

/// Map remote ranking entries (the `data.table0` array) to canonical records.
///
/// An empty list is an error: the run must not produce output from nothing.
pub fn map_remote(entries: &[RawRecord]) -> Result<MappedDataset, SourceError> {
    if entries.is_empty() {
        return Err(SourceError::EmptyDataset);
    }
    Ok(map_records(entries, &REMOTE_KEYS))
}

/// Map a tabular snapshot (header row + string cells) to canonical records.
///
/// A legacy header is used only when its canonical counterpart is absent.
/// Unknown columns are ignored. Fails with every missing canonical column
/// named when aliasing cannot supply all six.
pub fn map_table(headers: &[String], rows: &[Vec<String>]) -> Result<MappedDataset, SourceError> {
    let mut columns: Vec<(&'static str, usize)> = Vec::with_capacity(REQUIRED_COLUMNS.len());
    let mut missing = Vec::new();

    for canonical in REQUIRED_COLUMNS {
        match resolve_column(headers, canonical) {
            Some(idx) => columns.push((canonical, idx)),
            None => missing.push(canonical.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(SourceError::MissingColumns { columns: missing });
    }

    let raw: Vec<RawRecord> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|&(canonical, idx)| {
                    let cell = row.get(idx).cloned().map_or(Value::Null, Value::String);
                    (canonical.to_string(), cell)
                })
                .collect()
        })
        .collect();

    Ok(map_records(&raw, &CANONICAL_KEYS))
}

fn resolve_column(headers: &[String], canonical: &str) -> Option<usize> {
    if let Some(idx) = headers.iter().position(|h| h == canonical) {
        return Some(idx);
    }
    LEGACY_ALIASES
        .iter()
        .filter(|(_, target)| *target == canonical)
        .find_map(|(legacy, _)| headers.iter().position(|h| h == legacy))
}

fn map_records(raw: &[RawRecord], keys: &SourceKeys) -> MappedDataset {
    let mut report = MappingReport::default();
    let records = raw
        .iter()
        .map(|r| record_from_raw(r, keys, &mut report))
        .collect();
    MappedDataset {
        dataset: Dataset::new(records),
        report,
    }
}

fn record_from_raw(raw: &RawRecord, keys: &SourceKeys, report: &mut MappingReport) -> MovieRecord {
    let mut numeric = |key: &str| match coerce_f64(raw.get(key)) {
        Some(v) => v,
        None => {
            report.defaulted_numeric += 1;
            0.0
        }
    };

    let box_office = numeric(keys.box_office);
    let avg_ticket_price = numeric(keys.avg_ticket_price);
    let avg_audience = numeric(keys.avg_audience);

    let rank = match coerce_i64(raw.get(keys.rank)) {
        Some(v) => v,
        None => {
            report.defaulted_numeric += 1;
            0
        }
    };

    MovieRecord::unparsed(
        rank,
        coerce_text(raw.get(keys.name)),
        coerce_text(raw.get(keys.release_time)),
        box_office,
        avg_ticket_price,
        avg_audience,
    )
}

/// Finite float from a JSON number or numeric string; `None` means "use the default".
pub fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    let v = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

/// Integer from a JSON number or string; integral floats such as `"3.0"` are accepted.
pub fn coerce_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

fn integral(v: f64) -> Option<i64> {
    (v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64).then_some(v as i64)
}

/// Text from a string or number; null and missing become the empty string.
pub fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(v: Value) -> RawRecord {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn maps_remote_fields() {
        let entries = vec![entry(json!({
            "Irank": 1,
            "MovieName": "满江红",
            "ReleaseTime": "2023-01-22",
            "BoxOffice": "454400.5",
            "AvgBoxOffice": 48.2,
            "AvgAudienceCount": "21"
        }))];

        let mapped = map_remote(&entries).unwrap();
        assert_eq!(mapped.report.defaulted_numeric, 0);
        let r = &mapped.dataset.records()[0];
        assert_eq!(r.rank, 1);
        assert_eq!(r.name, "满江红");
        assert_eq!(r.release_time_raw, "2023-01-22");
        assert_eq!(r.release_date, None);
        assert_eq!(r.box_office, 454400.5);
        assert_eq!(r.avg_ticket_price, 48.2);
        assert_eq!(r.avg_audience_per_showing, 21.0);
    }

    #[test]
    fn remote_keeps_entry_count_and_order() {
        let entries: Vec<RawRecord> = (1..=5)
            .map(|i| entry(json!({"Irank": i, "MovieName": format!("M{i}")})))
            .collect();
        let mapped = map_remote(&entries).unwrap();
        let names: Vec<_> = mapped.dataset.iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, vec!["M1", "M2", "M3", "M4", "M5"]);
    }

    #[test]
    fn empty_remote_list_is_an_error() {
        let err = map_remote(&[]).unwrap_err();
        assert!(matches!(err, SourceError::EmptyDataset));
    }

    #[test]
    fn missing_box_office_defaults_to_zero() {
        let entries = vec![entry(json!({
            "Irank": 3,
            "MovieName": "X",
            "ReleaseTime": "2023-01-01",
            "AvgBoxOffice": 40,
            "AvgAudienceCount": 10
        }))];
        let mapped = map_remote(&entries).unwrap();
        assert_eq!(mapped.dataset.records()[0].box_office, 0.0);
        assert_eq!(mapped.report.defaulted_numeric, 1);
    }

    #[test]
    fn null_and_garbage_numbers_default_to_zero() {
        let entries = vec![entry(json!({
            "Irank": "2",
            "MovieName": "Y",
            "ReleaseTime": null,
            "BoxOffice": null,
            "AvgBoxOffice": "n/a",
            "AvgAudienceCount": "NaN"
        }))];
        let mapped = map_remote(&entries).unwrap();
        let r = &mapped.dataset.records()[0];
        assert_eq!(r.rank, 2);
        assert_eq!(r.release_time_raw, "");
        assert_eq!(r.box_office, 0.0);
        assert_eq!(r.avg_ticket_price, 0.0);
        assert_eq!(r.avg_audience_per_showing, 0.0);
        assert_eq!(mapped.report.defaulted_numeric, 3);
    }

    #[test]
    fn numeric_name_is_kept_as_text() {
        let entries = vec![entry(json!({"Irank": 1, "MovieName": 1917}))];
        let mapped = map_remote(&entries).unwrap();
        assert_eq!(mapped.dataset.records()[0].name, "1917");
    }

    #[test]
    fn legacy_headers_match_canonical_headers() {
        let row = strings(&["1", "流浪地球2", "2023-01-22", "403000", "47.5", "19"]);

        let canonical = map_table(&strings(&REQUIRED_COLUMNS), &[row.clone()]).unwrap();
        let legacy_headers = strings(&[
            "Rank",
            "MovieName",
            "ReleaseDate",
            "TotalBoxOffice(10k RMB)",
            "AvgTicketPrice(RMB)",
            "AvgAudienceCount",
        ]);
        let legacy = map_table(&legacy_headers, &[row]).unwrap();

        assert_eq!(canonical.dataset, legacy.dataset);
    }

    #[test]
    fn canonical_column_wins_over_legacy_alias() {
        let headers = strings(&[
            "Rank", "排名", "电影名称", "上映时间", "总票房(万元)", "平均票价(元)", "平均场次观众数",
        ]);
        let row = strings(&["99", "1", "A", "2023-01-01", "1", "2", "3"]);
        let mapped = map_table(&headers, &[row]).unwrap();
        assert_eq!(mapped.dataset.records()[0].rank, 1);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let headers = strings(&EXPORT_COLUMNS);
        let row = strings(&["1", "A", "2023-01-10", "1999-01-01", "1999", "1000", "45.5", "120"]);
        let mapped = map_table(&headers, &[row]).unwrap();
        let r = &mapped.dataset.records()[0];
        assert_eq!(r.release_date, None);
        assert_eq!(r.year, None);
        assert_eq!(r.box_office, 1000.0);
    }

    #[test]
    fn missing_columns_are_all_reported() {
        let headers = strings(&["Rank", "MovieName", "ReleaseDate", "AvgTicketPrice(RMB)"]);
        let err = map_table(&headers, &[]).unwrap_err();
        match err {
            SourceError::MissingColumns { columns } => {
                assert_eq!(columns, vec![COL_BOX_OFFICE.to_string(), COL_AVG_AUDIENCE.to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_rows_default_missing_cells() {
        let row = strings(&["4", "Short"]);
        let mapped = map_table(&strings(&REQUIRED_COLUMNS), &[row]).unwrap();
        let r = &mapped.dataset.records()[0];
        assert_eq!(r.release_time_raw, "");
        assert_eq!(r.avg_audience_per_showing, 0.0);
        assert_eq!(mapped.report.defaulted_numeric, 3);
    }

    #[test]
    fn coerce_i64_accepts_integral_floats() {
        assert_eq!(coerce_i64(Some(&json!("3.0"))), Some(3));
        assert_eq!(coerce_i64(Some(&json!(4.0))), Some(4));
        assert_eq!(coerce_i64(Some(&json!("3.5"))), None);
        assert_eq!(coerce_i64(Some(&json!(true))), None);
    }
}
