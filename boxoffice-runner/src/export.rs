//! Data export: CSV, JSON and XLSX artifacts for one run.
//!
//! All three formats are written from the same `Dataset` and
//! `YearlyAggregate`; nothing is recomputed per format. The CSV and JSON
//! exports can be read back, and a CSV export is a valid local snapshot.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use boxoffice_core::schema::EXPORT_COLUMNS;
use boxoffice_core::{Dataset, MovieRecord, YearlyAggregate};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::RunLayout;

/// UTF-8 byte order mark, so spreadsheet tools detect the encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const DATA_SHEET: &str = "数据";
pub const AGGREGATE_SHEET: &str = "年度汇总";
pub const AGGREGATE_COLUMNS: [&str; 2] = ["年份", "总票房(万元)"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Where each data file of a run was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
    pub xlsx: PathBuf,
}

impl ExportPaths {
    pub fn for_layout(layout: &RunLayout) -> Self {
        Self {
            csv: layout.data_file("csv"),
            json: layout.data_file("json"),
            xlsx: layout.data_file("xlsx"),
        }
    }
}

/// Write all three data files. The run directory must already exist.
pub fn export_all(
    dataset: &Dataset,
    aggregate: &YearlyAggregate,
    layout: &RunLayout,
) -> Result<ExportPaths, ExportError> {
    let paths = ExportPaths::for_layout(layout);
    write_csv(dataset, &paths.csv)?;
    write_json(dataset, &paths.json)?;
    write_xlsx(dataset, aggregate, &paths.xlsx)?;
    log::info!(
        "exported {} records to {}",
        dataset.len(),
        layout.dir().display()
    );
    Ok(paths)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Cells of one record in export column order. Missing date and year are empty.
fn csv_row(rec: &MovieRecord) -> [String; 8] {
    [
        rec.rank.to_string(),
        rec.name.clone(),
        rec.release_time_raw.clone(),
        rec.release_date.map(|d| d.to_string()).unwrap_or_default(),
        rec.year.map(|y| y.to_string()).unwrap_or_default(),
        rec.box_office.to_string(),
        rec.avg_ticket_price.to_string(),
        rec.avg_audience_per_showing.to_string(),
    ]
}

pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<(), ExportError> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(UTF8_BOM)?;

    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(EXPORT_COLUMNS)?;
    for rec in dataset {
        wtr.write_record(csv_row(rec))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read a CSV written by [`write_csv`] back into a dataset.
pub fn read_csv_export(path: &Path) -> Result<Dataset, ExportError> {
    let mut rdr = csv::Reader::from_path(path)?;
    let headers: csv::StringRecord = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect();
    rdr.set_headers(headers);

    let records = rdr
        .deserialize::<MovieRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Dataset::new(records))
}

// ─── JSON ───────────────────────────────────────────────────────────

/// Pretty-printed array of records keyed by the export headers.
pub fn write_json(dataset: &Dataset, path: &Path) -> Result<(), ExportError> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, dataset)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

pub fn read_json_export(path: &Path) -> Result<Dataset, ExportError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

// ─── XLSX ───────────────────────────────────────────────────────────

/// Workbook with the full dataset on one sheet and the yearly totals on another.
pub fn write_xlsx(
    dataset: &Dataset,
    aggregate: &YearlyAggregate,
    path: &Path,
) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(DATA_SHEET)?;
    for (col, title) in EXPORT_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }
    sheet.set_column_width(1, 24)?;
    for (i, rec) in dataset.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, rec.rank as f64)?;
        sheet.write_string(row, 1, rec.name.as_str())?;
        sheet.write_string(row, 2, rec.release_time_raw.as_str())?;
        if let Some(date) = rec.release_date {
            sheet.write_string(row, 3, date.to_string())?;
        }
        if let Some(year) = rec.year {
            sheet.write_number(row, 4, f64::from(year))?;
        }
        sheet.write_number(row, 5, rec.box_office)?;
        sheet.write_number(row, 6, rec.avg_ticket_price)?;
        sheet.write_number(row, 7, rec.avg_audience_per_showing)?;
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name(AGGREGATE_SHEET)?;
    for (col, title) in AGGREGATE_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }
    for (i, (year, total)) in aggregate.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, f64::from(year))?;
        sheet.write_number(row, 1, total)?;
    }

    workbook.save(path)?;
    Ok(())
}
