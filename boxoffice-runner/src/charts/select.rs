//! Data selection for charts: top-N rankings, scatter highlights, pie slices.
//!
//! Kept free of drawing code so the selection rules can be tested directly.

use std::collections::HashSet;
use std::f64::consts::TAU;

use boxoffice_core::{MovieRecord, YearlyAggregate};

/// The `n` records with the largest `metric`, largest first.
///
/// Ties keep dataset order: of two equal values, the earlier record wins.
pub fn top_n_by<'a>(
    records: &'a [MovieRecord],
    n: usize,
    metric: impl Fn(&MovieRecord) -> f64,
) -> Vec<&'a MovieRecord> {
    let mut ranked: Vec<&MovieRecord> = records.iter().collect();
    // sort_by is stable, so equal values stay in input order.
    ranked.sort_by(|a, b| metric(b).total_cmp(&metric(a)));
    ranked.truncate(n);
    ranked
}

/// Records annotated on the price/revenue scatter.
///
/// Top `n` by box office followed by top `n` by ticket price, keeping only
/// the first record seen for each movie name.
pub fn notable_records(records: &[MovieRecord], n: usize) -> Vec<&MovieRecord> {
    let by_box_office = top_n_by(records, n, |r| r.box_office);
    let by_price = top_n_by(records, n, |r| r.avg_ticket_price);

    let mut seen = HashSet::new();
    by_box_office
        .into_iter()
        .chain(by_price)
        .filter(|r| seen.insert(r.name.clone()))
        .collect()
}

/// One wedge of the yearly share pie.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub year: i32,
    pub value: f64,
    pub fraction: f64,
    /// Start and end angle in radians, counter-clockwise from 3 o'clock.
    pub start: f64,
    pub end: f64,
}

impl PieSlice {
    /// Year as integer text.
    pub fn label(&self) -> String {
        self.year.to_string()
    }

    /// Share of the total with two decimals, e.g. `55.56%`.
    pub fn percent_label(&self) -> String {
        format!("{:.2}%", self.fraction * 100.0)
    }

    pub fn mid_angle(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Slice the aggregate in ascending year order.
///
/// Years with a non-positive total cannot be drawn as a wedge and are left
/// out. Empty when nothing positive remains.
pub fn pie_slices(aggregate: &YearlyAggregate) -> Vec<PieSlice> {
    let positive: Vec<(i32, f64)> = aggregate.iter().filter(|(_, v)| *v > 0.0).collect();
    let total: f64 = positive.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = 0.0;
    positive
        .into_iter()
        .map(|(year, value)| {
            let fraction = value / total;
            let end = start + fraction * TAU;
            let slice = PieSlice {
                year,
                value,
                fraction,
                start,
                end,
            };
            start = end;
            slice
        })
        .collect()
}
