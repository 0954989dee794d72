//! Chart rendering: five PNG charts from a normalized dataset.
//!
//! Every chart owns its drawing surface for the duration of one call: the
//! bitmap is created, filled, flushed to disk and dropped before the call
//! returns. A chart that fails part way removes its half-written file.
//!
//! Colors come from plotters' default palette (`Palette99`); callers never
//! pick colors.

mod bar;
pub mod fonts;
mod line;
mod pie;
mod scatter;
pub mod select;

use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use boxoffice_core::Dataset;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RendererConfig;

/// The five charts produced per run, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    ReleaseLine,
    YearlyShare,
    TopTicketPrice,
    TopAudience,
    PriceVsRevenue,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::ReleaseLine,
        ChartKind::YearlyShare,
        ChartKind::TopTicketPrice,
        ChartKind::TopAudience,
        ChartKind::PriceVsRevenue,
    ];

    /// Human-readable part of the chart's file name.
    pub fn file_label(self) -> &'static str {
        match self {
            ChartKind::ReleaseLine => "上映日期 vs 票房",
            ChartKind::YearlyShare => "年度票房占比",
            ChartKind::TopTicketPrice => "top10平均票价",
            ChartKind::TopAudience => "top10平均场次观众数",
            ChartKind::PriceVsRevenue => "票价 vs 票房",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::ReleaseLine => "总票房随上映日期变化",
            ChartKind::YearlyShare => "各年度总票房占比",
            ChartKind::TopTicketPrice => "平均票价前十的电影（元）",
            ChartKind::TopAudience => "平均场次观众数前十的电影",
            ChartKind::PriceVsRevenue => "平均票价与总票房关系",
        }
    }

    /// Fails only for an empty dataset.
    ///
    /// Undated records or zero revenue still produce a chart: the line and
    /// pie charts are then drawn without data and, when text is available,
    /// carry a short notice instead.
    pub fn check_input(self, dataset: &Dataset) -> Result<(), ChartError> {
        if dataset.is_empty() {
            return Err(ChartError::EmptyInput { chart: self });
        }
        Ok(())
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::ReleaseLine => "release-date line chart",
            ChartKind::YearlyShare => "yearly share pie chart",
            ChartKind::TopTicketPrice => "top ticket price bar chart",
            ChartKind::TopAudience => "top audience bar chart",
            ChartKind::PriceVsRevenue => "price vs revenue scatter",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during chart generation
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("cannot render {chart}: no plottable records")]
    EmptyInput { chart: ChartKind },

    #[error("failed to draw chart: {0}")]
    Drawing(String),
}

fn draw_err(e: impl fmt::Display) -> ChartError {
    ChartError::Drawing(e.to_string())
}

/// Renders charts with one explicit configuration.
///
/// Font discovery happens once at construction. Without a usable font the
/// renderer still draws every chart, just without titles, axis text or
/// annotations.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    config: RendererConfig,
    font: Option<PathBuf>,
}

impl ChartRenderer {
    pub fn new(config: RendererConfig) -> Self {
        let font = fonts::load_font(&config);
        Self { config, font }
    }

    /// Renderer that never draws text, regardless of installed fonts.
    pub fn without_text(config: RendererConfig) -> Self {
        Self { config, font: None }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Font file used for chart text, if any.
    pub fn font(&self) -> Option<&Path> {
        self.font.as_deref()
    }

    fn text_enabled(&self) -> bool {
        self.font.is_some()
    }

    fn title_style(&self) -> TextStyle<'static> {
        (fonts::FAMILY, self.config.title_font_size).into_font().into()
    }

    fn label_style(&self) -> TextStyle<'static> {
        (fonts::FAMILY, self.config.label_font_size).into_font().into()
    }

    /// Fail fast on an empty dataset, before the run directory exists.
    pub fn check_inputs(&self, dataset: &Dataset) -> Result<(), ChartError> {
        ChartKind::ALL
            .iter()
            .try_for_each(|kind| kind.check_input(dataset))
    }

    /// Render one chart to `path`.
    pub fn render(&self, kind: ChartKind, dataset: &Dataset, path: &Path) -> Result<(), ChartError> {
        log::debug!("rendering {kind} to {}", path.display());
        match kind {
            ChartKind::ReleaseLine => self.render_release_line(dataset, path),
            ChartKind::YearlyShare => self.render_yearly_share(dataset, path),
            ChartKind::TopTicketPrice => self.render_top_ticket_price(dataset, path),
            ChartKind::TopAudience => self.render_top_audience(dataset, path),
            ChartKind::PriceVsRevenue => self.render_price_vs_revenue(dataset, path),
        }
    }

    /// Render all five charts sequentially; `path_for` names each file.
    pub fn render_all(
        &self,
        dataset: &Dataset,
        path_for: impl Fn(ChartKind) -> PathBuf,
    ) -> Result<Vec<PathBuf>, ChartError> {
        let mut written = Vec::with_capacity(ChartKind::ALL.len());
        for kind in ChartKind::ALL {
            let path = path_for(kind);
            self.render(kind, dataset, &path)?;
            written.push(path);
        }
        Ok(written)
    }

    /// Centered one-line message for charts with nothing to plot.
    fn draw_notice(
        &self,
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        message: &str,
    ) -> Result<(), ChartError> {
        let (width, height) = root.dim_in_pixel();
        let style = self
            .label_style()
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(
            message,
            ((width / 2) as i32, (height / 2) as i32),
            style,
        ))
        .map_err(draw_err)
    }

    /// Point annotation offset in backend pixels (y grows downward).
    fn annotation_offset(&self) -> (i32, i32) {
        let (dx, dy) = self.config.annotation_offset;
        (dx, -dy)
    }
}

/// Acquire a bitmap surface, run `draw` on it, flush and release it.
///
/// The surface is dropped before this returns on every path. On failure the
/// output file is removed so no partial image is left behind.
fn render_to<F>(path: &Path, size: (u32, u32), draw: F) -> Result<(), ChartError>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<(), ChartError>,
{
    let result = {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)
            .map_err(draw_err)
            .and_then(|_| draw(&root))
            .and_then(|_| root.present().map_err(draw_err))
    };

    if result.is_err() && path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("could not remove partial chart {}: {e}", path.display());
        }
    }
    result
}

/// Axis range covering `values` with a 5% margin; never zero-width.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let span = max - min;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        (max.abs() * 0.1).max(1.0)
    };
    (min - pad)..(max + pad)
}

/// Value axis starting at zero with headroom above the largest value.
fn zero_based_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let max = values.fold(0.0_f64, f64::max);
    if max > 0.0 {
        0.0..max * 1.1
    } else {
        0.0..1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxoffice_core::MovieRecord;

    #[test]
    fn file_labels_are_distinct() {
        let mut labels: Vec<_> = ChartKind::ALL.iter().map(|k| k.file_label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 5);
    }

    #[test]
    fn empty_dataset_fails_every_chart() {
        let ds = Dataset::default();
        for kind in ChartKind::ALL {
            assert!(matches!(
                kind.check_input(&ds),
                Err(ChartError::EmptyInput { chart }) if chart == kind
            ));
        }
    }

    #[test]
    fn undated_dataset_passes_every_check() {
        let ds = Dataset::new(vec![MovieRecord::unparsed(1, "A", "?", 0.0, 1.0, 1.0)]);
        for kind in ChartKind::ALL {
            assert!(kind.check_input(&ds).is_ok(), "{kind}");
        }
    }

    fn two_movies() -> Dataset {
        let raw = Dataset::new(vec![
            MovieRecord::unparsed(1, "A", "2023-01-10", 1000.0, 45.5, 120.0),
            MovieRecord::unparsed(2, "B", "2022-12-25", 800.0, 50.0, 90.0),
        ]);
        boxoffice_core::normalize(&raw).dataset
    }

    fn render_every_chart(renderer: &ChartRenderer, ds: &Dataset) {
        let dir = tempfile::tempdir().unwrap();
        for kind in ChartKind::ALL {
            let path = dir.path().join(format!("{}.png", kind.file_label()));
            renderer.render(kind, ds, &path).unwrap();
            let bytes = std::fs::read(&path).unwrap();
            assert!(bytes.starts_with(b"\x89PNG"), "{kind}");
        }
    }

    #[test]
    fn textless_renderer_draws_every_chart() {
        let renderer = ChartRenderer::without_text(RendererConfig::default());
        render_every_chart(&renderer, &two_movies());
    }

    #[test]
    fn textless_renderer_handles_undated_and_zero_revenue() {
        let renderer = ChartRenderer::without_text(RendererConfig::default());
        let undated = Dataset::new(vec![MovieRecord::unparsed(1, "A", "", 10.0, 30.0, 5.0)]);
        render_every_chart(&renderer, &undated);

        let zero_revenue = boxoffice_core::normalize(&Dataset::new(vec![
            MovieRecord::unparsed(1, "A", "2023-01-10", 0.0, 30.0, 5.0),
        ]))
        .dataset;
        render_every_chart(&renderer, &zero_revenue);
    }

    #[test]
    fn empty_dataset_writes_no_file() {
        let renderer = ChartRenderer::without_text(RendererConfig::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("line.png");
        assert!(renderer
            .render(ChartKind::ReleaseLine, &Dataset::default(), &path)
            .is_err());
        assert!(!path.exists());
    }

    #[test]
    fn padded_range_never_collapses() {
        let r = padded_range([5.0, 5.0].into_iter());
        assert!(r.start < 5.0 && r.end > 5.0);
        let r = padded_range(std::iter::empty());
        assert_eq!(r, 0.0..1.0);
        let r = padded_range([0.0, 100.0].into_iter());
        assert_eq!(r, -5.0..105.0);
    }

    #[test]
    fn zero_based_range_has_headroom() {
        let r = zero_based_range([10.0, 50.0].into_iter());
        assert_eq!(r.start, 0.0);
        assert!(r.end > 50.0);
        assert_eq!(zero_based_range([0.0].into_iter()), 0.0..1.0);
    }

    #[test]
    fn error_message_names_the_chart() {
        let err = ChartError::EmptyInput {
            chart: ChartKind::TopAudience,
        };
        assert_eq!(
            err.to_string(),
            "cannot render top audience bar chart: no plottable records"
        );
    }
}
