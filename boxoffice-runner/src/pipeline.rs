//! One run: load → normalize → aggregate → export → charts.
//!
//! `RunError` is the single top-level guard type. A run either writes every
//! artifact or leaves nothing behind: inputs are validated before the run
//! directory exists, and any later failure removes the directory again.

use std::path::{Path, PathBuf};

use boxoffice_core::data::{DataSource, RankingProvider, SourceError};
use boxoffice_core::{aggregate, Dataset, DatasetHash, MappingReport, NormalizeReport, YearlyAggregate};
use chrono::NaiveDateTime;
use thiserror::Error;

use crate::charts::{ChartError, ChartRenderer};
use crate::config::PipelineOptions;
use crate::data_loader::load_dataset;
use crate::export::{export_all, ExportError, ExportPaths};
use crate::layout::RunLayout;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("data error: {0}")]
    Source(#[from] SourceError),

    #[error("chart error: {0}")]
    Chart(#[from] ChartError),

    #[error("export error: {0}")]
    Export(#[from] ExportError),

    #[error("run directory {} already exists", .0.display())]
    RunDirExists(PathBuf),

    #[error("failed to create run directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_dir: PathBuf,
    pub exports: ExportPaths,
    /// Chart files in rendering order.
    pub charts: Vec<PathBuf>,
    pub dataset: Dataset,
    pub aggregate: YearlyAggregate,
    pub source: DataSource,
    pub dataset_hash: DatasetHash,
    pub mapping: MappingReport,
    pub normalize: NormalizeReport,
}

/// Run the pipeline stamped with the current local time.
pub fn run(options: &PipelineOptions, provider: &dyn RankingProvider) -> Result<RunSummary, RunError> {
    run_pipeline(options, provider, chrono::Local::now().naive_local())
}

/// Run the pipeline with an explicit timestamp for the output names.
pub fn run_pipeline(
    options: &PipelineOptions,
    provider: &dyn RankingProvider,
    now: NaiveDateTime,
) -> Result<RunSummary, RunError> {
    let loaded = load_dataset(options.snapshot.as_deref(), provider)?;

    let renderer = ChartRenderer::new(options.renderer.clone());
    renderer.check_inputs(&loaded.dataset)?;

    let aggregate = aggregate(&loaded.dataset);
    log::info!("aggregated {} year(s)", aggregate.len());

    let layout = RunLayout::new(&options.output_root, now);
    create_run_dir(&layout)?;

    let (exports, charts) = populate_or_remove(layout.dir(), || {
        write_artifacts(&renderer, &loaded.dataset, &aggregate, &layout)
    })?;

    log::info!(
        "run complete: 3 data files and {} charts in {}",
        charts.len(),
        layout.dir().display()
    );

    Ok(RunSummary {
        run_dir: layout.dir().to_path_buf(),
        exports,
        charts,
        dataset: loaded.dataset,
        aggregate,
        source: loaded.source,
        dataset_hash: loaded.dataset_hash,
        mapping: loaded.mapping,
        normalize: loaded.normalize,
    })
}

fn create_run_dir(layout: &RunLayout) -> Result<(), RunError> {
    let dir = layout.dir();
    if dir.exists() {
        return Err(RunError::RunDirExists(dir.to_path_buf()));
    }
    if let Some(parent) = dir.parent() {
        std::fs::create_dir_all(parent).map_err(|source| RunError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::create_dir(dir).map_err(|source| {
        if source.kind() == std::io::ErrorKind::AlreadyExists {
            RunError::RunDirExists(dir.to_path_buf())
        } else {
            RunError::CreateDir {
                path: dir.to_path_buf(),
                source,
            }
        }
    })
}

/// Run `fill` against a freshly created directory; remove the directory if it fails.
fn populate_or_remove<T>(
    dir: &Path,
    fill: impl FnOnce() -> Result<T, RunError>,
) -> Result<T, RunError> {
    fill().map_err(|e| {
        log::error!("run failed, removing {}", dir.display());
        if let Err(rm) = std::fs::remove_dir_all(dir) {
            log::warn!("could not remove {}: {rm}", dir.display());
        }
        e
    })
}

fn write_artifacts(
    renderer: &ChartRenderer,
    dataset: &Dataset,
    aggregate: &YearlyAggregate,
    layout: &RunLayout,
) -> Result<(ExportPaths, Vec<PathBuf>), RunError> {
    let exports = export_all(dataset, aggregate, layout)?;
    let charts = renderer.render_all(dataset, |kind| layout.chart_file(kind))?;
    Ok((exports, charts))
}
