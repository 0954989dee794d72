//! Box-office runner: exports, charts and the run pipeline.
//!
//! This crate builds on `boxoffice-core` to provide:
//! - Dataset loading with local snapshot / remote fallback
//! - CSV, JSON and XLSX export with a yearly aggregate sheet
//! - Five PNG charts rendered with an explicit renderer configuration
//! - Timestamped run layout and the all-or-nothing run pipeline

pub mod charts;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod layout;
pub mod pipeline;

pub use charts::{ChartError, ChartKind, ChartRenderer};
pub use config::{PipelineOptions, RendererConfig};
pub use data_loader::{load_dataset, LoadedData};
pub use export::{export_all, read_csv_export, read_json_export, ExportError, ExportPaths};
pub use layout::RunLayout;
pub use pipeline::{run, run_pipeline, RunError, RunSummary};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn run_types_are_send_sync() {
        assert_send::<RunSummary>();
        assert_sync::<RunSummary>();
        assert_send::<ChartRenderer>();
        assert_sync::<ChartRenderer>();
        assert_send::<PipelineOptions>();
    }
}
