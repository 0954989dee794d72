//! Box-office CLI: fetch or load the ranking, then write exports and charts.
//!
//! `boxoffice [LOCAL_CSV] [--output-dir DIR]`
//!
//! Without a snapshot (or when the given file does not exist) the ranking is
//! fetched from the remote service.

use std::path::PathBuf;

use anyhow::{Context, Result};
use boxoffice_core::data::EndataProvider;
use boxoffice_runner::{run, PipelineOptions, RunSummary};
use clap::Parser;
use env_logger::{Env, Target};

#[derive(Parser)]
#[command(
    name = "boxoffice",
    about = "Box-office ranking: CSV/JSON/XLSX export and charts"
)]
struct Cli {
    /// Local CSV snapshot. Used only if the file exists.
    local_csv: Option<PathBuf>,

    /// Directory in which the timestamped run directory is created.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .init();

    let cli = Cli::parse();
    match run_once(cli) {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            eprintln!("Hint: retry with a local snapshot, e.g. `boxoffice path/to/movies.csv`");
            std::process::exit(1);
        }
    }
}

fn run_once(cli: Cli) -> Result<RunSummary> {
    let options = PipelineOptions::new(cli.local_csv, cli.output_dir);
    let provider = EndataProvider::default();
    run(&options, &provider).context("box-office run aborted, no files written")
}

fn print_summary(summary: &RunSummary) {
    println!("CSV:  {}", summary.exports.csv.display());
    println!("JSON: {}", summary.exports.json.display());
    println!("XLSX: {}", summary.exports.xlsx.display());
    println!();
    println!("Charts:");
    for chart in &summary.charts {
        println!("  {}", chart.display());
    }
    println!();
    println!("Source: {}", summary.source);
    println!("Records: {}", summary.dataset.len());
    println!("Dataset hash: {}", summary.dataset_hash.short());
    println!(
        "Defaulted numeric cells: {}",
        summary.mapping.defaulted_numeric
    );
    println!("Unparsed release dates: {}", summary.normalize.unparsed_dates);
}
