#![warn(missing_docs)]
//! lbbench CLI Library
//!
//! Drives the load-balancer benchmark pipeline from the current directory:
//! check for `go.mod`, run `go test -bench=Pick`, parse the transcript,
//! print a summary, then write `benchmark_data.json` and
//! `benchmark_results.png`.
//!
//! # Example
//!
//! ```ignore
//! fn main() {
//!     if let Err(e) = lbbench_cli::run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

mod config;
mod pipeline;
mod preflight;
mod runner;

pub use config::*;
pub use pipeline::{Pipeline, PipelineError, PipelineOutcome, Sink};
pub use preflight::check_project_root;
pub use runner::*;

use anyhow::Context;
use clap::Parser;

/// lbbench CLI arguments
///
/// The pipeline takes no options; the parser only answers `--help` and
/// `--version`.
#[derive(Parser, Debug)]
#[command(name = "lbbench")]
#[command(
    author,
    version,
    about = "Benchmark load balancer Pick algorithms and chart ns/op against backend count"
)]
pub struct Cli {}

/// Run the lbbench CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` once both artifacts are written, or the first fatal error.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the lbbench CLI with pre-parsed arguments.
pub fn run_with_cli(_cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("lbbench=info")
        .with_writer(std::io::stderr)
        .init();

    let project_dir =
        std::env::current_dir().context("Failed to determine the current directory")?;

    let pipeline = Pipeline::new(project_dir, PipelineConfig::default(), ProcessRunner);
    pipeline.run()?;

    Ok(())
}
