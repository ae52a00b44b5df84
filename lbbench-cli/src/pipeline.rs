//! Pipeline Driver
//!
//! Preflight → harness → parse → summary → JSON → chart, strictly in order.
//! Every stage is fail-fast; nothing is written unless a non-empty
//! `ResultSet` has been assembled and its chart rendered.

use crate::config::PipelineConfig;
use crate::preflight::check_project_root;
use crate::runner::{HarnessRunner, RunnerError};
use lbbench_core::{BenchLineParser, ResultSet};
use lbbench_report::{ReportError, format_summary, render_chart_png, write_json_snapshot};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Output sink that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    /// JSON snapshot
    Json,
    /// PNG chart
    Chart,
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Json => write!(f, "JSON snapshot"),
            Sink::Chart => write!(f, "chart"),
        }
    }
}

/// Fatal pipeline failures; none is recovered from
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The marker file is missing from the working directory
    #[error(
        "Please run this tool from the project root directory ({} not found in {})",
        .marker,
        .dir.display()
    )]
    NotProjectRoot {
        /// Directory that was checked
        dir: PathBuf,
        /// Marker file expected in it
        marker: String,
    },

    /// The harness ran but exited non-zero
    #[error("Benchmark harness `{command}` failed ({})", describe_status(.status))]
    HarnessFailed {
        /// Command line that was run
        command: String,
        /// Exit code, `None` if killed by a signal
        status: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The harness could not be started
    #[error("{0}")]
    HarnessSpawn(#[from] RunnerError),

    /// The configured suffix tag produced an invalid pattern
    #[error("Invalid benchmark line pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The transcript held no data lines
    #[error("No benchmark data found in the harness output")]
    NoBenchmarkData,

    /// An output sink failed
    #[error("Failed to write {sink}: {source}")]
    Sink {
        /// Which sink
        sink: Sink,
        /// Underlying report error
        #[source]
        source: ReportError,
    },
}

fn describe_status(status: &Option<i32>) -> String {
    match *status {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Parsed and sorted measurements
    pub results: ResultSet,
    /// Where the JSON snapshot was written
    pub json_path: PathBuf,
    /// Where the chart was written
    pub chart_path: PathBuf,
}

/// One end-to-end benchmark run rooted at a project directory
pub struct Pipeline<R> {
    config: PipelineConfig,
    project_dir: PathBuf,
    runner: R,
}

impl<R: HarnessRunner> Pipeline<R> {
    /// Create a pipeline for `project_dir`
    pub fn new(project_dir: impl Into<PathBuf>, config: PipelineConfig, runner: R) -> Self {
        Self {
            config,
            project_dir: project_dir.into(),
            runner,
        }
    }

    /// Run every stage, returning the parsed results and artifact paths
    pub fn run(&self) -> Result<PipelineOutcome, PipelineError> {
        if let Ok(json) = serde_json::to_string(&self.config) {
            debug!(config = %json, "effective configuration");
        }

        check_project_root(&self.project_dir, &self.config.project.marker_file)?;

        let transcript = self.run_benchmarks()?;
        let results = self.parse(&transcript)?;

        print!("{}", format_summary(&results));

        let (json_path, chart_path) = self.write_reports(&results)?;

        Ok(PipelineOutcome {
            results,
            json_path,
            chart_path,
        })
    }

    /// Invoke the harness and return its stdout; any non-zero exit is fatal
    pub fn run_benchmarks(&self) -> Result<String, PipelineError> {
        let command = self.config.harness.command(&self.project_dir);

        println!("Running benchmarks...");
        info!(%command, "invoking benchmark harness");

        let output = self.runner.run(&command)?;
        if !output.success() {
            eprintln!("Error running benchmarks:");
            eprint!("{}", output.stderr);
            return Err(PipelineError::HarnessFailed {
                command: command.to_string(),
                status: output.status,
                stderr: output.stderr,
            });
        }

        debug!(bytes = output.stdout.len(), "captured harness transcript");
        Ok(output.stdout)
    }

    /// Extract and aggregate measurements; an empty result is fatal
    pub fn parse(&self, transcript: &str) -> Result<ResultSet, PipelineError> {
        let parser = BenchLineParser::new(&self.config.parser.suffix_tag)?;
        let results = parser.parse_transcript(transcript);

        if results.is_empty() {
            return Err(PipelineError::NoBenchmarkData);
        }

        info!(
            algorithms = results.len(),
            measurements = results.measurement_count(),
            "parsed benchmark results"
        );
        Ok(results)
    }

    /// Write both artifacts, or neither.
    ///
    /// The chart is rendered in memory first so a render failure leaves the
    /// directory untouched; a failed PNG write removes the fresh JSON.
    pub fn write_reports(&self, results: &ResultSet) -> Result<(PathBuf, PathBuf), PipelineError> {
        let json_path = self.config.output.json_path_in(&self.project_dir);
        let chart_path = self.config.output.chart_path_in(&self.project_dir);

        let png = render_chart_png(results, &self.config.chart).map_err(|source| {
            PipelineError::Sink {
                sink: Sink::Chart,
                source,
            }
        })?;

        write_json_snapshot(&json_path, results).map_err(|source| PipelineError::Sink {
            sink: Sink::Json,
            source,
        })?;
        println!("Results saved to {}", json_path.display());

        println!("Plotting results...");
        if let Err(e) = fs::write(&chart_path, &png) {
            if let Err(cleanup) = fs::remove_file(&json_path) {
                warn!(path = %json_path.display(), error = %cleanup, "could not remove snapshot");
            }
            return Err(PipelineError::Sink {
                sink: Sink::Chart,
                source: ReportError::io(&chart_path, e),
            });
        }
        debug!(path = %chart_path.display(), bytes = png.len(), "wrote chart");
        println!("Graph saved to {}", chart_path.display());

        Ok((json_path, chart_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{HarnessCommand, HarnessOutput};
    use tempfile::tempdir;

    struct Canned(HarnessOutput);

    impl HarnessRunner for Canned {
        fn run(&self, _command: &HarnessCommand) -> Result<HarnessOutput, RunnerError> {
            Ok(self.0.clone())
        }
    }

    fn canned(status: Option<i32>, stdout: &str, stderr: &str) -> Canned {
        Canned(HarnessOutput {
            status,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        })
    }

    fn project() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("go.mod"), "module example.com/lb\n").unwrap();
        dir
    }

    #[test]
    fn test_harness_failure_carries_stderr() {
        let dir = project();
        let pipeline = Pipeline::new(
            dir.path(),
            PipelineConfig::default(),
            canned(Some(1), "", "build failed: undefined: Pick\n"),
        );

        match pipeline.run_benchmarks().unwrap_err() {
            PipelineError::HarnessFailed { status, stderr, command } => {
                assert_eq!(status, Some(1));
                assert_eq!(stderr, "build failed: undefined: Pick\n");
                assert!(command.starts_with("go test -bench=Pick"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_signal_termination_is_failure() {
        let dir = project();
        let pipeline = Pipeline::new(dir.path(), PipelineConfig::default(), canned(None, "", ""));

        let err = pipeline.run_benchmarks().unwrap_err();
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_parse_rejects_empty_transcript() {
        let dir = project();
        let pipeline = Pipeline::new(dir.path(), PipelineConfig::default(), canned(Some(0), "", ""));

        let err = pipeline.parse("PASS\nok  \tlb/internal/balancer\t1.2s\n").unwrap_err();
        assert!(matches!(err, PipelineError::NoBenchmarkData));
        assert!(err.to_string().contains("No benchmark data found"));
    }

    #[test]
    fn test_json_sink_failure_is_labelled() {
        let dir = project();
        let mut config = PipelineConfig::default();
        config.output.json_path = PathBuf::from("missing-dir/benchmark_data.json");
        let pipeline = Pipeline::new(dir.path(), config, canned(Some(0), "", ""));

        let results = pipeline
            .parse("BenchmarkRoundRobin_Pick/10-8  1000  61.25 ns/op\n")
            .unwrap();
        let err = pipeline.write_reports(&results).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Sink {
                sink: Sink::Json,
                ..
            }
        ));
        assert!(!dir.path().join("benchmark_results.png").exists());
    }

    #[test]
    fn test_unrenderable_chart_writes_neither_artifact() {
        let dir = project();
        let pipeline = Pipeline::new(dir.path(), PipelineConfig::default(), canned(Some(0), "", ""));

        let results = pipeline
            .parse("BenchmarkRandom_Pick/0-8  1000  12 ns/op\n")
            .unwrap();
        let err = pipeline.write_reports(&results).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Sink {
                sink: Sink::Chart,
                ..
            }
        ));
        assert!(!dir.path().join("benchmark_data.json").exists());
        assert!(!dir.path().join("benchmark_results.png").exists());
    }

    #[test]
    fn test_chart_write_failure_removes_snapshot() {
        let dir = project();
        let mut config = PipelineConfig::default();
        config.output.chart_path = PathBuf::from("missing-dir/benchmark_results.png");
        let pipeline = Pipeline::new(dir.path(), config, canned(Some(0), "", ""));

        let results = pipeline
            .parse("BenchmarkRoundRobin_Pick/10-8  1000  61.25 ns/op\n")
            .unwrap();
        let err = pipeline.write_reports(&results).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Sink {
                sink: Sink::Chart,
                source: ReportError::Io { .. },
            }
        ));
        assert!(!dir.path().join("benchmark_data.json").exists());
    }

    #[test]
    fn test_run_writes_both_artifacts() {
        let dir = project();
        let transcript = "goos: linux\n\
            BenchmarkRoundRobin_Pick/100-8  1000000  75.5 ns/op  0 B/op  0 allocs/op\n\
            BenchmarkRoundRobin_Pick/10-8   1000000  61.25 ns/op  0 B/op  0 allocs/op\n\
            PASS\n";
        let pipeline = Pipeline::new(
            dir.path(),
            PipelineConfig::default(),
            canned(Some(0), transcript, ""),
        );

        let outcome = pipeline.run().unwrap();
        let series = outcome.results.get("RoundRobin").unwrap();
        let counts: Vec<u64> = series.iter().map(|m| m.backend_count).collect();
        assert_eq!(counts, vec![10, 100]);
        assert!(outcome.json_path.is_file());
        assert!(outcome.chart_path.is_file());
    }
}
