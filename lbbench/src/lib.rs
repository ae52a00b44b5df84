#![warn(missing_docs)]
//! # lbbench
//!
//! Benchmark-to-chart pipeline for Go load balancer algorithms.
//!
//! Run from a Go module root, `lbbench`:
//! - **Runs** `go test -bench=Pick ./internal/balancer/... -v -benchmem`
//! - **Parses** every `Benchmark<Algo>_Pick/<backends>-<cores> ... ns/op` line
//! - **Groups** measurements per algorithm, sorted by backend count
//! - **Writes** `benchmark_data.json` and `benchmark_results.png`
//!
//! ## Library use
//!
//! ```ignore
//! use lbbench::{BenchLineParser, write_json_snapshot};
//!
//! let parser = BenchLineParser::pick()?;
//! let results = parser.parse_transcript(&transcript);
//! write_json_snapshot(Path::new("benchmark_data.json"), &results)?;
//! ```

// Re-export core types
pub use lbbench_core::{
    BenchLineParser, DEFAULT_SUFFIX_TAG, MatchedLine, Measurement, ParsedLine, ResultSet, Series,
    aggregate,
};

// Re-export sinks
pub use lbbench_report::{
    ChartConfig, ReportError, format_summary, read_json_snapshot, render_chart, write_chart,
    write_json_snapshot,
};

// Re-export pipeline
pub use lbbench_cli::{
    HarnessCommand, HarnessConfig, HarnessOutput, HarnessRunner, OutputConfig, Pipeline,
    PipelineConfig, PipelineError, PipelineOutcome, ProcessRunner, RunnerError, Sink,
};

/// Run the lbbench CLI.
///
/// ```ignore
/// fn main() {
///     lbbench::run().unwrap();
/// }
/// ```
pub use lbbench_cli::run;
