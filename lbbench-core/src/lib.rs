#![warn(missing_docs)]
//! lbbench Core - Measurements and Transcript Parsing
//!
//! This crate turns the text a Go benchmark run prints into chart-ready data:
//! - `Measurement`, `Series` and `ResultSet` data model
//! - `BenchLineParser` for `go test -bench` transcript lines
//! - `aggregate` for grouping already-extracted triples per algorithm
//!
//! ```text
//! transcript ──► BenchLineParser ──► (algorithm, count, ns/op) ──► aggregate ──► ResultSet
//! ```

mod aggregate;
mod model;
mod parser;

pub use aggregate::aggregate;
pub use model::{Measurement, ResultSet, Series};
pub use parser::{BenchLineParser, MatchedLine, ParsedLine};

/// Benchmark name suffix recognized by the parser (`Benchmark<Algo>_Pick/...`)
pub const DEFAULT_SUFFIX_TAG: &str = "Pick";

/// Unit label that terminates the timing column of a data line
pub const NS_PER_OP_UNIT: &str = "ns/op";
