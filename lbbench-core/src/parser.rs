//! Transcript Parser
//!
//! Extracts `(algorithm, backend count, ns/op)` from `go test -bench -v -benchmem`
//! output. A data line looks like:
//!
//! ```text
//! BenchmarkRoundRobin_Pick/1000-16     1000000      2500 ns/op     0 B/op    0 allocs/op
//!          └─ algorithm ─┘ └count┘└cores┘ └iters┘  └ns/op┘
//! ```
//!
//! The core suffix and iteration count are discarded. Everything else in the
//! transcript (`=== RUN`, `goos:`, `PASS`, `ok ...`) is ignored.

use crate::aggregate::aggregate;
use crate::model::ResultSet;
use crate::{DEFAULT_SUFFIX_TAG, NS_PER_OP_UNIT};
use regex::Regex;
use tracing::debug;

/// A data line that matched the benchmark pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedLine<'a> {
    /// Algorithm identifier (text between `Benchmark` and `_<suffix>`)
    pub algorithm: &'a str,
    /// Backend count from the sub-benchmark name
    pub backend_count: u64,
    /// Reported nanoseconds per operation
    pub ns_per_op: f64,
}

impl<'a> MatchedLine<'a> {
    /// Flatten into an aggregation triple
    pub fn into_triple(self) -> (&'a str, u64, f64) {
        (self.algorithm, self.backend_count, self.ns_per_op)
    }
}

/// Outcome of classifying one transcript line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedLine<'a> {
    /// Well-formed data line
    Matched(MatchedLine<'a>),
    /// Anything else: noise, headers, summaries, or unparseable numbers
    Unmatched,
}

impl<'a> ParsedLine<'a> {
    /// The matched data, if any
    pub fn matched(self) -> Option<MatchedLine<'a>> {
        match self {
            ParsedLine::Matched(m) => Some(m),
            ParsedLine::Unmatched => None,
        }
    }
}

/// Line-oriented parser for Go benchmark transcripts
#[derive(Debug, Clone)]
pub struct BenchLineParser {
    pattern: Regex,
}

impl BenchLineParser {
    /// Parser for `Benchmark<Algo>_<suffix_tag>/<count>-<cores>` lines.
    ///
    /// The tag is matched literally.
    pub fn new(suffix_tag: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r"Benchmark(\w+)_{}/(\d+)-\d+\s+\d+\s+(\d+(?:\.\d+)?)\s+{}",
            regex::escape(suffix_tag),
            regex::escape(NS_PER_OP_UNIT),
        );
        Ok(Self {
            pattern: Regex::new(&pattern)?,
        })
    }

    /// Parser for the `_Pick` balancer benchmarks
    pub fn pick() -> Result<Self, regex::Error> {
        Self::new(DEFAULT_SUFFIX_TAG)
    }

    /// Classify a single line
    pub fn parse_line<'a>(&self, line: &'a str) -> ParsedLine<'a> {
        let Some(caps) = self.pattern.captures(line) else {
            return ParsedLine::Unmatched;
        };

        let (Some(algorithm), Some(count), Some(ns)) = (caps.get(1), caps.get(2), caps.get(3))
        else {
            return ParsedLine::Unmatched;
        };

        let Ok(backend_count) = count.as_str().parse::<u64>() else {
            debug!(line, "backend count out of range, skipping");
            return ParsedLine::Unmatched;
        };
        let ns_per_op = match ns.as_str().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                debug!(line, "ns/op value not representable, skipping");
                return ParsedLine::Unmatched;
            }
        };

        ParsedLine::Matched(MatchedLine {
            algorithm: algorithm.as_str(),
            backend_count,
            ns_per_op,
        })
    }

    /// Iterate the data lines of a transcript in encounter order
    pub fn matches<'a, 'p>(
        &'p self,
        transcript: &'a str,
    ) -> impl Iterator<Item = MatchedLine<'a>> + 'p
    where
        'a: 'p,
    {
        transcript
            .lines()
            .filter_map(move |line| self.parse_line(line).matched())
    }

    /// Parse a whole transcript into a sorted `ResultSet`.
    ///
    /// Returns an empty set when nothing matched; deciding whether that is an
    /// error is up to the caller.
    pub fn parse_transcript(&self, transcript: &str) -> ResultSet {
        let results = aggregate(self.matches(transcript).map(MatchedLine::into_triple));
        debug!(
            algorithms = results.len(),
            measurements = results.measurement_count(),
            "parsed transcript"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Measurement;

    fn parser() -> BenchLineParser {
        BenchLineParser::pick().unwrap()
    }

    fn points(results: &ResultSet, algo: &str) -> Vec<(u64, f64)> {
        results
            .get(algo)
            .unwrap()
            .iter()
            .map(|m| (m.backend_count, m.ns_per_op))
            .collect()
    }

    const TRANSCRIPT: &str = "\
goos: linux
goarch: amd64
pkg: LoadBalancer/internal/balancer
cpu: AMD Ryzen 9 5950X 16-Core Processor
=== RUN   BenchmarkRoundRobin_Pick
BenchmarkRoundRobin_Pick/1000-16         \t 1000000\t      2500 ns/op\t       0 B/op\t       0 allocs/op
BenchmarkLeastConn_Pick/10-16            \t 5000000\t       230.5 ns/op\t      16 B/op\t       1 allocs/op

BenchmarkRoundRobin_Pick/10-16           \t20000000\t        61.25 ns/op\t       0 B/op\t       0 allocs/op
BenchmarkLeastConn_Pick/1000-16          \t   50000\t     24110 ns/op\t      16 B/op\t       1 allocs/op
PASS
ok  \tLoadBalancer/internal/balancer\t12.345s
";

    #[test]
    fn test_single_line() {
        let line = "BenchmarkA_Pick/1000-16    1000000    2500 ns/op";
        assert_eq!(
            parser().parse_line(line),
            ParsedLine::Matched(MatchedLine {
                algorithm: "A",
                backend_count: 1000,
                ns_per_op: 2500.0,
            })
        );

        let results = parser().parse_transcript(line);
        assert_eq!(results.len(), 1);
        assert_eq!(points(&results, "A"), vec![(1000, 2500.0)]);
    }

    #[test]
    fn test_decimal_ns_per_op() {
        let m = parser()
            .parse_line("BenchmarkWeighted_Pick/100-8   3000000   412.75 ns/op")
            .matched()
            .unwrap();
        assert_eq!(m.algorithm, "Weighted");
        assert_eq!(m.backend_count, 100);
        assert!((m.ns_per_op - 412.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_benchmem_columns_are_tolerated() {
        let line = "BenchmarkIPHash_Pick/10-4  10000000  118 ns/op  24 B/op  2 allocs/op";
        assert!(matches!(parser().parse_line(line), ParsedLine::Matched(_)));
    }

    #[test]
    fn test_noise_lines_are_unmatched() {
        let p = parser();
        for line in [
            "",
            "   ",
            "goos: linux",
            "=== RUN   BenchmarkRoundRobin_Pick",
            "=== RUN   BenchmarkRoundRobin_Pick/1000",
            "PASS",
            "ok  \tLoadBalancer/internal/balancer\t1.2s",
            // other suffixes are not recognized
            "BenchmarkPool_AddBackend-16   3000   400000 ns/op",
            "BenchmarkRoundRobin_Select/10-16   1000   12 ns/op",
            // missing core suffix
            "BenchmarkRoundRobin_Pick/10   1000   12 ns/op",
            // missing unit
            "BenchmarkRoundRobin_Pick/10-16   1000   12",
        ] {
            assert_eq!(p.parse_line(line), ParsedLine::Unmatched, "line: {line:?}");
        }
    }

    #[test]
    fn test_overflowing_count_is_unmatched() {
        let line = "BenchmarkA_Pick/99999999999999999999999-16   10   5 ns/op";
        assert_eq!(parser().parse_line(line), ParsedLine::Unmatched);
    }

    #[test]
    fn test_infinite_ns_per_op_is_unmatched() {
        let line = format!("BenchmarkA_Pick/10-16   10   {} ns/op", "9".repeat(400));
        assert_eq!(parser().parse_line(&line), ParsedLine::Unmatched);

        let transcript = format!("{}\nBenchmarkA_Pick/20-16   10   7 ns/op\n", line);
        let results = parser().parse_transcript(&transcript);
        let series = results.get("A").unwrap();
        assert_eq!(series.len(), 1);
        assert!(series.iter().all(|m| m.ns_per_op.is_finite()));
    }

    #[test]
    fn test_greedy_algorithm_name() {
        let m = parser()
            .parse_line("BenchmarkLeast_Connections_Pick/10-2   100   9 ns/op")
            .matched()
            .unwrap();
        assert_eq!(m.algorithm, "Least_Connections");
    }

    #[test]
    fn test_noise_is_inert() {
        let p = parser();
        let data_only: String = TRANSCRIPT
            .lines()
            .filter(|l| matches!(p.parse_line(l), ParsedLine::Matched(_)))
            .collect::<Vec<_>>()
            .join("\n");

        assert_eq!(p.parse_transcript(TRANSCRIPT), p.parse_transcript(&data_only));
    }

    #[test]
    fn test_grouping_and_sorting() {
        let results = parser().parse_transcript(TRANSCRIPT);

        assert_eq!(
            results.algorithms().collect::<Vec<_>>(),
            vec!["LeastConn", "RoundRobin"]
        );
        assert_eq!(
            points(&results, "RoundRobin"),
            vec![(10, 61.25), (1000, 2500.0)]
        );
        assert_eq!(
            points(&results, "LeastConn"),
            vec![(10, 230.5), (1000, 24110.0)]
        );
    }

    #[test]
    fn test_out_of_order_counts_are_sorted() {
        let transcript = "\
BenchmarkRoundRobin_Pick/8-4   100   80 ns/op
BenchmarkRoundRobin_Pick/2-4   100   20 ns/op
";
        let results = parser().parse_transcript(transcript);
        assert_eq!(
            results.get("RoundRobin").unwrap().points(),
            &[Measurement::new(2, 20.0), Measurement::new(8, 80.0)]
        );
    }

    #[test]
    fn test_no_matches_yields_empty_set() {
        let results = parser().parse_transcript("PASS\nok  \tpkg\t0.01s\n");
        assert!(results.is_empty());
    }

    #[test]
    fn test_suffix_tag_is_literal() {
        let p = BenchLineParser::new("P.ck").unwrap();
        assert_eq!(
            p.parse_line("BenchmarkA_Pick/10-1  1  1 ns/op"),
            ParsedLine::Unmatched
        );
        assert!(matches!(
            p.parse_line("BenchmarkA_P.ck/10-1  1  1 ns/op"),
            ParsedLine::Matched(_)
        ));
    }
}
