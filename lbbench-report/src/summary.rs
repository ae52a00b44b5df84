//! Terminal Summary
//!
//! Human-readable table printed after a run:
//!
//! ```text
//! Pick Benchmark Results
//! ============================================================
//!
//! RoundRobin
//! ------------------------------------------------------------
//!         backends        time/op
//!               10       61.25 ns
//!             1000        2.50 µs
//! ```

use lbbench_core::ResultSet;

/// Format a nanosecond value with an adaptive unit
pub fn format_duration(ns: f64) -> String {
    let abs = ns.abs();
    if abs < 1_000.0 {
        format!("{:.2} ns", ns)
    } else if abs < 1_000_000.0 {
        format!("{:.2} µs", ns / 1_000.0)
    } else if abs < 1_000_000_000.0 {
        format!("{:.2} ms", ns / 1_000_000.0)
    } else {
        format!("{:.2} s", ns / 1_000_000_000.0)
    }
}

/// Format a result set as a per-algorithm table
pub fn format_summary(results: &ResultSet) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Pick Benchmark Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    for (algorithm, series) in results.iter() {
        output.push_str(algorithm);
        output.push('\n');
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!("  {:>14}  {:>14}\n", "backends", "time/op"));

        for m in series {
            output.push_str(&format!(
                "  {:>14}  {:>14}\n",
                m.backend_count,
                format_duration(m.ns_per_op)
            ));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "{} algorithm(s), {} measurement(s)\n",
        results.len(),
        results.measurement_count()
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use lbbench_core::aggregate;

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(61.25), "61.25 ns");
        assert_eq!(format_duration(2500.0), "2.50 µs");
        assert_eq!(format_duration(3_250_000.0), "3.25 ms");
        assert_eq!(format_duration(1_500_000_000.0), "1.50 s");
    }

    #[test]
    fn test_summary_lists_every_algorithm() {
        let results = aggregate([
            ("RoundRobin", 1000, 2500.0),
            ("IPHash", 10, 90.0),
            ("RoundRobin", 10, 61.25),
        ]);
        let text = format_summary(&results);

        let ip = text.find("IPHash").unwrap();
        let rr = text.find("RoundRobin").unwrap();
        assert!(ip < rr, "algorithms are listed in name order");

        let small = text.find("61.25 ns").unwrap();
        let large = text.find("2.50 µs").unwrap();
        assert!(small < large, "rows follow backend count order");

        assert!(text.ends_with("2 algorithm(s), 3 measurement(s)\n"));
    }
}
