//! Per-Algorithm Aggregation
//!
//! Groups flat `(algorithm, backend_count, ns_per_op)` triples into a
//! `ResultSet`. Points are appended in input order and every series is
//! stable-sorted by backend count once the input is exhausted.

use crate::model::{Measurement, ResultSet};

/// Group triples by algorithm and sort each series by backend count
pub fn aggregate<S, I>(triples: I) -> ResultSet
where
    S: AsRef<str>,
    I: IntoIterator<Item = (S, u64, f64)>,
{
    let mut results = ResultSet::new();
    for (algorithm, backend_count, ns_per_op) in triples {
        results.record(
            algorithm.as_ref(),
            Measurement::new(backend_count, ns_per_op),
        );
    }
    results.sort_series();
    results
}
