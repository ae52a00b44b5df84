//! Measurement Data Model
//!
//! `Measurement` → `Series` (one per algorithm, sorted by backend count) →
//! `ResultSet` (algorithm name → series).
//!
//! Serialized shape:
//! ```text
//! {
//!     "RoundRobin": [[10, 41.5], [100, 43.0], [1000, 44.2]],
//!     "Weighted":   [[10, 55.1], [100, 310.7]]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One benchmark data point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(u64, f64)", into = "(u64, f64)")]
pub struct Measurement {
    /// Number of backends the balancer picked from
    pub backend_count: u64,
    /// Average nanoseconds per `Pick` call
    pub ns_per_op: f64,
}

impl Measurement {
    /// Create a new measurement
    pub fn new(backend_count: u64, ns_per_op: f64) -> Self {
        Self {
            backend_count,
            ns_per_op,
        }
    }
}

impl From<(u64, f64)> for Measurement {
    fn from((backend_count, ns_per_op): (u64, f64)) -> Self {
        Self::new(backend_count, ns_per_op)
    }
}

impl From<Measurement> for (u64, f64) {
    fn from(m: Measurement) -> Self {
        (m.backend_count, m.ns_per_op)
    }
}

/// Measurements for a single algorithm, ordered by backend count
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series {
    points: Vec<Measurement>,
}

impl Series {
    /// Create an empty series
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a measurement in encounter order.
    ///
    /// Call [`Series::sort`] once all points are in.
    pub fn push(&mut self, measurement: Measurement) {
        self.points.push(measurement);
    }

    /// Stable sort by backend count; equal counts keep encounter order
    pub fn sort(&mut self) {
        self.points.sort_by_key(|m| m.backend_count);
    }

    /// Whether adjacent points are in non-decreasing backend-count order
    pub fn is_sorted(&self) -> bool {
        self.points
            .windows(2)
            .all(|w| w[0].backend_count <= w[1].backend_count)
    }

    /// Measurements in series order
    pub fn points(&self) -> &[Measurement] {
        &self.points
    }

    /// Number of measurements
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series holds no measurements
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate measurements in series order
    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.points.iter()
    }
}

impl From<Vec<Measurement>> for Series {
    fn from(points: Vec<Measurement>) -> Self {
        let mut series = Self { points };
        series.sort();
        series
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Measurement;
    type IntoIter = std::slice::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// All series of one benchmark run, keyed by algorithm name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    series: BTreeMap<String, Series>,
}

impl ResultSet {
    /// Create an empty result set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a measurement to the series of `algorithm`, creating it if needed
    pub fn record(&mut self, algorithm: &str, measurement: Measurement) {
        match self.series.get_mut(algorithm) {
            Some(series) => series.push(measurement),
            None => {
                let mut series = Series::new();
                series.push(measurement);
                self.series.insert(algorithm.to_string(), series);
            }
        }
    }

    /// Sort every series by backend count
    pub fn sort_series(&mut self) {
        for series in self.series.values_mut() {
            series.sort();
        }
    }

    /// Whether every series satisfies the ordering invariant
    pub fn is_sorted(&self) -> bool {
        self.series.values().all(Series::is_sorted)
    }

    /// Series for one algorithm
    pub fn get(&self, algorithm: &str) -> Option<&Series> {
        self.series.get(algorithm)
    }

    /// Algorithm names in lexical order
    pub fn algorithms(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Iterate `(algorithm, series)` pairs in lexical order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.series.iter().map(|(name, s)| (name.as_str(), s))
    }

    /// Number of algorithms
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// True when no algorithm was found
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Total measurements across all series
    pub fn measurement_count(&self) -> usize {
        self.series.values().map(Series::len).sum()
    }
}

// Snapshots written by hand (or by older tools) may be out of order; the
// invariant is re-established on load.
impl<'de> Deserialize<'de> for ResultSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let series = BTreeMap::<String, Series>::deserialize(deserializer)?;
        let mut results = Self { series };
        results.sort_series();
        Ok(results)
    }
}

impl FromIterator<(String, Series)> for ResultSet {
    fn from_iter<I: IntoIterator<Item = (String, Series)>>(iter: I) -> Self {
        let mut results = Self {
            series: iter.into_iter().collect(),
        };
        results.sort_series();
        results
    }
}
