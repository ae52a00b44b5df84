#![warn(missing_docs)]
//! lbbench Report - Output Sinks
//!
//! Consumes a parsed `ResultSet` and produces:
//! - JSON snapshot (`benchmark_data.json`, machine-readable)
//! - PNG chart (`benchmark_results.png`, ns/op vs backend count on a log axis)
//! - Terminal summary (human-readable table)

mod chart;
mod json;
mod summary;

pub use chart::{
    Canvas, ChartConfig, LinearAxis, LogAxis, Rgb, Tick, render_chart, render_chart_png,
    series_color, write_chart,
};
pub use json::{generate_json_snapshot, read_json_snapshot, write_json_snapshot};
pub use summary::{format_duration, format_summary};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the report sinks
#[derive(Debug, Error)]
pub enum ReportError {
    /// Reading or writing `path` failed
    #[error("Failed to access {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Snapshot (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// PNG encoding failed
    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),

    /// The chart was asked to draw nothing
    #[error("Cannot render a chart without any series")]
    EmptyResultSet,

    /// Every point falls off the log axis
    #[error("No plottable points: every measurement has a zero backend count or a non-finite time")]
    NoPlottablePoints,

    /// Configured canvas is smaller than the layout needs
    #[error("Chart too small: {width}x{height} (min {min_width}x{min_height})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Smallest accepted width
        min_width: u32,
        /// Smallest accepted height
        min_height: u32,
    },
}

impl ReportError {
    /// I/O failure on `path`
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Default file name of the JSON snapshot
pub const DEFAULT_JSON_PATH: &str = "benchmark_data.json";

/// Default file name of the rendered chart
pub const DEFAULT_CHART_PATH: &str = "benchmark_results.png";
