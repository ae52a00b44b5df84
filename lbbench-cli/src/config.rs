//! Pipeline Configuration
//!
//! Every constant the pipeline depends on lives here. `PipelineConfig::default()`
//! is what the `lbbench` binary runs with; there is no config file and no
//! environment override. Tests build modified configs directly.

use crate::runner::HarnessCommand;
use lbbench_report::{ChartConfig, DEFAULT_CHART_PATH, DEFAULT_JSON_PATH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// lbbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    /// Project root detection
    #[serde(default)]
    pub project: ProjectConfig,
    /// Benchmark harness invocation
    #[serde(default)]
    pub harness: HarnessConfig,
    /// Transcript parsing
    #[serde(default)]
    pub parser: ParserConfig,
    /// Output artifact locations
    #[serde(default)]
    pub output: OutputConfig,
    /// Chart appearance
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Project root detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// File that must exist in the working directory
    #[serde(default = "default_marker_file")]
    pub marker_file: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            marker_file: default_marker_file(),
        }
    }
}

fn default_marker_file() -> String {
    "go.mod".to_string()
}

/// How the Go benchmark harness is invoked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Executable looked up on `PATH`
    #[serde(default = "default_program")]
    pub program: String,
    /// Value of `-bench=` (benchmark name regex, interpreted by the harness)
    #[serde(default = "default_bench_filter")]
    pub bench_filter: String,
    /// Package pattern holding the balancer benchmarks
    #[serde(default = "default_package")]
    pub package: String,
    /// Pass `-v`
    #[serde(default = "default_true")]
    pub verbose: bool,
    /// Pass `-benchmem`
    #[serde(default = "default_true")]
    pub benchmem: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            bench_filter: default_bench_filter(),
            package: default_package(),
            verbose: true,
            benchmem: true,
        }
    }
}

fn default_program() -> String {
    "go".to_string()
}
fn default_bench_filter() -> String {
    "Pick".to_string()
}
fn default_package() -> String {
    "./internal/balancer/...".to_string()
}
fn default_true() -> bool {
    true
}

impl HarnessConfig {
    /// Build the command line, run from `project_dir`:
    /// `go test -bench=Pick ./internal/balancer/... -v -benchmem`
    pub fn command(&self, project_dir: &Path) -> HarnessCommand {
        let mut args = vec![
            "test".to_string(),
            format!("-bench={}", self.bench_filter),
            self.package.clone(),
        ];
        if self.verbose {
            args.push("-v".to_string());
        }
        if self.benchmem {
            args.push("-benchmem".to_string());
        }
        HarnessCommand {
            program: self.program.clone(),
            args,
            working_dir: Some(project_dir.to_path_buf()),
        }
    }
}

/// Transcript parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Benchmark name suffix that marks a data line (`Benchmark<Algo>_<tag>/...`)
    #[serde(default = "default_suffix_tag")]
    pub suffix_tag: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            suffix_tag: default_suffix_tag(),
        }
    }
}

fn default_suffix_tag() -> String {
    lbbench_core::DEFAULT_SUFFIX_TAG.to_string()
}

/// Output artifact locations, relative to the project directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON snapshot path
    #[serde(default = "default_json_path")]
    pub json_path: PathBuf,
    /// Chart image path
    #[serde(default = "default_chart_path")]
    pub chart_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: default_json_path(),
            chart_path: default_chart_path(),
        }
    }
}

fn default_json_path() -> PathBuf {
    PathBuf::from(DEFAULT_JSON_PATH)
}
fn default_chart_path() -> PathBuf {
    PathBuf::from(DEFAULT_CHART_PATH)
}

impl OutputConfig {
    /// JSON snapshot path resolved against `project_dir`
    pub fn json_path_in(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.json_path)
    }

    /// Chart path resolved against `project_dir`
    pub fn chart_path_in(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.chart_path)
    }
}
