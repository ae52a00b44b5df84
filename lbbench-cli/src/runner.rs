//! Benchmark Harness Runner
//!
//! The only place a subprocess is spawned. The pipeline talks to it through
//! [`HarnessRunner`], so tests can hand back canned transcripts instead of
//! invoking `go`.

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// Failure to start the harness process
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The program could not be started
    #[error("Failed to spawn `{program}`: {source}")]
    SpawnFailed {
        /// Program that failed to start
        program: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },
}

/// Program, arguments and working directory of one harness invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessCommand {
    /// Executable, resolved through `PATH`
    pub program: String,
    /// Arguments in order
    pub args: Vec<String>,
    /// Directory to run in; the caller's when `None`
    pub working_dir: Option<PathBuf>,
}

impl fmt::Display for HarnessCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished harness process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessOutput {
    /// Exit code; `None` when the child was killed by a signal
    pub status: Option<i32>,
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
}

impl HarnessOutput {
    /// Exit status zero
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs a harness command to completion
pub trait HarnessRunner {
    /// Block until the command exits and return its captured output.
    ///
    /// A non-zero exit is *not* an error here; only failing to start is.
    fn run(&self, command: &HarnessCommand) -> Result<HarnessOutput, RunnerError>;
}

impl<R: HarnessRunner + ?Sized> HarnessRunner for &R {
    fn run(&self, command: &HarnessCommand) -> Result<HarnessOutput, RunnerError> {
        (**self).run(command)
    }
}

/// Spawns the command as a real child process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl HarnessRunner for ProcessRunner {
    fn run(&self, command: &HarnessCommand) -> Result<HarnessOutput, RunnerError> {
        debug!(%command, working_dir = ?command.working_dir, "spawning harness");

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args).stdin(Stdio::null());
        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|source| RunnerError::SpawnFailed {
            program: command.program.clone(),
            source,
        })?;

        debug!(
            status = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "harness exited"
        );

        Ok(HarnessOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
