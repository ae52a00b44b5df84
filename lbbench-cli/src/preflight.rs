//! Preflight Check
//!
//! Refuses to run anywhere but a Go project root.

use crate::pipeline::PipelineError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Verify that `marker` is a regular file inside `dir`.
///
/// Returns the marker's path. A directory or a dangling name with the
/// marker's name does not count.
pub fn check_project_root(dir: &Path, marker: &str) -> Result<PathBuf, PipelineError> {
    let path = dir.join(marker);
    if path.is_file() {
        debug!(marker = %path.display(), "project root confirmed");
        Ok(path)
    } else {
        Err(PipelineError::NotProjectRoot {
            dir: dir.to_path_buf(),
            marker: marker.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_marker_present() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("go.mod"), "module example.com/lb\n").unwrap();

        let marker = check_project_root(dir.path(), "go.mod").unwrap();
        assert_eq!(marker, dir.path().join("go.mod"));
    }

    #[test]
    fn test_marker_missing() {
        let dir = tempdir().unwrap();
        let err = check_project_root(dir.path(), "go.mod").unwrap_err();

        match &err {
            PipelineError::NotProjectRoot { dir: checked, marker } => {
                assert_eq!(checked, dir.path());
                assert_eq!(marker, "go.mod");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains("project root"));
        assert!(message.contains("go.mod"));
    }

    #[test]
    fn test_marker_directory_rejected() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("go.mod")).unwrap();

        assert!(matches!(
            check_project_root(dir.path(), "go.mod"),
            Err(PipelineError::NotProjectRoot { .. })
        ));
    }
}
