//! JSON Snapshot

use crate::ReportError;
use lbbench_core::ResultSet;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::Path;
use tracing::debug;

/// Serialize a result set as 4-space indented JSON.
///
/// Keys are algorithm names in lexical order; each value is a list of
/// `[backend_count, ns_per_op]` pairs.
pub fn generate_json_snapshot(results: &ResultSet) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    results.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write the snapshot to `path`, replacing any existing file
pub fn write_json_snapshot(path: &Path, results: &ResultSet) -> Result<(), ReportError> {
    let bytes = generate_json_snapshot(results)?;
    std::fs::write(path, &bytes).map_err(|e| ReportError::io(path, e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote JSON snapshot");
    Ok(())
}

/// Load a snapshot written by [`write_json_snapshot`]
pub fn read_json_snapshot(path: &Path) -> Result<ResultSet, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}
