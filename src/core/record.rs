//! Record extraction from the playlist record log.
//!
//! The record log is one JSON array of opaque records, oldest first. Only the
//! most recent record is of interest: it holds the cache snapshot.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::domain::errors::json_kind;
use crate::domain::FormatError;

/// File name of the extracted record snapshot in the destination directory
pub const SNAPSHOT_FILE: &str = "cache.json";

/// Errors from reading the record log
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to read record log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid record log: {0}")]
    Format(#[from] FormatError),
}

/// Parse record log text and return its last element.
///
/// An empty array yields `None`. Anything other than an array at the top
/// level is a `FormatError`.
pub fn parse_last_record(text: &str) -> Result<Option<Value>, FormatError> {
    let parsed: Value = serde_json::from_str(text).map_err(FormatError::InvalidJson)?;

    match parsed {
        Value::Array(mut records) => Ok(records.pop()),
        other => Err(FormatError::NotAnArray {
            found: json_kind(&other),
        }),
    }
}

/// Read the record log at `path` and return its last element
pub fn extract_last_record(path: &Path) -> Result<Option<Value>, RecordError> {
    let text = std::fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_last_record(&text)?)
}

/// Serialize a record to the text form the recovery chain works on.
///
/// A string record comes out quoted and escaped, e.g.
/// `"__CACHE:{\"videos\":[]}"`.
pub fn serialize_record(record: &Value) -> Result<String, FormatError> {
    serde_json::to_string_pretty(record).map_err(FormatError::Serialize)
}

/// Write the record, pretty-printed, to `<dir>/cache.json`
pub fn write_snapshot(dir: &Path, record: &Value) -> anyhow::Result<PathBuf> {
    use anyhow::Context;

    let path = dir.join(SNAPSHOT_FILE);
    let text = serialize_record(record)?;
    std::fs::write(&path, text)
        .with_context(|| format!("Failed to write cache snapshot: {}", path.display()))?;

    tracing::debug!("Wrote cache snapshot to {}", path.display());
    Ok(path)
}
