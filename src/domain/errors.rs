//! Error kinds shared across the pipeline.
//!
//! `FormatError` is fatal and aborts a run. `MissingField` and
//! `ConversionFailure` are recovered locally: the entry or file is skipped and
//! only shows up in logs and tallies.

use std::path::PathBuf;

use thiserror::Error;

/// The record log or the recovered cache text is not usable
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Record log is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Record log is not a JSON array (found {found})")]
    NotAnArray { found: &'static str },

    #[error("Failed to serialize record: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Cache text could not be recovered into JSON: {source} (near: {excerpt})")]
    Unrecoverable {
        #[source]
        source: serde_json::Error,
        excerpt: String,
    },

    #[error("Recovered cache is not a JSON object (found {found})")]
    NotAnObject { found: &'static str },
}

/// A video descriptor without a usable name or identifier
#[derive(Debug, Clone, Error)]
#[error("Skipping video with missing {field}: {descriptor}")]
pub struct MissingField {
    /// Which field was missing or empty
    pub field: &'static str,

    /// Compact rendering of the offending descriptor
    pub descriptor: String,
}

/// A single file failed to convert
#[derive(Debug, Error)]
pub enum ConversionFailure {
    #[error("Failed to start encoder for {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Encoder exited with {status} for {path}: {stderr}")]
    Exit {
        path: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("Converted {path} but failed to remove the original: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// JSON type name for error messages
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
