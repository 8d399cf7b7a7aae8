//! Core export logic.
//!
//! This module contains:
//! - Record: last-record extraction from the playlist log
//! - Recovery: the quote-surgery chain that repairs the cache string
//! - Projector: `{name, value}` projection of video descriptors
//! - Renamer: id-to-file matching, copy and rename
//! - Converter: bounded concurrent conversion via an external encoder
//! - Pipeline: the end-to-end run

pub mod converter;
pub mod pipeline;
pub mod projector;
pub mod record;
pub mod recovery;
pub mod renamer;

// Re-export commonly used types
pub use converter::{convert_directory, ConvertError, ConverterOptions};
pub use pipeline::{run, RunReport};
pub use projector::{project_video, project_videos};
pub use record::{extract_last_record, parse_last_record, RecordError};
pub use recovery::{recover, recover_value};
pub use renamer::{rename_matches, sanitize_filename, RenameError, RenameReport, RenamedFile};
