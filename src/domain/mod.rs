//! Domain types for grayjay-export.
//!
//! This module contains the core data structures:
//! - Video: projected `{name, value}` pairs taken from the playlist cache
//! - Job: per-file conversion outcomes and the aggregate tally
//! - Errors: format, missing-field and conversion failures

pub mod errors;
pub mod job;
pub mod video;

// Re-export commonly used types
pub use errors::{ConversionFailure, FormatError, MissingField};
pub use job::{ConversionJob, ConversionTally};
pub use video::{ProjectedVideo, Projection};
