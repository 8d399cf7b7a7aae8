//! grayjay-export - turn Grayjay playlist downloads into named MP3s
//!
//! Grayjay keeps playlists in a record log whose newest record holds a
//! double-encoded `__CACHE:` string. This crate recovers that string into
//! JSON, matches each video's identifier against downloaded files, copies
//! them under their display names and converts the intermediate audio
//! containers to MP3 with ffmpeg.
//!
//! # Modules
//!
//! - `adapters`: External encoders (ffmpeg)
//! - `core`: Extraction, recovery, projection, renaming, conversion
//! - `domain`: Data structures (ProjectedVideo, ConversionJob, errors)
//! - `config`: Layered run configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Run with the built-in Android paths
//! grayjay-export --default
//!
//! # Custom directories, no conversion
//! grayjay-export -i ./downloads -o ./music -p ./playlist.json --no-convert
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{Encoder, FfmpegEncoder};
pub use config::RunConfig;
pub use self::core::{run, RunReport};
pub use domain::{ConversionFailure, ConversionJob, ConversionTally, FormatError, ProjectedVideo};
