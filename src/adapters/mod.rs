//! Adapter interfaces for external tools.
//!
//! The converter only talks to the `Encoder` trait, so the external encoder
//! can be swapped (or faked in tests) without touching the worker pool.

pub mod ffmpeg;

use std::path::Path;

use async_trait::async_trait;

use crate::domain::ConversionFailure;

// Re-export the ffmpeg encoder
pub use ffmpeg::FfmpegEncoder;

/// Trait for external audio encoders
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Human-readable encoder name
    fn name(&self) -> &str;

    /// Encode `input` into a new file at `output`.
    ///
    /// Must not touch `input`; removing the original is the caller's job.
    async fn encode(&self, input: &Path, output: &Path) -> Result<(), ConversionFailure>;
}
