//! ffmpeg encoder.
//!
//! Runs one `ffmpeg` subprocess per file, asking for best-quality audio-only
//! output and suppressing everything below errors.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::Encoder;
use crate::domain::ConversionFailure;

/// Environment variable overriding the ffmpeg binary
pub const FFMPEG_PATH_ENV: &str = "FFMPEG_PATH";

/// ffmpeg encoder using subprocess mode
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    /// Path to the ffmpeg binary (default: "ffmpeg" on PATH)
    binary_path: PathBuf,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegEncoder {
    /// Create an encoder running `ffmpeg` from PATH.
    ///
    /// `FFMPEG_PATH` is applied by the config layer, not here.
    pub fn new() -> Self {
        Self::with_binary_path("ffmpeg")
    }

    /// Create an encoder with a custom binary path
    pub fn with_binary_path(binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Arguments for one conversion
    pub fn args(input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            input.into(),
            // Best VBR quality
            "-q:a".into(),
            "0".into(),
            "-map".into(),
            "a".into(),
            "-loglevel".into(),
            "error".into(),
            output.into(),
        ]
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn encode(&self, input: &Path, output: &Path) -> Result<(), ConversionFailure> {
        let result = Command::new(&self.binary_path)
            .args(Self::args(input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ConversionFailure::Spawn {
                path: input.to_path_buf(),
                source,
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ConversionFailure::Exit {
                path: input.to_path_buf(),
                status: result.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}
