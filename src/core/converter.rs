//! Concurrent conversion of intermediate audio files.
//!
//! The destination directory is listed once. Every intermediate file is then
//! handed to the encoder on its own task, with a semaphore bounding how many
//! encoder processes run at a time. Outcomes come back over a channel in
//! completion order and are tallied as they arrive. A failed file keeps its
//! original and never stops the other jobs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::Pattern;
use thiserror::Error;
use tokio::sync::{mpsc, Semaphore};

use crate::adapters::Encoder;
use crate::domain::{ConversionFailure, ConversionJob, ConversionTally};

/// Errors that prevent a conversion pass from starting
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Conversion directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Invalid extension pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for a conversion pass
#[derive(Debug, Clone)]
pub struct ConverterOptions {
    /// Extensions of intermediate files to convert (without the dot)
    pub extensions: Vec<String>,

    /// Extension of the converted files
    pub target_extension: String,

    /// Maximum concurrent encoder processes
    pub workers: usize,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["webma".to_string(), "mp4a".to_string()],
            target_extension: "mp3".to_string(),
            workers: default_workers(),
        }
    }
}

/// Available parallelism, or 1 if it cannot be determined
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// List files in `dir` whose names end in one of `extensions`, sorted
pub fn discover_convertible(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ConvertError> {
    if !dir.is_dir() {
        return Err(ConvertError::DirectoryNotFound(dir.to_path_buf()));
    }

    let patterns = extensions
        .iter()
        .map(|ext| Pattern::new(&format!("*.{}", Pattern::escape(ext))))
        .collect::<Result<Vec<_>, _>>()?;

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();
        if patterns.iter().any(|p| p.matches(&name)) {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Path of the converted file: same directory and stem, new extension
pub fn output_path(input: &Path, target_extension: &str) -> PathBuf {
    input.with_extension(target_extension)
}

/// Convert one file, removing the original only on success
pub async fn convert_file(encoder: &dyn Encoder, path: &Path, target_extension: &str) -> ConversionJob {
    let output = output_path(path, target_extension);

    if let Err(failure) = encoder.encode(path, &output).await {
        return ConversionJob::failed(path.to_path_buf(), failure);
    }

    match tokio::fs::remove_file(path).await {
        Ok(()) => ConversionJob::succeeded(path.to_path_buf()),
        Err(source) => ConversionJob::failed(
            path.to_path_buf(),
            ConversionFailure::Cleanup {
                path: path.to_path_buf(),
                source,
            },
        ),
    }
}

/// Convert every intermediate file found in `dir`
pub async fn convert_directory(
    dir: &Path,
    encoder: Arc<dyn Encoder>,
    options: &ConverterOptions,
) -> Result<ConversionTally, ConvertError> {
    let files = discover_convertible(dir, &options.extensions)?;
    Ok(convert_files(files, encoder, options).await)
}

/// Convert `files` on a bounded pool and tally outcomes as they complete
pub async fn convert_files(
    files: Vec<PathBuf>,
    encoder: Arc<dyn Encoder>,
    options: &ConverterOptions,
) -> ConversionTally {
    let total = files.len();
    let mut tally = ConversionTally::new(total);

    if total == 0 {
        tracing::info!("No files to convert");
        return tally;
    }

    let workers = options.workers.max(1);
    tracing::info!(
        "Converting {} file(s) to {} with {} ({} workers)",
        total,
        options.target_extension,
        encoder.name(),
        workers
    );

    let semaphore = Arc::new(Semaphore::new(workers));
    let (tx, mut rx) = mpsc::channel::<ConversionJob>(total);

    for path in files {
        let semaphore = semaphore.clone();
        let encoder = encoder.clone();
        let tx = tx.clone();
        let target = options.target_extension.clone();

        tokio::spawn(async move {
            let job = match semaphore.acquire_owned().await {
                Ok(_permit) => convert_file(encoder.as_ref(), &path, &target).await,
                Err(e) => ConversionJob::failed(path, e),
            };
            let _ = tx.send(job).await;
        });
    }

    // Receiver ends once every job has reported
    drop(tx);

    while let Some(job) = rx.recv().await {
        if let Some(ref error) = job.error {
            tracing::warn!("Conversion failed: {}", error);
        }
        tally.record(job);

        tracing::info!(
            "Convert to {}: {}/{} - Success: {}, Failures: {}",
            options.target_extension.to_uppercase(),
            tally.completed(),
            total,
            tally.succeeded,
            tally.failed
        );
    }

    if !tally.is_complete() {
        tracing::error!(
            "{} conversion job(s) ended without reporting",
            total - tally.completed()
        );
    }

    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"audio").unwrap();
        path
    }

    #[test]
    fn test_default_options() {
        let options = ConverterOptions::default();
        assert_eq!(options.extensions, vec!["webma", "mp4a"]);
        assert_eq!(options.target_extension, "mp3");
        assert!(options.workers >= 1);
    }

    #[test]
    fn test_discover_filters_by_extension() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "b.webma");
        touch(temp.path(), "a.mp4a");
        touch(temp.path(), "done.mp3");
        touch(temp.path(), "cache.json");
        touch(temp.path(), "upper.WEBMA");
        std::fs::create_dir(temp.path().join("dir.webma")).unwrap();

        let files = discover_convertible(temp.path(), &ConverterOptions::default().extensions).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.mp4a", "b.webma"]);
    }

    #[test]
    fn test_discover_missing_directory() {
        let temp = TempDir::new().unwrap();
        let result = discover_convertible(&temp.path().join("missing"), &["webma".to_string()]);
        assert!(matches!(result, Err(ConvertError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_output_path_swaps_extension() {
        assert_eq!(
            output_path(Path::new("/music/My Song.webma"), "mp3"),
            PathBuf::from("/music/My Song.mp3")
        );
        assert_eq!(
            output_path(Path::new("/music/v1.2.mp4a"), "mp3"),
            PathBuf::from("/music/v1.2.mp3")
        );
    }

    #[tokio::test]
    async fn test_empty_file_list() {
        let encoder: Arc<dyn Encoder> = Arc::new(crate::adapters::FfmpegEncoder::default());
        let tally = convert_files(Vec::new(), encoder, &ConverterOptions::default()).await;
        assert_eq!(tally.total, 0);
        assert!(tally.is_complete());
    }
}
