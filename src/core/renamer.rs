//! Matching downloaded files to videos and renaming copies.
//!
//! Downloaded files embed the video identifier somewhere in their name. Every
//! source file containing a video's identifier is copied into the destination
//! directory under the video's sanitized display name, keeping the original
//! extension. Source files are never modified.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::domain::ProjectedVideo;

/// Characters that are not allowed in file names (besides control characters)
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Errors that stop the rename stage
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("Source directory does not exist: {0}")]
    SourceNotFound(PathBuf),

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A regular file in the source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File name as text, lossily decoded; used for matching only
    pub name: String,

    /// Real path on disk
    pub path: PathBuf,
}

/// One copied and renamed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedFile {
    /// Original file in the source directory
    pub source: PathBuf,

    /// Renamed copy in the destination directory
    pub destination: PathBuf,
}

/// Result of a rename pass
#[derive(Debug, Clone, Default)]
pub struct RenameReport {
    pub copied: Vec<RenamedFile>,
    /// Matched source files that could not be copied
    pub failed: Vec<PathBuf>,
    /// Videos skipped for an empty name or identifier
    pub skipped: usize,
    /// Videos with no matching source file
    pub unmatched: usize,
}

/// Replace characters that are illegal in file names with `_`
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if ILLEGAL_CHARS.contains(&c) || ('\u{0}'..='\u{1f}').contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Target file name for a match: sanitized name plus the source extension
pub fn target_file_name(name: &str, source_file_name: &str) -> String {
    let extension = Path::new(source_file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    format!("{}{}", sanitize_filename(name), extension)
}

/// List regular files in `dir` once, sorted by name
pub fn list_source_files(dir: &Path) -> Result<Vec<SourceFile>, RenameError> {
    if !dir.is_dir() {
        return Err(RenameError::SourceNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        files.push(SourceFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Copy `from` into `dest_dir` through a temporary file, then rename it to `file_name`.
///
/// The copy gets the source's permission bits.
fn copy_renamed(from: &Path, dest_dir: &Path, file_name: &str) -> Result<PathBuf, RenameError> {
    let to = dest_dir.join(file_name);
    let copy_err = |source| RenameError::Copy {
        from: from.to_path_buf(),
        to: to.clone(),
        source,
    };

    let mut reader = File::open(from).map_err(copy_err)?;
    let permissions = reader.metadata().map_err(copy_err)?.permissions();

    let mut staged = NamedTempFile::new_in(dest_dir).map_err(copy_err)?;
    io::copy(&mut reader, &mut staged).map_err(copy_err)?;
    staged.as_file().set_permissions(permissions).map_err(copy_err)?;
    staged.persist(&to).map_err(|e| copy_err(e.error))?;

    Ok(to)
}

/// Copy and rename every source file matching a video's identifier.
///
/// Matching is plain substring containment, so several files can match one
/// video; they all land on the same target name and the last one wins. A file
/// that fails to copy is logged and recorded in `failed`; the pass continues.
pub fn rename_matches(
    videos: &[ProjectedVideo],
    source_dir: &Path,
    dest_dir: &Path,
) -> Result<RenameReport, RenameError> {
    let source_files = list_source_files(source_dir)?;
    std::fs::create_dir_all(dest_dir)?;

    let mut report = RenameReport::default();

    for video in videos {
        if let Some(missing) = video.missing_field() {
            tracing::warn!("{}", missing);
            report.skipped += 1;
            continue;
        }

        let mut matched = false;
        for file in source_files.iter().filter(|f| f.name.contains(&video.value)) {
            matched = true;
            let target = target_file_name(&video.name, &file.name);

            match copy_renamed(&file.path, dest_dir, &target) {
                Ok(destination) => {
                    tracing::info!(
                        "Copied '{}' to '{}', then renamed to '{}'",
                        file.name,
                        dest_dir.display(),
                        target
                    );
                    report.copied.push(RenamedFile {
                        source: file.path.clone(),
                        destination,
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping '{}': {}", file.name, e);
                    report.failed.push(file.path.clone());
                }
            }
        }

        if !matched {
            tracing::debug!("No downloaded file for '{}' ({})", video.name, video.value);
            report.unmatched += 1;
        }
    }

    Ok(report)
}
