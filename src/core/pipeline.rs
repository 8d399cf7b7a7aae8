//! The end-to-end export run.
//!
//! extract last record → snapshot → serialize → recover → project → rename
//! → convert (optional)
//!
//! Any format error aborts the run before a single file is copied. Missing
//! fields and failed conversions are skipped and only show up in the report.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use super::converter::convert_directory;
use super::projector::project_videos;
use super::record::{extract_last_record, serialize_record, write_snapshot};
use super::recovery::recover_object;
use super::renamer::{rename_matches, RenameReport};
use crate::adapters::{Encoder, FfmpegEncoder};
use crate::config::RunConfig;
use crate::domain::{ConversionTally, Projection};

/// Everything a run did
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// The record log had at least one record
    pub record_found: bool,

    /// Where the extracted record was written (if enabled)
    pub snapshot: Option<PathBuf>,

    /// Videos projected from the recovered cache
    pub projection: Projection,

    /// Copies made by the rename stage
    pub renamed: RenameReport,

    /// Conversion totals (if the conversion stage ran)
    pub conversion: Option<ConversionTally>,
}

/// Build the encoder named by the config
pub fn encoder_for(config: &RunConfig) -> Arc<dyn Encoder> {
    Arc::new(FfmpegEncoder::with_binary_path(config.encoder.clone()))
}

/// Run the whole export with `encoder` for the conversion stage
pub async fn run(config: &RunConfig, encoder: Arc<dyn Encoder>) -> Result<RunReport> {
    let mut report = RunReport::default();

    let record = extract_last_record(&config.record_log)
        .with_context(|| format!("Failed to load record log: {}", config.record_log.display()))?;

    std::fs::create_dir_all(&config.dest_dir).with_context(|| {
        format!("Failed to create output directory: {}", config.dest_dir.display())
    })?;

    match record {
        None => {
            tracing::warn!(
                "Record log {} is empty; nothing to rename",
                config.record_log.display()
            );
        }
        Some(record) => {
            report.record_found = true;

            if config.write_snapshot {
                report.snapshot = Some(write_snapshot(&config.dest_dir, &record)?);
            }

            let text = serialize_record(&record)?;
            let entry = recover_object(&text).context("Failed to recover playlist cache")?;
            let projection = project_videos(&entry)?;

            tracing::info!(
                "Recovered {} video(s) from cache ({} skipped)",
                projection.videos.len(),
                projection.dropped
            );

            report.renamed = rename_matches(&projection.videos, &config.source_dir, &config.dest_dir)
                .context("Failed to copy downloaded files")?;
            report.projection = projection;
        }
    }

    if config.convert {
        let tally = convert_directory(&config.dest_dir, encoder, &config.converter)
            .await
            .context("Failed to convert output directory")?;

        tracing::info!(
            "Conversion completed. Total: {}, Successful: {}, Failed: {}",
            tally.total,
            tally.succeeded,
            tally.failed
        );
        report.conversion = Some(tally);
    }

    Ok(report)
}
