//! Command-line interface for grayjay-export.
//!
//! Flags override the config file and environment. `--default` ignores all
//! of them and runs with the built-in Android paths.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::RunConfig;
use crate::core::pipeline::{self, RunReport};

/// grayjay-export - Grayjay playlist downloader and converter
#[derive(Parser, Debug)]
#[command(name = "grayjay-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory where Grayjay downloads are located
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,

    /// Directory where the processed files will be saved
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Path to the playlist JSON file
    #[arg(short, long)]
    pub playlist_json: Option<PathBuf>,

    /// Skip converting downloaded files to MP3
    #[arg(long)]
    pub no_convert: bool,

    /// Maximum concurrent encoder processes (defaults to available CPUs)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Encoder binary (defaults to FFMPEG_PATH or `ffmpeg`)
    #[arg(long)]
    pub encoder: Option<PathBuf>,

    /// Config file (YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Don't write cache.json to the output directory
    #[arg(long)]
    pub no_cache_snapshot: bool,

    /// Run with default settings, ignoring every other flag
    #[arg(short, long)]
    pub default: bool,
}

impl Cli {
    /// Resolve the run configuration from defaults, file, env and flags
    pub fn resolve_config(&self) -> Result<RunConfig> {
        if self.default {
            return Ok(RunConfig::default());
        }

        let mut config = RunConfig::load(self.config.as_deref())?;

        if let Some(ref dir) = self.input_dir {
            config.source_dir = dir.clone();
        }
        if let Some(ref dir) = self.output_dir {
            config.dest_dir = dir.clone();
        }
        if let Some(ref log) = self.playlist_json {
            config.record_log = log.clone();
        }
        if let Some(jobs) = self.jobs {
            config.converter.workers = jobs;
        }
        if let Some(ref encoder) = self.encoder {
            config.encoder = encoder.clone();
        }
        if self.no_convert {
            config.convert = false;
        }
        if self.no_cache_snapshot {
            config.write_snapshot = false;
        }

        Ok(config)
    }

    /// Execute the export
    pub async fn execute(self) -> Result<()> {
        let config = self.resolve_config()?;

        if let Some(ref file) = config.config_file {
            tracing::debug!("Using config file {}", file.display());
        }

        println!("📂 Downloads: {}", config.source_dir.display());
        println!("📁 Output:    {}", config.dest_dir.display());
        println!("📄 Playlist:  {}", config.record_log.display());
        println!();

        let encoder = pipeline::encoder_for(&config);
        let report = pipeline::run(&config, encoder).await?;

        print_summary(&report);
        Ok(())
    }
}

/// Print a human summary of a run
fn print_summary(report: &RunReport) {
    println!();
    println!("Summary:");

    if !report.record_found {
        println!("  Playlist log is empty, nothing was renamed");
    } else {
        println!("  Videos in cache:     {}", report.projection.total());
        println!("  Skipped (missing):   {}", report.projection.dropped + report.renamed.skipped);
        println!("  Files copied:        {}", report.renamed.copied.len());
        for path in &report.renamed.failed {
            println!("    ✗ {}", path.display());
        }
        println!("  Without a download:  {}", report.renamed.unmatched);
    }

    if let Some(ref snapshot) = report.snapshot {
        println!("  Cache snapshot:      {}", snapshot.display());
    }

    match report.conversion {
        Some(ref tally) => {
            println!(
                "  Converted:           {}/{} ({} failed)",
                tally.succeeded, tally.total, tally.failed
            );
            for job in tally.failures() {
                println!("    ✗ {}", job.path.display());
            }
        }
        None => println!("  Conversion:          skipped"),
    }

    println!();
    match report.conversion {
        Some(ref tally) if tally.failed > 0 => {
            println!("⚠️  Finished with {} failed conversion(s)", tally.failed)
        }
        _ => println!("✅ Done"),
    }
}
