//! Run configuration.
//!
//! Configuration sources (highest priority first):
//! 1. CLI flags (applied by the `cli` module)
//! 2. Environment variables (GRAYJAY_EXPORT_INPUT_DIR, GRAYJAY_EXPORT_OUTPUT_DIR,
//!    GRAYJAY_EXPORT_PLAYLIST, FFMPEG_PATH)
//! 3. Config file (`--config <path>` or <config dir>/grayjay-export/config.yaml)
//! 4. Defaults (Grayjay's Android download and music directories)
//!
//! Paths in the config file are relative to the config file's directory.
//! The resolved `RunConfig` is passed explicitly into the pipeline.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::ffmpeg::FFMPEG_PATH_ENV;
use crate::core::converter::ConverterOptions;

/// Where Grayjay keeps its downloads
pub const DEFAULT_SOURCE_DIR: &str = "/data/data/com.futo.platformplayer/files/downloads/";

/// Work directory receiving renamed and converted files
pub const DEFAULT_WORK_DIR: &str = "/sdcard/Music/grayjay/";

/// Playlist record log exported from Grayjay
pub const DEFAULT_RECORD_LOG: &str = "/sdcard/Music/grayjay/playlist.json";

pub const ENV_INPUT_DIR: &str = "GRAYJAY_EXPORT_INPUT_DIR";
pub const ENV_OUTPUT_DIR: &str = "GRAYJAY_EXPORT_OUTPUT_DIR";
pub const ENV_PLAYLIST: &str = "GRAYJAY_EXPORT_PLAYLIST";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub convert: Option<ConvertConfig>,
    /// Write the extracted record to cache.json in the output directory
    #[serde(default)]
    pub cache_snapshot: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Grayjay download directory
    pub input_dir: Option<String>,
    /// Output directory
    pub output_dir: Option<String>,
    /// Playlist record log
    pub playlist_json: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConvertConfig {
    pub enabled: Option<bool>,
    pub jobs: Option<usize>,
    pub encoder: Option<String>,
    pub extensions: Option<Vec<String>>,
    pub target_extension: Option<String>,
}

/// Resolved configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory holding the downloaded media files
    pub source_dir: PathBuf,
    /// Directory receiving renamed copies and converted files
    pub dest_dir: PathBuf,
    /// Playlist record log (JSON array)
    pub record_log: PathBuf,
    /// Run the conversion stage
    pub convert: bool,
    /// Write cache.json next to the output
    pub write_snapshot: bool,
    /// Encoder binary
    pub encoder: PathBuf,
    /// Conversion pool settings
    pub converter: ConverterOptions,
    /// Config file that was applied (if any)
    pub config_file: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            dest_dir: PathBuf::from(DEFAULT_WORK_DIR),
            record_log: PathBuf::from(DEFAULT_RECORD_LOG),
            convert: true,
            write_snapshot: true,
            encoder: PathBuf::from("ffmpeg"),
            converter: ConverterOptions::default(),
            config_file: None,
        }
    }
}

impl RunConfig {
    /// Load defaults, then the config file (explicit or discovered), then env
    pub fn load(explicit_file: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let file_path = match explicit_file {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        if let Some(path) = file_path {
            let file = load_config_file(&path)?;
            let base = path.parent().unwrap_or(Path::new("."));
            config.apply_file(file, base);
            config.config_file = Some(path);
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply values from a parsed config file
    pub fn apply_file(&mut self, file: ConfigFile, base: &Path) {
        if let Some(ref dir) = file.paths.input_dir {
            self.source_dir = resolve_path(base, dir);
        }
        if let Some(ref dir) = file.paths.output_dir {
            self.dest_dir = resolve_path(base, dir);
        }
        if let Some(ref log) = file.paths.playlist_json {
            self.record_log = resolve_path(base, log);
        }
        if let Some(snapshot) = file.cache_snapshot {
            self.write_snapshot = snapshot;
        }

        if let Some(convert) = file.convert {
            if let Some(enabled) = convert.enabled {
                self.convert = enabled;
            }
            if let Some(jobs) = convert.jobs {
                self.converter.workers = jobs;
            }
            if let Some(encoder) = convert.encoder {
                self.encoder = PathBuf::from(encoder);
            }
            if let Some(extensions) = convert.extensions {
                self.converter.extensions = extensions;
            }
            if let Some(target) = convert.target_extension {
                self.converter.target_extension = target;
            }
        }
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_INPUT_DIR) {
            self.source_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.dest_dir = PathBuf::from(dir);
        }
        if let Some(log) = lookup(ENV_PLAYLIST) {
            self.record_log = PathBuf::from(log);
        }
        if let Some(encoder) = lookup(FFMPEG_PATH_ENV) {
            self.encoder = PathBuf::from(encoder);
        }
    }
}

/// Default config file location (<config dir>/grayjay-export/config.yaml)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("grayjay-export").join("config.yaml"))
}

/// Load and parse a config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse config file YAML
pub fn parse_config(content: &str) -> Result<ConfigFile> {
    Ok(serde_yaml::from_str(content)?)
}

/// Resolve a path that may be relative to the config file's directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
