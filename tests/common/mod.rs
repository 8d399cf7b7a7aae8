//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use grayjay_export::{ConversionFailure, Encoder};

/// Encoder that writes a stub output file, failing for inputs whose name
/// contains `fail_marker`. Tracks how many encodes run at once.
pub struct FakeEncoder {
    pub fail_marker: &'static str,
    pub delay: Duration,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeEncoder {
    pub fn new(fail_marker: &'static str) -> Self {
        Self {
            fail_marker,
            delay: Duration::from_millis(10),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Encoder for FakeEncoder {
    fn name(&self) -> &str {
        "fake"
    }

    async fn encode(&self, input: &Path, output: &Path) -> Result<(), ConversionFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        let name = input.file_name().unwrap_or_default().to_string_lossy();
        let result = if name.contains(self.fail_marker) {
            Err(ConversionFailure::Exit {
                path: input.to_path_buf(),
                status: "exit status: 1".to_string(),
                stderr: "Invalid data found when processing input".to_string(),
            })
        } else {
            tokio::fs::write(output, b"mp3").await.map_err(|source| ConversionFailure::Spawn {
                path: input.to_path_buf(),
                source,
            })
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Write a small file and return its path
pub fn touch(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Sorted file names in `dir`
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
