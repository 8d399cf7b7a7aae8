//! Conversion jobs and their aggregate tally.

use std::path::PathBuf;

/// Outcome of one attempted conversion
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// The intermediate file that was handed to the encoder
    pub path: PathBuf,

    /// Whether the encoder succeeded and the original was removed
    pub success: bool,

    /// Failure description (if failed)
    pub error: Option<String>,
}

impl ConversionJob {
    pub fn succeeded(path: PathBuf) -> Self {
        Self {
            path,
            success: true,
            error: None,
        }
    }

    pub fn failed(path: PathBuf, error: impl ToString) -> Self {
        Self {
            path,
            success: false,
            error: Some(error.to_string()),
        }
    }
}

/// Running and final counts for a directory pass
#[derive(Debug, Clone, Default)]
pub struct ConversionTally {
    /// Files discovered before any job started
    pub total: usize,

    /// Jobs that finished successfully
    pub succeeded: usize,

    /// Jobs that failed
    pub failed: usize,

    /// Every finished job, in completion order
    pub jobs: Vec<ConversionJob>,
}

impl ConversionTally {
    /// Create an empty tally for `total` discovered files
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Record a finished job
    pub fn record(&mut self, job: ConversionJob) {
        if job.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.jobs.push(job);
    }

    /// Jobs finished so far
    pub fn completed(&self) -> usize {
        self.succeeded + self.failed
    }

    /// True once every discovered file has a recorded outcome
    pub fn is_complete(&self) -> bool {
        self.completed() == self.total
    }

    /// Paths of the failed jobs
    pub fn failures(&self) -> impl Iterator<Item = &ConversionJob> {
        self.jobs.iter().filter(|job| !job.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_counts() {
        let mut tally = ConversionTally::new(3);
        tally.record(ConversionJob::succeeded(PathBuf::from("a.webma")));
        tally.record(ConversionJob::failed(PathBuf::from("b.webma"), "exit 1"));
        assert!(!tally.is_complete());

        tally.record(ConversionJob::succeeded(PathBuf::from("c.mp4a")));

        assert_eq!(tally.succeeded, 2);
        assert_eq!(tally.failed, 1);
        assert_eq!(tally.completed(), 3);
        assert!(tally.is_complete());

        let failed: Vec<_> = tally.failures().map(|j| j.path.clone()).collect();
        assert_eq!(failed, vec![PathBuf::from("b.webma")]);
    }

    #[test]
    fn test_empty_tally_is_complete() {
        let tally = ConversionTally::new(0);
        assert!(tally.is_complete());
        assert_eq!(tally.completed(), 0);
    }
}
