//! Configuration for a capture run.
//!
//! One `SessionConfig` describes a bounded run: how often to capture, for how
//! long, and where the finished PDF lands. It is built once from CLI flags or
//! a start request, validated, and never mutated while the run is active.
//!
//! | Parameter | Default | Description |
//! |-----------|---------|-------------|
//! | `rate_secs` | 10 | Seconds between screenshots |
//! | `duration_secs` | 1800 | Total run length in seconds |
//! | `output_dir` | `myPDFs` | Directory the PDF is written into |
//! | `name` | timestamped | PDF filename, `.pdf` enforced |

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDateTime;

use crate::error::{Result, ShotlogError};

pub const DEFAULT_RATE_SECS: u32 = 10;
pub const DEFAULT_DURATION_SECS: u32 = 1800;
pub const DEFAULT_OUTPUT_DIR: &str = "myPDFs";

/// Parameters of one bounded capture run.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Seconds between consecutive screenshots.
    pub rate_secs: u32,
    /// Total duration of the run in seconds.
    pub duration_secs: u32,
    /// Directory the finished document is written into.
    pub output_dir: PathBuf,
    /// Optional document name; a `.pdf` extension is appended when missing.
    pub name: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rate_secs: DEFAULT_RATE_SECS,
            duration_secs: DEFAULT_DURATION_SECS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            name: None,
        }
    }
}

impl SessionConfig {
    pub fn new(
        rate_secs: u32,
        duration_secs: u32,
        output_dir: impl Into<PathBuf>,
        name: Option<String>,
    ) -> Self {
        Self {
            rate_secs,
            duration_secs,
            output_dir: output_dir.into(),
            name,
        }
    }

    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        if self.rate_secs == 0 {
            return Err(ShotlogError::Config(
                "rate must be greater than 0 seconds".into(),
            ));
        }
        if self.duration_secs == 0 {
            return Err(ShotlogError::Config(
                "duration must be greater than 0 seconds".into(),
            ));
        }
        Ok(())
    }

    /// Total frames an uninterrupted run captures: `floor(duration / rate)`,
    /// the immediate first frame included. Zero means the run ends without a
    /// document.
    pub fn frame_count(&self) -> u64 {
        u64::from(self.duration_secs / self.rate_secs)
    }

    /// Capture interval as a `Duration`.
    pub fn rate(&self) -> Duration {
        Duration::from_secs(u64::from(self.rate_secs))
    }

    /// Final document path: `output_dir/name.pdf`, or a timestamped
    /// `screenshots_<...>.pdf` when no name was given.
    pub fn document_path(&self, now: NaiveDateTime) -> PathBuf {
        let filename = match &self.name {
            Some(name) if name.ends_with(".pdf") => name.clone(),
            Some(name) => format!("{name}.pdf"),
            None => format!("screenshots_{}.pdf", now.format("%Y%m%d_%H%M%S")),
        };
        self.output_dir.join(filename)
    }
}
