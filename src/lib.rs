//! # shotlog
//!
//! Periodic screenshot capture bound into a single paginated PDF.
//!
//! ## Architecture
//!
//! - `capture`: fixed-cadence capture loop and frame sources
//! - `document`: one-image-per-page PDF layout and assembly
//! - `server`: local HTTP control surface supervising a capture child
//! - `config`: run parameters and output path resolution
//! - `error`: shared error types
//!
//! A run takes `floor(duration / rate)` screenshots into a scratch directory,
//! binds them into a PDF with one page per image, and removes the scratch
//! directory whatever the outcome. Interrupting a run (Ctrl+C on the CLI, or
//! the control surface's stop operation) finalizes the document with the
//! frames captured so far.

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

pub mod capture;
pub mod config;
pub mod document;
pub mod error;
pub mod server;

pub use config::SessionConfig;
pub use error::{Result, ShotlogError};

/// How a capture run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Frames were captured and the document was written.
    Document(document::DocumentSummary),
    /// The run ended before any frame was captured; no document exists.
    NoFrames,
}

/// Run one complete capture session: scratch directory, capture loop,
/// document assembly, cleanup.
///
/// Cancelling `cancel` ends the loop early and finalizes with whatever was
/// captured. The scratch directory is removed on every path out of this
/// function, including errors.
pub async fn run_session<S: capture::FrameSource>(
    config: &SessionConfig,
    source: &mut S,
    cancel: &CancellationToken,
) -> Result<RunOutcome> {
    config.validate()?;
    std::fs::create_dir_all(&config.output_dir)?;

    let scratch = TempDir::new()?;
    println!(
        "Using temporary directory for screenshots: {}",
        scratch.path().display()
    );

    let frames = capture::run_loop(
        source,
        scratch.path(),
        config.rate(),
        config.frame_count(),
        cancel,
    )
    .await?;

    let outcome = if frames.is_empty() {
        RunOutcome::NoFrames
    } else {
        let dest = config.document_path(chrono::Local::now().naive_local());
        let paths: Vec<_> = frames.into_iter().map(|f| f.path).collect();
        RunOutcome::Document(document::assemble(&paths, &dest)?)
    };

    println!("Cleaning up temporary files...");
    scratch.close()?;
    println!("Cleanup complete.");
    Ok(outcome)
}
