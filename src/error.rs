//! Error types shared by the capture loop, the document assembler, and the
//! session controller.
//!
//! Library code propagates `ShotlogError` with `?`; the binaries convert to
//! `anyhow` at their boundary. Control-surface handlers map every variant to
//! a structured `{success, message}` response instead of surfacing it raw.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, ShotlogError>;

#[derive(Debug, Error)]
pub enum ShotlogError {
    /// Configuration rejected before a run starts.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A frame filename that does not encode a capture timestamp.
    #[error("frame filename {path:?} does not encode a capture timestamp")]
    FrameName { path: PathBuf },

    /// The screen-capture primitive failed or is unavailable.
    #[error("screen capture failed: {0}")]
    Capture(String),

    /// An input image could not be decoded for placement in the document.
    #[error("failed to decode image {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// Document serialization failed.
    #[error("failed to write PDF: {0}")]
    Pdf(String),

    /// Asked to assemble a document out of nothing.
    #[error("no frames to assemble")]
    EmptyDocument,

    /// A start request arrived while a session is active.
    #[error("a screenshot capture is already in progress")]
    AlreadyRunning,

    /// A stop request arrived with no session active.
    #[error("no screenshot capture is currently running")]
    NotRunning,

    /// The capture child was spawned but its handle could not be tracked.
    #[error("capture process PID not available")]
    PidUnavailable,

    /// Signal delivery to the capture child failed.
    #[error("failed to signal capture process {pid}: {source}")]
    Signal { pid: u32, source: io::Error },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] io::Error),
}
