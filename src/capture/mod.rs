//! # Capture Loop
//!
//! Fixed-cadence screenshot capture with cooperative cancellation. The loop
//! grabs one frame immediately, then one after each sleep of the configured
//! rate, for `frame_count` frames total. Cancelling the token aborts the
//! sleep at once; whatever was captured so far is returned to the caller.
//! That early exit is the designed termination path, not a failure.
//!
//! Frames come from a [`FrameSource`]. Production runs use the scrap-backed
//! [`screen::ScreenSource`]; tests plug in scripted sources.

pub mod frame;
#[cfg(feature = "screen-capture")]
pub mod screen;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use image::RgbaImage;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
pub use self::frame::CapturedFrame;

/// Abstract source of full-screen frames.
/// Enables pluggable capture backends and mock sources in tests.
#[async_trait]
pub trait FrameSource: Send {
    /// Grab the next frame.
    async fn next_frame(&mut self) -> Result<RgbaImage>;
}

/// Run the capture loop against `source`, writing PNG frames into `scratch`.
///
/// Captures `frame_count` frames at `rate` intervals, or fewer if `cancel`
/// fires first. A zero `frame_count` or an already-cancelled token yields an
/// empty result without touching the source. Capture failures propagate and
/// abort the run.
pub async fn run_loop<S: FrameSource>(
    source: &mut S,
    scratch: &Path,
    rate: Duration,
    frame_count: u64,
    cancel: &CancellationToken,
) -> Result<Vec<CapturedFrame>> {
    let mut frames = Vec::new();
    if frame_count == 0 || cancel.is_cancelled() {
        return Ok(frames);
    }

    frames.push(capture_one(source, scratch).await?);

    for i in 1..frame_count {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(rate) => {}
        }
        frames.push(capture_one(source, scratch).await?);
        println!("Progress: {}/{} screenshots captured", i + 1, frame_count);
    }

    Ok(frames)
}

/// Grab one frame and persist it under its timestamp filename. Alpha is
/// dropped on the way out; screen grabs are always opaque.
async fn capture_one<S: FrameSource>(source: &mut S, scratch: &Path) -> Result<CapturedFrame> {
    let image = source.next_frame().await?;
    let frame = CapturedFrame::allocate(scratch, chrono::Local::now().naive_local());
    image::DynamicImage::ImageRgba8(image).to_rgb8().save(&frame.path)?;
    println!(
        "Screenshot captured at {}",
        frame.timestamp.format("%H:%M:%S")
    );
    Ok(frame)
}
