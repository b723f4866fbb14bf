//! scrap-backed frame source.
//!
//! One synchronous grab of the primary display per frame, run on the
//! blocking pool because `scrap`'s capturer is not `Send` and busy-polls
//! until the compositor hands over a frame.

use std::io::ErrorKind;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use image::RgbaImage;
use scrap::{Capturer, Display};
use tokio::task;

use crate::capture::FrameSource;
use crate::error::{Result, ShotlogError};

/// Poll interval while scrap reports `WouldBlock`.
const POLL: Duration = Duration::from_millis(16);
/// Give up on a single grab after this long without a frame.
const GIVE_UP: Duration = Duration::from_secs(5);

/// Frames from the primary display.
pub struct ScreenSource;

impl ScreenSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScreenSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FrameSource for ScreenSource {
    async fn next_frame(&mut self) -> Result<RgbaImage> {
        task::spawn_blocking(grab_primary)
            .await
            .map_err(|e| ShotlogError::Capture(format!("capture task failed: {e}")))?
    }
}

/// Open the primary display and block until it yields one frame.
fn grab_primary() -> Result<RgbaImage> {
    let display = Display::primary()
        .map_err(|e| ShotlogError::Capture(format!("no primary display: {e}")))?;
    let mut capturer = Capturer::new(display)
        .map_err(|e| ShotlogError::Capture(format!("failed to open capturer: {e}")))?;
    let (width, height) = (capturer.width(), capturer.height());
    if width == 0 || height == 0 {
        return Err(ShotlogError::Capture("display reports zero size".into()));
    }

    let mut waited = Duration::ZERO;
    loop {
        match capturer.frame() {
            Ok(frame) => return bgra_to_rgba(&frame, width, height),
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                if waited >= GIVE_UP {
                    return Err(ShotlogError::Capture(
                        "timed out waiting for a frame".into(),
                    ));
                }
                thread::sleep(POLL);
                waited += POLL;
            }
            Err(e) => return Err(ShotlogError::Capture(format!("frame grab failed: {e}"))),
        }
    }
}

/// Convert a stride-padded BGRA buffer into a tightly packed RGBA image.
fn bgra_to_rgba(data: &[u8], width: usize, height: usize) -> Result<RgbaImage> {
    let stride = data.len() / height;
    if stride < width * 4 {
        return Err(ShotlogError::Capture(format!(
            "frame buffer too small: stride {stride} for width {width}"
        )));
    }

    let mut out = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        let row = &data[y * stride..y * stride + width * 4];
        for px in row.chunks_exact(4) {
            out.extend_from_slice(&[px[2], px[1], px[0], 255]);
        }
    }

    RgbaImage::from_raw(width as u32, height as u32, out)
        .ok_or_else(|| ShotlogError::Capture("frame buffer size mismatch".into()))
}
