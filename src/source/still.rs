use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{StippleError, StippleResult};
use crate::foundation::pixels::{FrameRGBA, PixelBuffer};
use crate::source::{FrameSource, SourceInfo};

/// A single decoded image presented as a clip of fixed length.
///
/// Every timestamp shows the same pixels, which is what animated-preset exports of a still need.
#[derive(Clone, Debug)]
pub struct StillSource {
    frame: FrameRGBA,
    duration_sec: f64,
}

impl StillSource {
    pub fn new(frame: FrameRGBA, duration_sec: f64) -> StippleResult<Self> {
        frame.view()?;
        if !duration_sec.is_finite() || duration_sec < 0.0 {
            return Err(StippleError::configuration(format!(
                "still duration must be a non-negative number of seconds, got {duration_sec}"
            )));
        }
        Ok(Self {
            frame,
            duration_sec,
        })
    }

    /// Decode PNG/JPEG/GIF/etc. bytes.
    pub fn decode(bytes: &[u8], duration_sec: f64) -> StippleResult<Self> {
        let img = image::load_from_memory(bytes)
            .context("decode image from memory")?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Self::new(
            FrameRGBA::from_straight(width, height, img.into_raw())?,
            duration_sec,
        )
    }

    pub fn open(path: &Path, duration_sec: f64) -> StippleResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read image '{}'", path.display()))?;
        Self::decode(&bytes, duration_sec)
    }

    pub fn frame(&self) -> &FrameRGBA {
        &self.frame
    }
}

impl FrameSource for StillSource {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            duration_sec: self.duration_sec,
            size: Canvas {
                width: self.frame.width,
                height: self.frame.height,
            },
        }
    }

    async fn seek(&mut self, _t: f64) -> StippleResult<()> {
        Ok(())
    }

    async fn decoded(&mut self) -> Option<StippleResult<()>> {
        Some(Ok(()))
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn current_frame(&self) -> StippleResult<PixelBuffer<'_>> {
        self.frame.view()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/still.rs"]
mod tests;
