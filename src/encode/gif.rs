use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};

use crate::encode::sink::{FrameSink, SinkConfig, check_order, check_size};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{StippleError, StippleResult};
use crate::foundation::pixels::FrameRGBA;

/// Frame-rate range accepted for GIF output.
pub const GIF_FPS_RANGE: (u32, u32) = (1, 60);

/// Options for [`GifSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GifSinkOpts {
    /// NeuQuant sampling speed, `1` (best) to `30` (fastest).
    pub speed: i32,
    pub repeat_forever: bool,
}

impl Default for GifSinkOpts {
    fn default() -> Self {
        Self {
            speed: 10,
            repeat_forever: true,
        }
    }
}

/// Palette-quantized animated GIF, returned as bytes from `end`.
///
/// Frames are buffered and encoded in one pass at the end; each gets `round(1000 / fps)` ms.
#[derive(Debug, Default)]
pub struct GifSink {
    opts: GifSinkOpts,
    cfg: Option<SinkConfig>,
    frames: Vec<image::RgbaImage>,
    last_idx: Option<FrameIndex>,
}

impl GifSink {
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            ..Self::default()
        }
    }
}

impl FrameSink for GifSink {
    type Output = Vec<u8>;

    fn begin(&mut self, cfg: SinkConfig) -> StippleResult<()> {
        let fps = cfg.fps.as_f64();
        if fps < f64::from(GIF_FPS_RANGE.0) || fps > f64::from(GIF_FPS_RANGE.1) {
            return Err(StippleError::configuration(format!(
                "gif fps must be within {}..={}, got {fps}",
                GIF_FPS_RANGE.0, GIF_FPS_RANGE.1
            )));
        }
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(StippleError::configuration(format!(
                "gif frames are limited to 65535x65535, got {}x{}",
                cfg.width, cfg.height
            )));
        }
        self.cfg = Some(cfg);
        self.frames.clear();
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StippleResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| StippleError::sink("gif sink not started"))?;
        check_size(cfg, frame)?;
        check_order(&mut self.last_idx, idx, "gif sink")?;
        self.frames.push(frame.clone().into_rgba_image()?);
        Ok(())
    }

    fn end(&mut self) -> StippleResult<Vec<u8>> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| StippleError::sink("gif sink not started"))?;
        if self.frames.is_empty() {
            return Err(StippleError::sink("gif sink received no frames"));
        }

        let delay_ms = u32::try_from(cfg.fps.frame_delay_ms()).unwrap_or(u32::MAX);
        let delay = Delay::from_numer_denom_ms(delay_ms, 1);
        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut bytes, self.opts.speed.clamp(1, 30));
            if self.opts.repeat_forever {
                encoder
                    .set_repeat(Repeat::Infinite)
                    .map_err(|e| StippleError::sink(format!("gif repeat: {e}")))?;
            }
            let frames = std::mem::take(&mut self.frames)
                .into_iter()
                .map(|buf| Frame::from_parts(buf, 0, 0, delay));
            encoder
                .encode_frames(frames)
                .map_err(|e| StippleError::sink(format!("gif encode failed: {e}")))?;
        }
        tracing::debug!(bytes = bytes.len(), delay_ms, "gif encoded");
        Ok(bytes)
    }

    fn abort(&mut self) {
        self.cfg = None;
        self.frames.clear();
        self.last_idx = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
