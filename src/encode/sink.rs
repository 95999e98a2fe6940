use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{StippleError, StippleResult};
use crate::foundation::pixels::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming exported frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order between one
/// `begin` and the matching `end` or `abort`.
pub trait FrameSink: Send {
    /// What a successful export produces.
    type Output;

    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> StippleResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StippleResult<()>;
    /// Finalize and hand back the output.
    fn end(&mut self) -> StippleResult<Self::Output>;
    /// Discard everything pushed so far. Safe to call in any state.
    fn abort(&mut self) {}
}

/// Rejects frames that do not advance past `last`.
pub(crate) fn check_order(
    last: &mut Option<FrameIndex>,
    idx: FrameIndex,
    sink: &str,
) -> StippleResult<()> {
    if let Some(prev) = *last
        && idx <= prev
    {
        return Err(StippleError::sink(format!(
            "{sink} received frame {} after {}",
            idx.0, prev.0
        )));
    }
    *last = Some(idx);
    Ok(())
}

pub(crate) fn check_size(cfg: &SinkConfig, frame: &FrameRGBA) -> StippleResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(StippleError::sink(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    Ok(())
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    last_idx: Option<FrameIndex>,
    aborted: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Frames pushed since the last `begin`.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    pub fn was_aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameSink for InMemorySink {
    type Output = Vec<(FrameIndex, FrameRGBA)>;

    fn begin(&mut self, cfg: SinkConfig) -> StippleResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.last_idx = None;
        self.aborted = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StippleResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| StippleError::sink("in-memory sink not started"))?;
        check_size(cfg, frame)?;
        check_order(&mut self.last_idx, idx, "in-memory sink")?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> StippleResult<Self::Output> {
        if self.cfg.take().is_none() {
            return Err(StippleError::sink("in-memory sink not started"));
        }
        Ok(std::mem::take(&mut self.frames))
    }

    fn abort(&mut self) {
        self.cfg = None;
        self.frames.clear();
        self.aborted = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
