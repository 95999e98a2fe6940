use std::fmt;

use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{StippleError, StippleResult};

/// Where an export job is in its per-frame cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportState {
    Idle,
    Seeking,
    AwaitingDecode,
    Rendering,
    Pacing,
    Finalizing,
    Done,
    Failed,
    Cancelled,
}

impl ExportState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::Cancelled)
    }

    /// Whether `self -> next` is a legal step.
    pub fn can_transition_to(self, next: ExportState) -> bool {
        use ExportState::*;
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (_, Failed | Cancelled)
                | (Idle, Seeking)
                | (Seeking, AwaitingDecode)
                | (AwaitingDecode, Rendering)
                | (Rendering, Pacing)
                | (Pacing, Seeking | Finalizing)
                | (Finalizing, Done)
        )
    }
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Bookkeeping for one export run.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportJob {
    pub source_duration_sec: f64,
    pub fps: Fps,
    pub total_frames: u64,
    pub size: Canvas,
    pub current_frame: u64,
    state: ExportState,
}

impl ExportJob {
    pub fn new(source_duration_sec: f64, fps: Fps, total_frames: u64, size: Canvas) -> Self {
        Self {
            source_duration_sec,
            fps,
            total_frames,
            size,
            current_frame: 0,
            state: ExportState::Idle,
        }
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Move to `next`, rejecting steps the state machine does not allow.
    pub fn transition(&mut self, next: ExportState) -> StippleResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(StippleError::Other(anyhow::anyhow!(
                "illegal export transition {} -> {next}",
                self.state
            )));
        }
        tracing::trace!(from = %self.state, to = %next, frame = self.current_frame, "export state");
        self.state = next;
        Ok(())
    }
}

/// `max(1, floor(duration * fps))`.
pub fn total_frames(duration_sec: f64, fps: Fps) -> u64 {
    if !duration_sec.is_finite() || duration_sec <= 0.0 {
        return 1;
    }
    fps.secs_to_frames_floor(duration_sec).max(1)
}

/// Source timestamp for output frame `index`: `index / fps`, kept inside `[0, duration - 0.001]`.
pub fn frame_timestamp(index: u64, fps: Fps, source_duration_sec: f64) -> f64 {
    let t = fps.frame_to_secs(FrameIndex(index));
    t.min(source_duration_sec - 0.001).max(0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/export/state.rs"]
mod tests;
