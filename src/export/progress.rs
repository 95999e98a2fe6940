use crate::foundation::math::round_half_up;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProgressKind {
    Start,
    Progress,
    Complete,
    Failed,
    Cancelled,
}

/// One progress notification. `percent` is in `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressEvent {
    pub kind: ProgressKind,
    pub percent: u8,
}

impl ProgressEvent {
    pub fn new(kind: ProgressKind, percent: u8) -> Self {
        Self {
            kind,
            percent: percent.min(100),
        }
    }
}

/// Receiver for export progress.
pub trait ProgressSink {
    fn emit(&mut self, event: ProgressEvent);
}

impl<F: FnMut(ProgressEvent)> ProgressSink for F {
    fn emit(&mut self, event: ProgressEvent) {
        self(event)
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn emit(&mut self, _event: ProgressEvent) {}
}

/// Percent reported once frame `index` of `total` is finished.
///
/// Counts the finished frame itself, so the last frame reports 100.
pub fn percent_after_frame(index: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = round_half_up((index + 1) as f64 / total as f64 * 100.0);
    pct.clamp(0.0, 100.0) as u8
}
