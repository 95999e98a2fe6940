//! Where export frames come from.
//!
//! A [`FrameSource`] is driven by the exporter one timestamp at a time: seek, wait for the decoded
//! frame, then read the pixels that are current.

use std::future::Future;

use crate::foundation::core::Canvas;
use crate::foundation::error::StippleResult;
use crate::foundation::pixels::PixelBuffer;

#[cfg(feature = "media-ffmpeg")]
pub mod ffmpeg;
pub mod still;

#[cfg(feature = "media-ffmpeg")]
pub use ffmpeg::{FfmpegVideoSource, VideoProbe, probe_video};
pub use still::StillSource;

/// Static facts about a source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceInfo {
    /// Playable length in seconds.
    pub duration_sec: f64,
    /// Native frame size.
    pub size: Canvas,
}

/// A seekable producer of RGBA frames.
pub trait FrameSource: Send {
    fn info(&self) -> SourceInfo;

    /// Move to `t` seconds. Resolves once the source acknowledges the new position.
    fn seek(&mut self, t: f64) -> impl Future<Output = StippleResult<()>> + Send;

    /// Wait for the frame at the current position to be decoded.
    ///
    /// Returns `None` when the source has no exact notification; callers then fall back to
    /// polling [`FrameSource::is_ready`].
    fn decoded(&mut self) -> impl Future<Output = Option<StippleResult<()>>> + Send;

    /// Whether pixels for the current position are available.
    fn is_ready(&self) -> bool;

    /// Pixels at the current position. Sources may return the last frame they had when the
    /// requested one is late.
    fn current_frame(&self) -> StippleResult<PixelBuffer<'_>>;
}
