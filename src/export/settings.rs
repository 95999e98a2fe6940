use std::time::Duration;

use crate::animation::preset::AnimationPreset;
use crate::encode::ffmpeg::{DEFAULT_BITRATE, VideoFormat};
use crate::encode::gif::GIF_FPS_RANGE;
use crate::foundation::error::{StippleError, StippleResult};
use crate::foundation::core::Fps;
use crate::foundation::math::round_half_up;
use crate::render::layout::Resolution;

/// Export configuration, loadable from JSON.
///
/// Fields not present in a config file keep their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportSettings {
    /// Output frame rate.
    pub fps: u32,
    /// Clip length in seconds; `None` uses the source duration.
    pub duration_sec: Option<f64>,
    /// Exact frame count, overriding the duration-derived one.
    pub frame_count: Option<u64>,
    pub resolution: Resolution,
    #[serde(alias = "animation")]
    pub preset: AnimationPreset,
    pub format: VideoFormat,
    /// Target bitrate for video output, bits per second.
    pub bitrate: u32,
    /// Wait one frame interval after each frame. Offline encoders can turn this off.
    pub pacing: bool,
    pub decode_poll_tries: u32,
    pub decode_poll_interval_ms: u64,
    pub flush_ms: u64,
    pub seek_timeout_ms: u64,
    /// Seed for rotation jitter.
    pub seed: u64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            fps: 30,
            duration_sec: None,
            frame_count: None,
            resolution: Resolution::Source,
            preset: AnimationPreset::None,
            format: VideoFormat::Webm,
            bitrate: DEFAULT_BITRATE,
            pacing: true,
            decode_poll_tries: 5,
            decode_poll_interval_ms: 50,
            flush_ms: 250,
            seek_timeout_ms: 5_000,
            seed: 0,
        }
    }
}

impl ExportSettings {
    pub fn fps(&self) -> StippleResult<Fps> {
        Fps::integer(self.fps)
    }

    pub fn decode_poll_interval(&self) -> Duration {
        Duration::from_millis(self.decode_poll_interval_ms)
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_ms)
    }

    pub fn seek_timeout(&self) -> Duration {
        Duration::from_millis(self.seek_timeout_ms)
    }

    /// Settings for an animated GIF of a still: fps forced into the GIF range, frame count
    /// `max(1, round(duration * fps))`, and no real-time pacing.
    pub fn for_gif(&self, duration_sec: f64) -> StippleResult<Self> {
        if !duration_sec.is_finite() || duration_sec < 0.0 {
            return Err(StippleError::configuration(format!(
                "gif duration must be a non-negative number of seconds, got {duration_sec}"
            )));
        }
        let fps = self.fps.clamp(GIF_FPS_RANGE.0, GIF_FPS_RANGE.1);
        let frames = round_half_up(duration_sec * f64::from(fps)).max(1.0) as u64;
        Ok(Self {
            fps,
            duration_sec: Some(duration_sec),
            frame_count: Some(frames),
            pacing: false,
            flush_ms: 0,
            ..self.clone()
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/settings.rs"]
mod tests;
