use std::path::{Path, PathBuf};

use tokio::task::JoinHandle;

use crate::foundation::core::Canvas;
use crate::foundation::error::{StippleError, StippleResult};
use crate::foundation::pixels::{FrameRGBA, PixelBuffer};
use crate::source::{FrameSource, SourceInfo};

/// Stream facts reported by `ffprobe`.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoProbe {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps_num: u32,
    pub fps_den: u32,
    pub duration_sec: f64,
}

impl VideoProbe {
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }
}

pub fn probe_video(path: &Path) -> StippleResult<VideoProbe> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| StippleError::source_unavailable(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(StippleError::source_unavailable(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| StippleError::source_unavailable(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| StippleError::input(format!("no video stream in '{}'", path.display())))?;
    let width = stream
        .width
        .filter(|&w| w > 0)
        .ok_or_else(|| StippleError::input("missing video width from ffprobe"))?;
    let height = stream
        .height
        .filter(|&h| h > 0)
        .ok_or_else(|| StippleError::input("missing video height from ffprobe"))?;
    let (fps_num, fps_den) =
        parse_ff_ratio(stream.r_frame_rate.as_deref().unwrap_or("0/1")).unwrap_or((0, 1));
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(stream.duration.as_deref())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .unwrap_or(0.0);

    Ok(VideoProbe {
        path: path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        duration_sec,
    })
}

/// Decode the frame at `t` as raw RGBA8. `None` means ffmpeg produced no full frame.
///
/// The child is killed if this future is dropped before it exits.
async fn decode_frame_at(probe: VideoProbe, t: f64) -> StippleResult<Option<Vec<u8>>> {
    let out = tokio::process::Command::new("ffmpeg")
        .args(["-v", "error", "-ss", &format!("{t:.9}")])
        .arg("-i")
        .arg(&probe.path)
        .args([
            "-frames:v",
            "1",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "pipe:1",
        ])
        .stdin(std::process::Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| {
            StippleError::source_unavailable(format!("failed to run ffmpeg for video decode: {e}"))
        })?;
    if !out.status.success() {
        return Err(StippleError::source_unavailable(format!(
            "ffmpeg video decode failed for '{}': {}",
            probe.path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let expected = probe.width as usize * probe.height as usize * 4;
    if out.stdout.len() < expected {
        return Ok(None);
    }
    let mut data = out.stdout;
    data.truncate(expected);
    Ok(Some(data))
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}

/// Video file decoded one frame per seek through the system `ffmpeg`.
///
/// [`FrameSource::seek`] spawns an `ffmpeg` decode as a tokio task and returns;
/// [`FrameSource::decoded`] waits for it. A newer seek, or dropping the source, kills a decode
/// still in flight. If a decode comes back empty (seeking past the last frame) the previous frame
/// stays current.
#[derive(Debug)]
pub struct FfmpegVideoSource {
    probe: VideoProbe,
    position: f64,
    pending: Option<JoinHandle<StippleResult<Option<Vec<u8>>>>>,
    frame: Option<FrameRGBA>,
}

impl FfmpegVideoSource {
    pub fn open(path: &Path) -> StippleResult<Self> {
        let probe = probe_video(path)?;
        tracing::debug!(
            path = %path.display(),
            width = probe.width,
            height = probe.height,
            duration = probe.duration_sec,
            fps = probe.source_fps(),
            "opened video source"
        );
        Ok(Self {
            probe,
            position: 0.0,
            pending: None,
            frame: None,
        })
    }

    pub fn probe(&self) -> &VideoProbe {
        &self.probe
    }

    pub fn position(&self) -> f64 {
        self.position
    }
}

impl Drop for FfmpegVideoSource {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl FrameSource for FfmpegVideoSource {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            duration_sec: self.probe.duration_sec,
            size: Canvas {
                width: self.probe.width,
                height: self.probe.height,
            },
        }
    }

    async fn seek(&mut self, t: f64) -> StippleResult<()> {
        if let Some(stale) = self.pending.take() {
            stale.abort();
        }
        let t = t.min(self.probe.duration_sec - 0.001).max(0.0);
        self.position = t;
        let probe = self.probe.clone();
        self.pending = Some(tokio::spawn(decode_frame_at(probe, t)));
        Ok(())
    }

    async fn decoded(&mut self) -> Option<StippleResult<()>> {
        // Awaited in place: if this wait is dropped, the decode stays owned and killable.
        let joined = self.pending.as_mut()?.await;
        self.pending = None;
        let result = match joined {
            Ok(Ok(Some(data))) => {
                FrameRGBA::from_straight(self.probe.width, self.probe.height, data)
                    .map(|frame| self.frame = Some(frame))
            }
            Ok(Ok(None)) => {
                tracing::warn!(t = self.position, "ffmpeg returned no frame; keeping previous");
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(e) => Err(StippleError::source_unavailable(format!(
                "video decode task failed: {e}"
            ))),
        };
        Some(result)
    }

    fn is_ready(&self) -> bool {
        self.pending.is_none() && self.frame.is_some()
    }

    fn current_frame(&self) -> StippleResult<PixelBuffer<'_>> {
        self.frame
            .as_ref()
            .ok_or_else(|| {
                StippleError::source_unavailable(format!(
                    "no frame decoded yet from '{}'",
                    self.probe.path.display()
                ))
            })?
            .view()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/ffmpeg.rs"]
mod tests;
