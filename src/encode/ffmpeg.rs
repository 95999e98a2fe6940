use std::fmt;
use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::str::FromStr;
use std::thread::JoinHandle;

use crate::encode::sink::{FrameSink, SinkConfig, check_order, check_size};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{StippleError, StippleResult};
use crate::foundation::math::mul_div255_u16;
use crate::foundation::pixels::FrameRGBA;

/// Default target bitrate for video exports, in bits per second.
pub const DEFAULT_BITRATE: u32 = 10_000_000;

/// Container produced by [`FfmpegSink`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    #[default]
    Webm,
    Mp4,
}

impl VideoFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Webm => "video/webm",
            Self::Mp4 => "video/mp4",
        }
    }

    /// Encoders to try, most preferred first. An empty match falls back to ffmpeg's default for
    /// the container.
    fn preferred_codecs(self) -> &'static [&'static str] {
        match self {
            Self::Webm => &["libvpx", "libvpx-vp9"],
            Self::Mp4 => &["libx264"],
        }
    }

    fn muxer_args(self) -> &'static [&'static str] {
        match self {
            Self::Webm => &["-f", "webm"],
            // mp4 cannot seek back on a pipe, so write a fragmented file.
            Self::Mp4 => &["-f", "mp4", "-movflags", "frag_keyframe+empty_moov"],
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for VideoFormat {
    type Err = StippleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "webm" => Ok(Self::Webm),
            "mp4" => Ok(Self::Mp4),
            other => Err(StippleError::configuration(format!(
                "unsupported video format '{other}' (expected webm or mp4)"
            ))),
        }
    }
}

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub format: VideoFormat,
    /// Target bitrate in bits per second.
    pub bitrate: u32,
    /// Background used to flatten any transparency (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    pub fn new(format: VideoFormat) -> Self {
        Self {
            format,
            bitrate: DEFAULT_BITRATE,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// Encoded video returned by [`FfmpegSink::end`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedVideo {
    pub format: VideoFormat,
    /// Encoder that produced the stream; `None` means ffmpeg's default for the container.
    pub codec: Option<&'static str>,
    pub bytes: Vec<u8>,
}

/// Pick the first preferred encoder listed in `ffmpeg -encoders` output.
pub fn select_codec(format: VideoFormat, encoders_listing: &str) -> Option<&'static str> {
    format.preferred_codecs().iter().copied().find(|codec| {
        encoders_listing
            .lines()
            .any(|line| line.split_whitespace().nth(1) == Some(*codec))
    })
}

fn list_encoders() -> StippleResult<String> {
    let out = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .output()
        .map_err(|e| StippleError::sink(format!("failed to run ffmpeg -encoders: {e}")))?;
    Ok(String::from_utf8_lossy(&out.stdout).into_owned())
}

/// Streams frames into the system `ffmpeg` and collects the encoded container from its stdout.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    codec: Option<&'static str>,
    last_idx: Option<FrameIndex>,
}

impl fmt::Debug for FfmpegSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FfmpegSink")
            .field("opts", &self.opts)
            .field("cfg", &self.cfg)
            .field("codec", &self.codec)
            .field("running", &self.child.is_some())
            .finish_non_exhaustive()
    }
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stdout_drain: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            codec: None,
            last_idx: None,
        }
    }

    /// Encoder chosen in `begin`.
    pub fn codec(&self) -> Option<&'static str> {
        self.codec
    }

    fn shutdown(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(h) = self.stdout_drain.take() {
            let _ = h.join();
        }
        if let Some(h) = self.stderr_drain.take() {
            let _ = h.join();
        }
        self.cfg = None;
        self.last_idx = None;
    }
}

impl FrameSink for FfmpegSink {
    type Output = EncodedVideo;

    fn begin(&mut self, cfg: SinkConfig) -> StippleResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(StippleError::configuration(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if self.opts.bitrate == 0 {
            return Err(StippleError::configuration("bitrate must be non-zero"));
        }
        if !is_ffmpeg_on_path() {
            return Err(StippleError::configuration(
                "ffmpeg is required for video export, but was not found on PATH",
            ));
        }
        self.shutdown();

        let codec = select_codec(self.opts.format, &list_encoders()?);
        if codec.is_none() {
            tracing::warn!(
                format = %self.opts.format,
                "no preferred encoder available; using ffmpeg default"
            );
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.args(encoder_args(&cfg, &self.opts, codec))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            StippleError::sink(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| StippleError::sink("failed to open ffmpeg stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| StippleError::sink("failed to open ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| StippleError::sink("failed to open ffmpeg stderr"))?;

        tracing::debug!(
            width = cfg.width,
            height = cfg.height,
            fps = cfg.fps.as_f64(),
            codec = codec.unwrap_or("default"),
            "ffmpeg sink started"
        );

        self.scratch = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        self.stdout_drain = Some(drain(stdout));
        self.stderr_drain = Some(drain(stderr));
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.cfg = Some(cfg);
        self.codec = codec;
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StippleResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| StippleError::sink("ffmpeg sink not started"))?;
        check_size(cfg, frame)?;
        check_order(&mut self.last_idx, idx, "ffmpeg sink")?;

        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            self.opts.bg_rgba,
        )?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(StippleError::sink("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            StippleError::sink(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> StippleResult<EncodedVideo> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| StippleError::sink("ffmpeg sink not started"))?;

        let status = child
            .wait()
            .map_err(|e| StippleError::sink(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stdout = join_drain(self.stdout_drain.take(), "stdout")?;
        let stderr = join_drain(self.stderr_drain.take(), "stderr")?;
        self.cfg = None;

        if !status.success() {
            return Err(StippleError::sink(format!(
                "ffmpeg exited with status {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        if stdout.is_empty() {
            return Err(StippleError::sink("ffmpeg produced no output"));
        }

        Ok(EncodedVideo {
            format: self.opts.format,
            codec: self.codec,
            bytes: stdout,
        })
    }

    fn abort(&mut self) {
        if self.child.is_some() {
            tracing::debug!("aborting ffmpeg sink");
        }
        self.shutdown();
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    std::thread::spawn(move || {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    })
}

fn join_drain(
    handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    what: &str,
) -> StippleResult<Vec<u8>> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| StippleError::sink(format!("ffmpeg {what} drain thread panicked")))?
            .map_err(|e| StippleError::sink(format!("ffmpeg {what} read failed: {e}"))),
        None => Ok(Vec::new()),
    }
}

/// Command line for one encode. Raw RGBA8 frames (flattened to opaque in `push_frame`) arrive on
/// stdin; the container is written to stdout.
///
/// yuv420p needs even dimensions, so odd frames are padded by one row or column of black.
fn encoder_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts, codec: Option<&str>) -> Vec<String> {
    let mut args: Vec<String> = [
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    args.push(format!("{}x{}", cfg.width, cfg.height));
    push_input_fps(&mut args, cfg.fps);
    args.extend(["-i", "pipe:0", "-an"].map(String::from));
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        args.extend(["-vf", EVEN_PAD_FILTER].map(String::from));
    }
    if let Some(codec) = codec {
        args.extend(["-c:v", codec].map(String::from));
    }
    args.extend([
        "-b:v".to_owned(),
        opts.bitrate.to_string(),
        "-pix_fmt".to_owned(),
        "yuv420p".to_owned(),
    ]);
    args.extend(opts.format.muxer_args().iter().map(|a| (*a).to_owned()));
    args.push("pipe:1".to_owned());
    args
}

const EVEN_PAD_FILTER: &str = "pad=ceil(iw/2)*2:ceil(ih/2)*2";

fn push_input_fps(args: &mut Vec<String>, fps: Fps) {
    // For rawvideo input, `-r` goes before `-i`.
    args.push("-r".to_owned());
    args.push(format!("{}/{}", fps.num, fps.den));
}

fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> StippleResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(StippleError::sink(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg_rgba[0]);
    let bg_g = u16::from(bg_rgba[1]);
    let bg_b = u16::from(bg_rgba[2]);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255 - a;
        let channel = |c: u8, bg: u16| -> u8 {
            let fg = if src_is_premul {
                u16::from(c)
            } else {
                mul_div255_u16(u16::from(c), a)
            };
            (fg + mul_div255_u16(bg, inv)).min(255) as u8
        };
        d[0] = channel(s[0], bg_r);
        d[1] = channel(s[1], bg_g);
        d[2] = channel(s[2], bg_b);
        d[3] = 255;
    }

    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> StippleResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
