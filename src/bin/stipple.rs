use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use stipple::{
    AnimationPreset, CancelToken, Canvas, ExportSettings, FrameExporter, GifSink, GifSinkOpts,
    IconKind, ProgressEvent, ProgressKind, Resolution, Rgb8, StillSource, StippleParams,
};

#[derive(Parser, Debug)]
#[command(name = "stipple", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stipple a still image into a PNG.
    Still(StillArgs),
    /// Animate a still image into a GIF using a parameter preset.
    Gif(GifArgs),
    /// Stipple every frame of a video (requires the `media-ffmpeg` feature and ffmpeg on PATH).
    Video(VideoArgs),
}

/// Style overrides shared by every subcommand. Flags win over `--params`.
#[derive(Args, Debug, Default)]
struct StyleArgs {
    /// JSON file with stipple parameters.
    #[arg(long)]
    params: Option<PathBuf>,

    #[arg(long)]
    density: Option<f64>,

    #[arg(long)]
    icon_size: Option<f64>,

    #[arg(long)]
    threshold: Option<f64>,

    /// Stipple bright areas instead of dark ones.
    #[arg(long, conflicts_with = "no_invert")]
    invert: bool,

    /// Stipple dark areas even when `--params` sets `invertThreshold`.
    #[arg(long)]
    no_invert: bool,

    /// Dispersion strength in percent.
    #[arg(long)]
    dispersion: Option<f64>,

    /// Rotation jitter range in degrees.
    #[arg(long)]
    rotation: Option<f64>,

    /// Background color as #rrggbb.
    #[arg(long)]
    background: Option<Rgb8>,

    /// cursor, circle, triangle or star.
    #[arg(long)]
    icon: Option<IconKind>,

    /// RNG seed for rotation jitter.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl StyleArgs {
    fn resolve(&self) -> anyhow::Result<StippleParams> {
        let mut p: StippleParams = match &self.params {
            Some(path) => read_json(path)?,
            None => StippleParams::default(),
        };
        if let Some(v) = self.density {
            p.density = v;
        }
        if let Some(v) = self.icon_size {
            p.icon_size = v;
        }
        if let Some(v) = self.threshold {
            p.threshold = v;
        }
        if self.invert {
            p.invert_threshold = true;
        } else if self.no_invert {
            p.invert_threshold = false;
        }
        if let Some(v) = self.dispersion {
            p.dispersion_amount = v;
        }
        if let Some(v) = self.rotation {
            p.rotation_variance_deg = v;
        }
        if let Some(v) = self.background {
            p.background = v;
        }
        if let Some(v) = self.icon {
            p.icon = v;
        }
        Ok(p.clamped())
    }
}

/// Export overrides. Flags win over `--settings`.
#[derive(Args, Debug, Default)]
struct ExportArgs {
    /// JSON file with export settings.
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long)]
    fps: Option<u32>,

    /// Clip length in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// source, 1080p or 720p.
    #[arg(long)]
    resolution: Option<Resolution>,

    /// none, pulseDensity, sweepThreshold, spinRotation, ...
    #[arg(long, value_parser = parse_preset)]
    preset: Option<AnimationPreset>,
}

impl ExportArgs {
    fn resolve(&self, seed: u64) -> anyhow::Result<ExportSettings> {
        let mut s: ExportSettings = match &self.settings {
            Some(path) => read_json(path)?,
            None => ExportSettings::default(),
        };
        if let Some(v) = self.fps {
            s.fps = v;
        }
        if let Some(v) = self.duration {
            s.duration_sec = Some(v);
        }
        if let Some(v) = self.resolution {
            s.resolution = v;
        }
        if let Some(v) = self.preset {
            s.preset = v;
        }
        s.seed = seed;
        Ok(s)
    }
}

#[derive(Parser, Debug)]
struct StillArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Canvas width; defaults to the image width.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height; defaults to the image height.
    #[arg(long)]
    height: Option<u32>,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Parser, Debug)]
struct GifArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    style: StyleArgs,

    #[command(flatten)]
    export: ExportArgs,
}

#[derive(Parser, Debug)]
struct VideoArgs {
    /// Input video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path; the extension picks webm or mp4 unless `--format` is given.
    #[arg(long)]
    out: PathBuf,

    /// webm or mp4.
    #[arg(long)]
    format: Option<stipple::VideoFormat>,

    /// Target bitrate in bits per second.
    #[arg(long)]
    bitrate: Option<u32>,

    /// Skip real-time pacing between frames.
    #[arg(long)]
    no_pacing: bool,

    #[command(flatten)]
    style: StyleArgs,

    #[command(flatten)]
    export: ExportArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Still(args) => cmd_still(args),
        Command::Gif(args) => cmd_gif(args),
        Command::Video(args) => cmd_video(args),
    }
}

fn parse_preset(s: &str) -> Result<AnimationPreset, String> {
    serde_json::from_value(serde_json::Value::String(s.to_owned()))
        .map_err(|_| format!("unknown animation preset '{s}'"))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse JSON '{}'", path.display()))
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    stipple::encode::ffmpeg::ensure_parent_dir(path)?;
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn report_progress(e: ProgressEvent) {
    match e.kind {
        ProgressKind::Progress => tracing::debug!(percent = e.percent, "export progress"),
        kind => tracing::info!(?kind, percent = e.percent, "export"),
    }
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let params = args.style.resolve()?;
    let source = StillSource::open(&args.in_path, 0.0)?;
    let frame = source.frame();
    let canvas = Canvas::new(
        args.width.unwrap_or(frame.width),
        args.height.unwrap_or(frame.height),
    )?;

    let out = stipple::render_still(
        &frame.view()?,
        canvas,
        params,
        &mut StdRng::seed_from_u64(args.style.seed),
    )?;

    stipple::encode::ffmpeg::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &out.data,
        out.width,
        out.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_gif(args: GifArgs) -> anyhow::Result<()> {
    let params = args.style.resolve()?;
    let base = args.export.resolve(args.style.seed)?;
    let duration = base.duration_sec.unwrap_or(2.0);
    let settings = base.for_gif(duration)?;
    if !settings.preset.is_animated() {
        tracing::warn!(
            preset = ?settings.preset,
            "preset does not animate; every gif frame will look the same"
        );
    }

    let mut source = StillSource::open(&args.in_path, duration)?;
    let mut sink = GifSink::new(GifSinkOpts::default());
    let mut exporter = FrameExporter::new();
    let cancel = CancelToken::new();

    let bytes = runtime()?.block_on(exporter.export(
        &mut source,
        &mut sink,
        params,
        &settings,
        &mut report_progress,
        &cancel,
    ))?;

    write_output(&args.out, &bytes)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

#[cfg(feature = "media-ffmpeg")]
fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    use stipple::{FfmpegSink, FfmpegSinkOpts, FfmpegVideoSource};

    let params = args.style.resolve()?;
    let mut settings = args.export.resolve(args.style.seed)?;
    settings.format = match args.format {
        Some(f) => f,
        None => match args.out.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.parse().unwrap_or(settings.format),
            None => settings.format,
        },
    };
    if let Some(b) = args.bitrate {
        settings.bitrate = b;
    }
    if args.no_pacing {
        settings.pacing = false;
    }

    let mut source = FfmpegVideoSource::open(&args.in_path)?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        bitrate: settings.bitrate,
        bg_rgba: params.background.to_rgba(),
        ..FfmpegSinkOpts::new(settings.format)
    });
    let mut exporter = FrameExporter::new();
    let cancel = CancelToken::new();

    let video = runtime()?.block_on(exporter.export(
        &mut source,
        &mut sink,
        params,
        &settings,
        &mut report_progress,
        &cancel,
    ))?;

    write_output(&args.out, &video.bytes)?;
    eprintln!(
        "wrote {} ({}, codec {})",
        args.out.display(),
        video.format.mime_type(),
        video.codec.unwrap_or("default")
    );
    Ok(())
}

#[cfg(not(feature = "media-ffmpeg"))]
fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    anyhow::bail!(
        "cannot read '{}': video input requires the 'media-ffmpeg' feature",
        args.in_path.display()
    )
}
