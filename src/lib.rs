//! Stipple renders images and video as fields of small icons.
//!
//! Each frame goes through the same pipeline: pixel brightness becomes a silhouette mask, the
//! silhouette's 4-connected border becomes an edge mask, and icons are placed on a regular grid
//! inside the silhouette, pushed outward and jittered more strongly the closer they sit to an
//! edge.
//!
//! - Render a still with [`render_still`] or [`render_still_progressive`]
//! - Export a clip with [`FrameExporter`], reading from a [`FrameSource`] and streaming into a
//!   [`FrameSink`]
//! - Vary the look over time with an [`AnimationPreset`]
#![forbid(unsafe_code)]

mod foundation;

/// Parameter curves applied across an export.
pub mod animation;
/// Frame sinks: in-memory, GIF and ffmpeg video.
pub mod encode;
/// Export orchestration.
pub mod export;
pub mod mask;
pub mod render;
pub mod source;
pub mod stipple;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Fps, FrameIndex, Point, Rect, Rgb8, Vec2,
};
pub use crate::foundation::error::{StippleError, StippleResult};
pub use crate::foundation::pixels::{FrameRGBA, PixelBuffer};

pub use crate::animation::preset::{AnimationPreset, progress_fraction};
pub use crate::encode::ffmpeg::{EncodedVideo, FfmpegSink, FfmpegSinkOpts, VideoFormat};
pub use crate::encode::gif::{GifSink, GifSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::export::{
    CancelToken, ExportJob, ExportSettings, ExportState, FrameExporter, NoProgress,
    ProgressEvent, ProgressKind, ProgressSink,
};
pub use crate::mask::Mask;
pub use crate::mask::edges::detect_edges;
pub use crate::mask::silhouette::extract_silhouette;
pub use crate::render::layout::{Placement, Resolution, export_size, fit_contain};
pub use crate::render::pipeline::{
    StillStage, render_still, render_still_progressive, render_stipple_frame,
};
pub use crate::render::surface::CpuSurface;
pub use crate::source::{FrameSource, SourceInfo, StillSource};
#[cfg(feature = "media-ffmpeg")]
pub use crate::source::{FfmpegVideoSource, VideoProbe, probe_video};
pub use crate::stipple::engine::{StippleInput, grid_step, render_stipples};
pub use crate::stipple::icons::{IconDraw, IconStyle};
pub use crate::stipple::params::{IconKind, StippleParams};
