use std::fmt;
use std::str::FromStr;

use crate::foundation::core::{Canvas, Rect};
use crate::foundation::error::{StippleError, StippleResult};
use crate::foundation::math::round_half_up;

/// Integer placement of an image inside a larger canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// The whole canvas.
    pub fn full(canvas: Canvas) -> Self {
        Self {
            x: 0,
            y: 0,
            width: canvas.width,
            height: canvas.height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x) + f64::from(self.width),
            f64::from(self.y) + f64::from(self.height),
        )
    }

    pub fn size(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

/// Scale `source` uniformly to fit inside `target`, centered.
///
/// Sizes and offsets are floored; the result is never smaller than 1x1.
pub fn fit_contain(source: Canvas, target: Canvas) -> Placement {
    let scale = (f64::from(target.width) / f64::from(source.width))
        .min(f64::from(target.height) / f64::from(source.height));
    let width = ((f64::from(source.width) * scale).floor() as u32).clamp(1, target.width.max(1));
    let height =
        ((f64::from(source.height) * scale).floor() as u32).clamp(1, target.height.max(1));
    Placement {
        x: (target.width - width) / 2,
        y: (target.height - height) / 2,
        width,
        height,
    }
}

/// Output resolution preset for exports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "source")]
    Source,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "720p")]
    P720,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::P1080 => "1080p",
            Self::P720 => "720p",
        }
    }

    fn target_height(self) -> Option<u32> {
        match self {
            Self::Source => None,
            Self::P1080 => Some(1080),
            Self::P720 => Some(720),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = StippleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" => Ok(Self::Source),
            "1080p" | "1080" => Ok(Self::P1080),
            "720p" | "720" => Ok(Self::P720),
            other => Err(StippleError::configuration(format!(
                "unknown resolution '{other}' (expected source, 1080p or 720p)"
            ))),
        }
    }
}

/// Frame size for an export of `source` at `resolution`.
///
/// Fixed-height presets derive the width from the source aspect ratio; both sides are bumped to
/// the next even number.
pub fn export_size(source: Canvas, resolution: Resolution) -> StippleResult<Canvas> {
    if source.width == 0 || source.height == 0 {
        return Err(StippleError::configuration(format!(
            "cannot export from a {}x{} source",
            source.width, source.height
        )));
    }
    let Some(height) = resolution.target_height() else {
        return Ok(source);
    };
    let ratio = f64::from(source.width) / f64::from(source.height);
    let width = round_half_up(f64::from(height) * ratio).max(1.0) as u32;
    Canvas::new(even(width), even(height))
}

fn even(n: u32) -> u32 {
    if n % 2 == 0 { n } else { n + 1 }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
