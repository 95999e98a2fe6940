use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{StippleError, StippleResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> StippleResult<Self> {
        if den == 0 {
            return Err(StippleError::configuration("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(StippleError::configuration("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn integer(fps: u32) -> StippleResult<Self> {
        Self::new(fps, 1)
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Presentation time of `frame` on this rate's grid.
    pub fn frame_to_secs(self, frame: FrameIndex) -> f64 {
        (frame.0 as f64) / self.as_f64()
    }

    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }

    /// Per-frame delay in whole milliseconds, `round(1000 / fps)`.
    pub fn frame_delay_ms(self) -> u64 {
        (1000.0 * self.frame_duration_secs()).round().max(0.0) as u64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> StippleResult<Self> {
        if width == 0 || height == 0 {
            return Err(StippleError::configuration(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Opaque 8-bit sRGB color, written as `#rrggbb` in configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl FromStr for Rgb8 {
    type Err = StippleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let bad = || StippleError::configuration(format!("invalid hex color '{s}'"));
        let digit = |c: u8| -> Result<u8, StippleError> {
            (c as char).to_digit(16).map(|d| d as u8).ok_or_else(bad)
        };
        let bytes = hex.as_bytes();
        match bytes.len() {
            6 => {
                let mut out = [0u8; 3];
                for (i, pair) in bytes.chunks_exact(2).enumerate() {
                    out[i] = (digit(pair[0])? << 4) | digit(pair[1])?;
                }
                Ok(Self::new(out[0], out[1], out[2]))
            }
            3 => {
                let expand = |c: u8| -> Result<u8, StippleError> { Ok(digit(c)? * 17) };
                Ok(Self::new(
                    expand(bytes[0])?,
                    expand(bytes[1])?,
                    expand(bytes[2])?,
                ))
            }
            _ => Err(bad()),
        }
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl serde::Serialize for Rgb8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Rgb8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
