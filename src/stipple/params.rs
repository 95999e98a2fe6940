use std::str::FromStr;

use crate::foundation::core::Rgb8;
use crate::foundation::error::StippleError;

/// Icon glyph drawn at every stipple point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    #[default]
    Cursor,
    Circle,
    Triangle,
    Star,
}

impl IconKind {
    /// Lenient lookup: unknown names fall back to [`IconKind::Cursor`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "circle" => Self::Circle,
            "triangle" => Self::Triangle,
            "star" => Self::Star,
            _ => Self::Cursor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cursor => "cursor",
            Self::Circle => "circle",
            Self::Triangle => "triangle",
            Self::Star => "star",
        }
    }
}

impl FromStr for IconKind {
    type Err = StippleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl<'de> serde::Deserialize<'de> for IconKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_name(&s))
    }
}

/// Style knobs for one stipple render.
///
/// Values outside their documented ranges are accepted here and forced into range by
/// [`StippleParams::clamped`], which every renderer applies before use.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StippleParams {
    /// Sampling density, `10..=100`.
    pub density: f64,
    /// Icon size in pixels, `5..=30`.
    pub icon_size: f64,
    /// Brightness threshold, `0..=255`.
    pub threshold: f64,
    pub invert_threshold: bool,
    /// Percentage of the larger region side used as maximum displacement, `0..=100`.
    pub dispersion_amount: f64,
    /// Full rotation jitter range in degrees, `0..=45`.
    #[serde(alias = "rotationVariance")]
    pub rotation_variance_deg: f64,
    #[serde(alias = "backgroundColor")]
    pub background: Rgb8,
    #[serde(alias = "iconType")]
    pub icon: IconKind,
}

impl Default for StippleParams {
    fn default() -> Self {
        Self {
            density: 60.0,
            icon_size: 14.0,
            threshold: 120.0,
            invert_threshold: false,
            dispersion_amount: 70.0,
            rotation_variance_deg: 18.0,
            background: Rgb8::new(0x0b, 0x0f, 0x1a),
            icon: IconKind::Cursor,
        }
    }
}

impl StippleParams {
    pub const DENSITY_RANGE: (f64, f64) = (10.0, 100.0);
    pub const ICON_SIZE_RANGE: (f64, f64) = (5.0, 30.0);
    pub const THRESHOLD_RANGE: (f64, f64) = (0.0, 255.0);
    pub const DISPERSION_RANGE: (f64, f64) = (0.0, 100.0);
    pub const ROTATION_RANGE: (f64, f64) = (0.0, 45.0);

    /// Copy with every numeric field clamped into its range. NaN takes the range minimum.
    pub fn clamped(self) -> Self {
        fn clamp(v: f64, (lo, hi): (f64, f64)) -> f64 {
            if v.is_nan() { lo } else { v.clamp(lo, hi) }
        }
        Self {
            density: clamp(self.density, Self::DENSITY_RANGE),
            icon_size: clamp(self.icon_size, Self::ICON_SIZE_RANGE),
            threshold: clamp(self.threshold, Self::THRESHOLD_RANGE),
            dispersion_amount: clamp(self.dispersion_amount, Self::DISPERSION_RANGE),
            rotation_variance_deg: clamp(self.rotation_variance_deg, Self::ROTATION_RANGE),
            ..self
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stipple/params.rs"]
mod tests;
