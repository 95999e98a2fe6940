use crate::foundation::math::round_half_up;
use crate::stipple::params::StippleParams;

/// Named parameter curve applied across an export.
///
/// `WaveDispersion`, `BlinkThreshold` and `IconScalePulse` are accepted names without a curve yet;
/// they leave the parameters unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationPreset {
    #[default]
    None,
    PulseDensity,
    SweepThreshold,
    SpinRotation,
    WaveDispersion,
    BlinkThreshold,
    IconScalePulse,
}

impl AnimationPreset {
    /// Whether this preset changes anything.
    pub fn is_animated(self) -> bool {
        matches!(
            self,
            Self::PulseDensity | Self::SweepThreshold | Self::SpinRotation
        )
    }

    /// Parameters for the frame at `progress` (clamped to `[0, 1]`).
    pub fn apply(self, base: StippleParams, progress: f64) -> StippleParams {
        let t = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        match self {
            Self::PulseDensity => {
                let wave = (t * std::f64::consts::TAU).sin() * 30.0;
                StippleParams {
                    density: round_half_up(base.density + wave).clamp(10.0, 100.0),
                    ..base
                }
            }
            Self::SweepThreshold => StippleParams {
                threshold: round_half_up(50.0 + t * 205.0).clamp(0.0, 255.0),
                ..base
            },
            Self::SpinRotation => StippleParams {
                rotation_variance_deg: round_half_up(5.0 + t * 45.0).clamp(0.0, 45.0),
                ..base
            },
            Self::None | Self::WaveDispersion | Self::BlinkThreshold | Self::IconScalePulse => base,
        }
    }
}

/// Position of frame `index` within `total` frames: `index / (total - 1)`, or `1` for a single
/// frame.
pub fn progress_fraction(index: u64, total: u64) -> f64 {
    if total > 1 {
        (index as f64 / (total - 1) as f64).min(1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/preset.rs"]
mod tests;
