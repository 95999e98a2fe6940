use super::*;

fn base() -> StippleParams {
    StippleParams::default()
}

#[test]
fn none_is_identity() {
    for t in [0.0, 0.3, 1.0] {
        assert_eq!(AnimationPreset::None.apply(base(), t), base());
    }
}

#[test]
fn pulse_density_returns_to_base_at_both_ends() {
    assert_eq!(AnimationPreset::PulseDensity.apply(base(), 0.0), base());
    assert_eq!(AnimationPreset::PulseDensity.apply(base(), 1.0), base());
}

#[test]
fn pulse_density_peaks_and_clamps() {
    let quarter = AnimationPreset::PulseDensity.apply(base(), 0.25);
    assert_eq!(quarter.density, 90.0);

    let high = StippleParams {
        density: 95.0,
        ..base()
    };
    assert_eq!(AnimationPreset::PulseDensity.apply(high, 0.25).density, 100.0);

    let low = StippleParams {
        density: 15.0,
        ..base()
    };
    assert_eq!(AnimationPreset::PulseDensity.apply(low, 0.75).density, 10.0);
}

#[test]
fn sweep_threshold_spans_50_to_255() {
    let p = AnimationPreset::SweepThreshold;
    assert_eq!(p.apply(base(), 0.0).threshold, 50.0);
    assert_eq!(p.apply(base(), 1.0).threshold, 255.0);
    assert_eq!(p.apply(base(), 0.5).threshold, 153.0);
    assert_eq!(p.apply(base(), 0.5).density, base().density);
}

#[test]
fn spin_rotation_clamps_to_45() {
    let p = AnimationPreset::SpinRotation;
    assert_eq!(p.apply(base(), 0.0).rotation_variance_deg, 5.0);
    assert_eq!(p.apply(base(), 1.0).rotation_variance_deg, 45.0);
    assert_eq!(p.apply(base(), 0.5).rotation_variance_deg, 28.0);
}

#[test]
fn reserved_presets_leave_params_unchanged() {
    for preset in [
        AnimationPreset::WaveDispersion,
        AnimationPreset::BlinkThreshold,
        AnimationPreset::IconScalePulse,
    ] {
        assert!(!preset.is_animated());
        assert_eq!(preset.apply(base(), 0.4), base());
    }
}

#[test]
fn out_of_range_progress_is_clamped() {
    let p = AnimationPreset::SweepThreshold;
    assert_eq!(p.apply(base(), -1.0).threshold, 50.0);
    assert_eq!(p.apply(base(), 7.0).threshold, 255.0);
}

#[test]
fn progress_fraction_handles_single_frame() {
    assert_eq!(progress_fraction(0, 1), 1.0);
    assert_eq!(progress_fraction(0, 10), 0.0);
    assert_eq!(progress_fraction(9, 10), 1.0);
    assert!((progress_fraction(3, 7) - 0.5).abs() < 1e-12);
}

#[test]
fn preset_names_deserialize_in_camel_case() {
    let p: AnimationPreset = serde_json::from_str("\"sweepThreshold\"").unwrap();
    assert_eq!(p, AnimationPreset::SweepThreshold);
    let p: AnimationPreset = serde_json::from_str("\"iconScalePulse\"").unwrap();
    assert_eq!(p, AnimationPreset::IconScalePulse);
}
