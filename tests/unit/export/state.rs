use super::*;
use ExportState::*;

fn job() -> ExportJob {
    ExportJob::new(
        1.0,
        Fps::integer(10).unwrap(),
        10,
        Canvas {
            width: 4,
            height: 4,
        },
    )
}

#[test]
fn frame_counts_floor_and_never_hit_zero() {
    let fps30 = Fps::integer(30).unwrap();
    assert_eq!(total_frames(5.0, fps30), 150);
    assert_eq!(total_frames(0.01, fps30), 1);
    assert_eq!(total_frames(0.0, fps30), 1);
    assert_eq!(total_frames(f64::NAN, fps30), 1);
    assert_eq!(total_frames(1.0, Fps::integer(10).unwrap()), 10);
}

#[test]
fn timestamps_clamp_to_just_before_the_end() {
    let fps = Fps::integer(10).unwrap();
    assert_eq!(frame_timestamp(0, fps, 1.0), 0.0);
    assert!((frame_timestamp(5, fps, 1.0) - 0.5).abs() < 1e-12);
    assert!((frame_timestamp(10, fps, 1.0) - 0.999).abs() < 1e-12);
    assert_eq!(frame_timestamp(3, fps, 0.0), 0.0);
}

#[test]
fn full_cycle_is_accepted() {
    let mut j = job();
    for s in [
        Seeking,
        AwaitingDecode,
        Rendering,
        Pacing,
        Seeking,
        AwaitingDecode,
        Rendering,
        Pacing,
        Finalizing,
        Done,
    ] {
        j.transition(s).unwrap();
    }
    assert_eq!(j.state(), Done);
}

#[test]
fn skipping_steps_is_rejected() {
    let mut j = job();
    assert!(j.transition(Rendering).is_err());
    j.transition(Seeking).unwrap();
    assert!(j.transition(Pacing).is_err());
    assert_eq!(j.state(), Seeking);
}

#[test]
fn failure_and_cancel_are_terminal() {
    for end in [Failed, Cancelled] {
        let mut j = job();
        j.transition(Seeking).unwrap();
        j.transition(end).unwrap();
        assert!(j.state().is_terminal());
        assert!(j.transition(Seeking).is_err());
        assert!(j.transition(Failed).is_err());
    }
    assert!(Idle.can_transition_to(Cancelled));
    assert!(!Done.can_transition_to(Failed));
}
