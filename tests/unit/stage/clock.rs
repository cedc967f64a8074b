use super::*;

#[test]
fn first_tick_is_zero_then_deltas_follow_timestamps() {
    let mut clock = FrameClock::new(Fps::default(), 100.0);
    assert_eq!(clock.tick(1_000.0), 0.0);
    assert_eq!(clock.tick(1_016.0), 16.0);
    assert_eq!(clock.tick(1_050.0), 34.0);
}

#[test]
fn gaps_are_clamped_and_time_never_runs_backwards() {
    let mut clock = FrameClock::new(Fps::default(), 100.0);
    clock.tick(0.0);
    assert_eq!(clock.tick(5_000.0), 100.0);
    assert_eq!(clock.tick(4_000.0), 0.0);
    assert_eq!(clock.tick(4_010.0), 10.0);
    assert_eq!(clock.tick(f64::NAN), 0.0);
    assert_eq!(clock.tick(4_020.0), 10.0);
}

#[test]
fn reset_restarts_from_zero() {
    let mut clock = FrameClock::new(Fps::default(), 100.0);
    clock.tick(0.0);
    clock.reset();
    assert_eq!(clock.tick(50.0), 0.0);
}

#[test]
fn fixed_step_follows_the_frame_rate() {
    let clock = FrameClock::new(Fps::new(50, 1).unwrap(), 100.0);
    assert_eq!(clock.fixed_step_ms(), 20.0);
    assert_eq!(clock.clamp(-3.0), 0.0);
    assert_eq!(clock.clamp(f64::INFINITY), 0.0);
}

#[test]
fn counts_frames() {
    let mut clock = FrameClock::new(Fps::default(), 100.0);
    assert_eq!(clock.frames(), 0);
    assert_eq!(clock.count_frame(), 1);
    assert_eq!(clock.count_frame(), 2);
    assert_eq!(clock.frames(), 2);
}
