// Host-side tests for easing, pointer sampling, the lifecycle flag and the
// trigger-once count-up.

use fx_core::easing::*;
use fx_core::trigger::{format_count, CountUp, TriggerOnce, TriggerState};
use fx_core::{Lifecycle, PointerState};
use glam::Vec2;

#[test]
fn approach_converges_without_overshoot() {
    for f in [0.05f32, 0.12, 0.5, 0.99] {
        let target = 100.0;
        let mut pos = -40.0f32;
        let initial = (target - pos).abs();
        let mut prev = initial;
        for _ in 0..2000 {
            pos = approach(pos, target, f);
            let gap = (target - pos).abs();
            if prev > 1e-2 {
                assert!(gap < prev, "gap did not shrink at factor {f}");
            } else {
                assert!(gap <= prev);
            }
            assert!(gap <= initial);
            assert!(pos <= target, "overshoot at factor {f}");
            prev = gap;
        }
        assert!(prev < 1e-3, "factor {f} stalled at {prev}");
    }
}

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
    assert_eq!(lerp(2.0, 6.0, 0.25), 3.0);
}

#[test]
fn follower_steps_and_snaps() {
    let mut f = Follower::new(Vec2::ZERO, 0.5);
    assert_eq!(f.step(Vec2::new(10.0, -4.0)), Vec2::new(5.0, -2.0));
    assert!((f.lag(Vec2::new(10.0, -4.0)) - Vec2::new(5.0, -2.0).length()).abs() < 1e-5);
    f.snap(Vec2::new(1.0, 1.0));
    assert_eq!(f.position, Vec2::new(1.0, 1.0));
    assert_eq!(f.lag(Vec2::new(1.0, 1.0)), 0.0);
}

#[test]
fn radial_falloffs() {
    assert_eq!(falloff_linear(0.0, 100.0), 1.0);
    assert_eq!(falloff_linear(100.0, 100.0), 0.0);
    assert_eq!(falloff_linear(150.0, 100.0), 0.0);
    assert_eq!(falloff_linear(10.0, 0.0), 0.0);
    assert!((falloff_cubic(50.0, 100.0) - 0.125).abs() < 1e-6);
    assert_eq!(falloff_cubic(0.0, 0.0), 0.0);
}

#[test]
fn smoothstep_shape() {
    assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
    assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
    assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
    // Degenerate edges become a step.
    assert_eq!(smoothstep(0.3, 0.3, 0.2), 0.0);
    assert_eq!(smoothstep(0.3, 0.3, 0.3), 1.0);
}

#[test]
fn ease_out_cubic_endpoints() {
    assert_eq!(ease_out_cubic(0.0), 0.0);
    assert_eq!(ease_out_cubic(1.0), 1.0);
    assert_eq!(ease_out_cubic(0.5), 0.875);
    assert_eq!(ease_out_cubic(3.0), 1.0);
}

#[test]
fn clamp_dt_rejects_spikes_and_nan() {
    assert_eq!(clamp_dt(0.016, 0.033), 0.016);
    assert_eq!(clamp_dt(1.5, 0.033), 0.033);
    assert_eq!(clamp_dt(-0.1, 0.033), 0.0);
    assert_eq!(clamp_dt(f32::NAN, 0.033), 0.0);
    assert_eq!(clamp_dt(f32::INFINITY, 0.033), 0.0);
}

#[test]
fn scroll_state_velocity_uses_previous_current() {
    let mut s = ScrollState::default();
    s.target = 10.0;
    assert_eq!(s.step(0.5), 5.0);
    assert_eq!(s.step(0.5), 2.5);
    assert_eq!(s.last, s.current);

    s.snap(3.0);
    assert_eq!(s.step(0.5), 0.0);
}

#[test]
fn pointer_speed_is_distance_between_samples() {
    let mut p = PointerState::new(Vec2::new(100.0, 100.0));
    assert!(!p.has_moved());
    assert_eq!(p.sample().speed, 0.0);

    p.move_to(Vec2::new(103.0, 104.0));
    let s = p.sample();
    assert!(p.has_moved());
    assert_eq!(s.delta, Vec2::new(3.0, 4.0));
    assert_eq!(s.speed, 5.0);

    // No new event: the next frame sees no motion.
    assert_eq!(p.sample().speed, 0.0);
}

#[test]
fn pointer_rebase_drops_the_jump() {
    let mut p = PointerState::new(Vec2::ZERO);
    p.rebase(Vec2::new(500.0, 300.0));
    let s = p.sample();
    assert_eq!(s.position, Vec2::new(500.0, 300.0));
    assert_eq!(s.speed, 0.0);
}

#[test]
fn lifecycle_dispose_is_idempotent() {
    let l = Lifecycle::new();
    assert!(l.begin_frame());
    assert!(l.begin_frame());
    assert_eq!(l.frames(), 2);

    assert!(l.dispose());
    assert!(!l.dispose());
    assert!(l.is_disposed());
    assert!(!l.begin_frame());
    assert_eq!(l.frames(), 2);
}

#[test]
fn trigger_fires_once_at_threshold() {
    let mut t = TriggerOnce::new(0.3);
    assert!(!t.observe(true, 0.1));
    assert!(!t.observe(false, 0.9));
    assert_eq!(t.state(), TriggerState::Idle);

    assert!(t.observe(true, 0.3));
    assert_eq!(t.state(), TriggerState::Triggered);
    assert!(!t.observe(true, 1.0));

    t.complete();
    assert_eq!(t.state(), TriggerState::Complete);
    assert!(!t.observe(true, 1.0));
    assert_eq!(t.state(), TriggerState::Complete);
}

#[test]
fn complete_before_trigger_is_ignored() {
    let mut t = TriggerOnce::default();
    t.complete();
    assert_eq!(t.state(), TriggerState::Idle);
}

#[test]
fn count_up_eases_to_end() {
    let mut c = CountUp::new(100.0, None);
    assert_eq!(c.duration_ms, 2000.0);
    assert!(!c.is_started());
    assert_eq!(c.value_at(5000.0), 0);

    c.start(1000.0);
    // A later start keeps the first timestamp.
    c.start(1500.0);
    assert_eq!(c.value_at(1000.0), 0);
    assert_eq!(c.value_at(2000.0), 88);
    assert!(!c.is_done(2999.0));
    assert_eq!(c.value_at(3000.0), 100);
    assert!(c.is_done(3000.0));
    assert_eq!(c.value_at(10_000.0), 100);
}

#[test]
fn count_up_is_monotonic() {
    let mut c = CountUp::new(250.0, Some(800.0));
    c.start(0.0);
    let mut last = 0;
    for t in (0..=900).step_by(16) {
        let v = c.value_at(t as f64);
        assert!(v >= last);
        last = v;
    }
    assert_eq!(last, 250);
}

#[test]
fn count_up_rejects_bad_duration() {
    assert_eq!(CountUp::new(5.0, Some(0.0)).duration_ms, 2000.0);
    assert_eq!(CountUp::new(5.0, Some(-10.0)).duration_ms, 2000.0);
    assert_eq!(CountUp::new(5.0, Some(f64::NAN)).duration_ms, 2000.0);
}

#[test]
fn count_formatting_appends_suffix() {
    assert_eq!(format_count(42, "+"), "42+");
    assert_eq!(format_count(7, ""), "7");
}
