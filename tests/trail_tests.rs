// Host-side tests for the cursor particle trail.

use fx_core::constants::*;
use fx_core::parse_config;
use fx_core::trail::{CursorTrail, Particle, TrailConfig};
use fx_core::PointerState;
use glam::Vec2;

fn seeded(seed: u64) -> TrailConfig {
    TrailConfig {
        seed: Some(seed),
        ..Default::default()
    }
}

#[test]
fn particle_velocity_decays_geometrically() {
    let d = 0.92f32;
    let mut p = Particle::at_rest(Vec2::ZERO);
    p.velocity = Vec2::new(10.0, 0.0);
    for k in 1..=30 {
        p.integrate(Vec2::ZERO, 0.0, d);
        let expected = 10.0 * d.powi(k);
        assert!(
            (p.velocity.length() - expected).abs() < 1e-3,
            "frame {k}: {} vs {expected}",
            p.velocity.length()
        );
    }
}

#[test]
fn displaced_particle_returns_to_origin() {
    let origin = Vec2::new(200.0, 150.0);
    let mut p = Particle::at_rest(origin);
    p.position = origin + Vec2::new(40.0, -25.0);
    for _ in 0..1000 {
        p.integrate(Vec2::ZERO, TRAIL_RETURN_FORCE, TRAIL_DAMPING);
    }
    assert!(p.position.distance(origin) < 1e-2);
    assert!(p.velocity.length() < 1e-3);
    assert!(!p.is_visible());
}

#[test]
fn particle_life_tracks_displacement() {
    let mut p = Particle::at_rest(Vec2::ZERO);
    p.integrate(Vec2::new(10.0, 0.0), 0.0, 1.0);
    assert!((p.life - 0.5).abs() < 1e-6);
    assert!(p.is_visible());
    assert!((p.alpha() - 0.2).abs() < 1e-6);
    assert!((p.radius() - 2.5).abs() < 1e-6);

    p.integrate(Vec2::new(30.0, 0.0), 0.0, 1.0);
    assert_eq!(p.life, 1.0);
}

#[test]
fn stationary_pointer_leaves_particles_at_rest() {
    let mut trail = CursorTrail::new(seeded(1), 800.0, 600.0);
    let mut pointer = PointerState::new(Vec2::new(400.0, 300.0));
    // Two seconds at 60 fps.
    for _ in 0..120 {
        trail.step(pointer.sample());
        assert_eq!(trail.impulses_applied(), 0);
    }
    for p in trail.particles() {
        assert!(p.life < TRAIL_MIN_VISIBLE_LIFE);
        assert_eq!(p.position, p.origin);
    }
    assert_eq!(trail.ring_size(), TRAIL_RING_SIZE);
}

#[test]
fn fast_swipe_pushes_particles_in_radius() {
    // Every particle of a 100x100 surface is inside the splat radius.
    let mut trail = CursorTrail::new(seeded(2), 100.0, 100.0);
    let mut pointer = PointerState::new(Vec2::new(50.0, 50.0));
    pointer.move_to(Vec2::new(90.0, 50.0));
    trail.step(pointer.sample());
    assert_eq!(trail.speed(), 40.0);
    assert_eq!(trail.impulses_applied(), TRAIL_PARTICLE_COUNT);
    assert!(trail.particles().iter().any(|p| p.is_visible()));
}

#[test]
fn slow_motion_does_not_splat() {
    let mut trail = CursorTrail::new(seeded(3), 100.0, 100.0);
    let mut pointer = PointerState::new(Vec2::new(50.0, 50.0));
    pointer.move_to(Vec2::new(50.5, 50.0));
    trail.step(pointer.sample());
    assert_eq!(trail.impulses_applied(), 0);
}

#[test]
fn particles_outside_radius_are_untouched() {
    let cfg = TrailConfig {
        splat_radius: 1.0,
        ..seeded(4)
    };
    let mut trail = CursorTrail::new(cfg, 2000.0, 2000.0);
    let mut pointer = PointerState::new(Vec2::new(1000.0, 1000.0));
    pointer.move_to(Vec2::new(1100.0, 1000.0));
    trail.step(pointer.sample());
    for p in trail.particles() {
        if p.origin.distance(trail.cursor()) >= 1.0 {
            assert_eq!(p.position, p.origin);
        }
    }
}

#[test]
fn same_seed_same_origins() {
    let a = CursorTrail::new(seeded(42), 800.0, 600.0);
    let b = CursorTrail::new(seeded(42), 800.0, 600.0);
    let oa: Vec<Vec2> = a.particles().iter().map(|p| p.origin).collect();
    let ob: Vec<Vec2> = b.particles().iter().map(|p| p.origin).collect();
    assert_eq!(oa, ob);
    assert!(oa
        .iter()
        .all(|o| (0.0..=800.0).contains(&o.x) && (0.0..=600.0).contains(&o.y)));
}

#[test]
fn ribbon_needs_three_history_points() {
    let mut trail = CursorTrail::new(seeded(5), 800.0, 600.0);
    let mut pointer = PointerState::new(Vec2::new(400.0, 300.0));
    for i in 0..2 {
        pointer.move_to(Vec2::new(400.0 + i as f32 * 20.0, 300.0));
        trail.step(pointer.sample());
    }
    assert!(trail.ribbon().is_none());

    for i in 2..5 {
        pointer.move_to(Vec2::new(400.0 + i as f32 * 20.0, 300.0));
        trail.step(pointer.sample());
    }
    let ribbon = trail.ribbon().unwrap();
    assert_eq!(trail.history().len(), 5);
    assert_eq!(ribbon.curves.len(), 3);
    assert_eq!(ribbon.start, trail.history()[0].position);
    assert_eq!(ribbon.tail, trail.history()[4].position);
    assert!((1.0..=8.0).contains(&ribbon.width));
}

#[test]
fn history_is_capped() {
    let mut trail = CursorTrail::new(seeded(6), 800.0, 600.0);
    let mut pointer = PointerState::new(Vec2::ZERO);
    for i in 0..100 {
        pointer.move_to(Vec2::new(i as f32, i as f32));
        trail.step(pointer.sample());
    }
    assert_eq!(trail.history().len(), TRAIL_HISTORY_LEN);
}

#[test]
fn ring_grows_with_lag_up_to_half() {
    let mut trail = CursorTrail::new(seeded(7), 800.0, 600.0);
    let mut pointer = PointerState::new(Vec2::new(400.0, 300.0));
    pointer.move_to(Vec2::new(5000.0, 300.0));
    trail.step(pointer.sample());
    let ring = trail.ring_size();
    assert!(ring > TRAIL_RING_SIZE);
    assert!(ring <= TRAIL_RING_SIZE * 1.5 + 1e-3);
    assert!(trail.glow_radius() > 60.0);
}

#[test]
fn zero_area_surface_is_safe() {
    let mut trail = CursorTrail::new(seeded(8), 0.0, 0.0);
    let mut pointer = PointerState::new(Vec2::ZERO);
    pointer.move_to(Vec2::new(30.0, 0.0));
    trail.step(pointer.sample());
    assert!(trail.particles().iter().all(|p| p.position.is_finite()));
}

#[test]
fn config_damping_must_settle() {
    assert!(parse_config::<TrailConfig>(Some(r#"{"damping": 1.0}"#)).is_err());
    assert!(parse_config::<TrailConfig>(Some(r#"{"cursorLerp": 0}"#)).is_err());
    let cfg: TrailConfig = parse_config(Some(r#"{"particleCount": 10, "seed": 9}"#)).unwrap();
    assert_eq!(cfg.particle_count, 10);
    assert_eq!(cfg.seed, Some(9));
}

#[test]
fn resize_keeps_pool_followers_and_history() {
    let mut trail = CursorTrail::new(seeded(9), 800.0, 600.0);
    let mut pointer = PointerState::new(Vec2::new(400.0, 300.0));
    for i in 1..=6 {
        pointer.move_to(Vec2::new(400.0 + i as f32 * 25.0, 300.0));
        trail.step(pointer.sample());
    }
    let cursor = trail.cursor();
    let ring = trail.ring_center();
    let history: Vec<Vec2> = trail.history().iter().map(|p| p.position).collect();
    let before: Vec<Particle> = trail.particles().to_vec();

    trail.resize(400.0, 1200.0);

    assert_eq!(trail.particles().len(), before.len());
    assert_eq!(trail.cursor(), cursor);
    assert_eq!(trail.ring_center(), ring);
    let after: Vec<Vec2> = trail.history().iter().map(|p| p.position).collect();
    assert_eq!(after, history);
    assert!(trail.ribbon().is_some());
    assert_eq!(trail.size(), Vec2::new(400.0, 1200.0));
    for (old, new) in before.iter().zip(trail.particles()) {
        assert!((new.origin.x - old.origin.x * 0.5).abs() < 1e-3);
        assert!((new.origin.y - old.origin.y * 2.0).abs() < 1e-3);
        // Displacement from the origin survives, so life is unchanged.
        assert!(((new.position - new.origin) - (old.position - old.origin)).length() < 1e-3);
        assert_eq!(new.velocity, old.velocity);
    }
}

#[test]
fn resize_from_empty_surface_clamps_origins() {
    let mut trail = CursorTrail::new(seeded(10), 0.0, 0.0);
    trail.resize(300.0, 200.0);
    assert_eq!(trail.particles().len(), TRAIL_PARTICLE_COUNT);
    for p in trail.particles() {
        assert!((0.0..=300.0).contains(&p.origin.x) && (0.0..=200.0).contains(&p.origin.y));
    }
    trail.resize(f32::NAN, 10.0);
    assert_eq!(trail.size(), Vec2::new(300.0, 200.0));
}
