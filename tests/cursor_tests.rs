// Host-side tests for the inverting cursor follower, the magnetic button
// offset and the region registry they query.

use fx_core::constants::*;
use fx_core::cursor::{inversion_visible, magnetic_offset, translate_css, InvertConfig, InvertFollower};
use fx_core::parse_config;
use fx_core::regions::{Rect, RegionId, RegionKind, RegionRegistry};
use glam::Vec2;

fn registry_with(kinds: &[(RegionKind, Rect)]) -> RegionRegistry {
    let mut reg = RegionRegistry::new();
    for (kind, rect) in kinds {
        let id = reg.register(*kind);
        assert!(reg.update_rect(id, *rect));
    }
    reg
}

#[test]
fn follower_hidden_until_first_move() {
    let regions = RegionRegistry::new();
    let mut f = InvertFollower::new(InvertConfig::default());
    assert!(f.step(&regions).is_none());
    f.pointer_enter();
    assert!(f.step(&regions).is_none());
    assert!(!f.is_in_window());
}

#[test]
fn first_move_snaps_without_easing() {
    let regions = RegionRegistry::new();
    let mut f = InvertFollower::new(InvertConfig::default());
    let p = Vec2::new(300.0, 200.0);
    f.pointer_move(p);
    let frame = f.step(&regions).unwrap();
    assert_eq!(frame.position, p);
    assert_eq!(frame.scale, 1.0);
    assert!(!frame.visible);
}

#[test]
fn later_moves_are_eased() {
    let regions = RegionRegistry::new();
    let mut f = InvertFollower::new(InvertConfig::default());
    f.pointer_move(Vec2::ZERO);
    f.step(&regions);
    f.pointer_move(Vec2::new(100.0, 0.0));
    let frame = f.step(&regions).unwrap();
    assert!((frame.position.x - 100.0 * INVERT_LERP).abs() < 1e-4);
    assert!(frame.scale > 1.0);
}

#[test]
fn visible_only_inside_invert_zones() {
    let regions = registry_with(&[(RegionKind::Invert, Rect::new(0.0, 0.0, 200.0, 200.0))]);
    let mut f = InvertFollower::new(InvertConfig::default());
    f.pointer_move(Vec2::new(50.0, 50.0));
    assert!(f.step(&regions).unwrap().visible);
    f.pointer_move(Vec2::new(250.0, 50.0));
    assert!(!f.step(&regions).unwrap().visible);
}

#[test]
fn block_zone_registered_later_hides_follower() {
    let regions = registry_with(&[
        (RegionKind::Invert, Rect::new(0.0, 0.0, 400.0, 400.0)),
        (RegionKind::Block, Rect::new(100.0, 100.0, 50.0, 50.0)),
    ]);
    assert!(inversion_visible(&regions, Vec2::new(10.0, 10.0)));
    assert!(!inversion_visible(&regions, Vec2::new(120.0, 120.0)));
    // Block alone never shows the follower.
    let only_block = registry_with(&[(RegionKind::Block, Rect::new(0.0, 0.0, 10.0, 10.0))]);
    assert!(!inversion_visible(&only_block, Vec2::new(5.0, 5.0)));
}

#[test]
fn topmost_zone_decides_visibility() {
    // An invert card nested in a blocked section, registered after it.
    let regions = registry_with(&[
        (RegionKind::Block, Rect::new(0.0, 0.0, 400.0, 400.0)),
        (RegionKind::Invert, Rect::new(100.0, 100.0, 50.0, 50.0)),
        (RegionKind::Hotspot, Rect::new(0.0, 0.0, 400.0, 400.0)),
    ]);
    assert!(inversion_visible(&regions, Vec2::new(120.0, 120.0)));
    assert!(!inversion_visible(&regions, Vec2::new(10.0, 10.0)));
    assert!(!inversion_visible(&regions, Vec2::new(500.0, 500.0)));

    let mut f = InvertFollower::new(InvertConfig::default());
    f.pointer_move(Vec2::new(120.0, 120.0));
    assert!(f.step(&regions).unwrap().visible);
}

#[test]
fn scale_is_bounded_by_max_scale() {
    let regions = RegionRegistry::new();
    let mut f = InvertFollower::new(InvertConfig::default());
    f.pointer_move(Vec2::ZERO);
    for k in 1..=200 {
        f.pointer_move(Vec2::new(k as f32 * 1000.0, 0.0));
        let frame = f.step(&regions).unwrap();
        assert!(frame.scale >= 1.0);
        assert!(frame.scale <= INVERT_MAX_SCALE + 1e-5);
    }
    assert_eq!(f.scale_target(1.0e6), INVERT_MAX_SCALE);
    assert_eq!(f.scale_target(0.0), 1.0);
}

#[test]
fn leaving_hides_and_reentry_snaps() {
    let regions = RegionRegistry::new();
    let mut f = InvertFollower::new(InvertConfig::default());
    f.pointer_move(Vec2::new(10.0, 10.0));
    f.step(&regions);
    f.pointer_leave();
    assert!(f.step(&regions).is_none());

    f.pointer_enter();
    let back = Vec2::new(700.0, 500.0);
    f.pointer_move(back);
    let frame = f.step(&regions).unwrap();
    assert_eq!(frame.position, back);
    // The jump across the window is not counted as speed.
    assert_eq!(frame.scale, 1.0);
}

#[test]
fn magnetic_pulls_toward_pointer() {
    let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    let offset = magnetic_offset(rect, Vec2::new(75.0, 25.0), MAGNETIC_STRENGTH);
    assert!((offset - Vec2::new(7.5, 0.0)).length() < 1e-5);
    assert_eq!(magnetic_offset(rect, rect.center(), MAGNETIC_STRENGTH), Vec2::ZERO);
}

#[test]
fn magnetic_outside_or_degenerate_is_zero() {
    let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    assert_eq!(magnetic_offset(rect, Vec2::new(150.0, 25.0), 0.3), Vec2::ZERO);
    assert_eq!(magnetic_offset(rect, Vec2::new(100.0, 25.0), 0.3), Vec2::ZERO);
    assert_eq!(magnetic_offset(Rect::new(0.0, 0.0, 0.0, 50.0), Vec2::ZERO, 0.3), Vec2::ZERO);
    assert_eq!(magnetic_offset(rect, Vec2::new(75.0, 25.0), f32::NAN), Vec2::ZERO);
}

#[test]
fn translate_css_format() {
    assert_eq!(translate_css(Vec2::new(7.5, 0.0)), "translate(7.5px, 0px)");
    assert_eq!(translate_css(Vec2::new(-3.0, 2.25)), "translate(-3px, 2.25px)");
}

#[test]
fn invert_config_validation() {
    let cfg: InvertConfig = parse_config(Some(r#"{"baseSize": 120, "maxScale": 2}"#)).unwrap();
    assert_eq!(cfg.base_size, 120.0);
    assert_eq!(cfg.max_scale, 2.0);
    assert_eq!(cfg.lerp, INVERT_LERP);
    assert!(parse_config::<InvertConfig>(Some(r#"{"maxScale": 0.5}"#)).is_err());
    assert!(parse_config::<InvertConfig>(Some(r#"{"lerp": 0}"#)).is_err());
    assert!(parse_config::<InvertConfig>(Some(r#"{"baseSize": -1}"#)).is_err());
}

#[test]
fn rect_containment_is_half_open() {
    let r = Rect::new(10.0, 20.0, 30.0, 40.0);
    assert!(r.contains(Vec2::new(10.0, 20.0)));
    assert!(r.contains(Vec2::new(39.9, 59.9)));
    assert!(!r.contains(Vec2::new(40.0, 30.0)));
    assert!(!r.contains(Vec2::new(20.0, 60.0)));
    assert_eq!(r.center(), Vec2::new(25.0, 40.0));
    assert!(Rect::default().is_empty());
}

#[test]
fn registry_lifecycle() {
    let mut reg = RegionRegistry::new();
    assert!(reg.is_empty());
    let id = reg.register(RegionKind::Hotspot);
    // Unsized regions match nothing.
    assert!(!reg.contains_kind(Vec2::ZERO, RegionKind::Hotspot));
    assert!(reg.update_rect(id, Rect::new(-5.0, -5.0, 10.0, 10.0)));
    assert!(reg.contains_kind(Vec2::ZERO, RegionKind::Hotspot));
    assert!(!reg.contains_kind(Vec2::ZERO, RegionKind::Invert));
    assert_eq!(reg.len(), 1);

    assert!(reg.unregister(id));
    assert!(!reg.unregister(id));
    assert!(!reg.update_rect(id, Rect::new(0.0, 0.0, 1.0, 1.0)));
    assert!(!reg.contains_kind(Vec2::ZERO, RegionKind::Hotspot));
}

#[test]
fn ids_are_unique_and_kinds_ordered_by_registration() {
    let mut reg = RegionRegistry::new();
    let all = Rect::new(0.0, 0.0, 100.0, 100.0);
    let a = reg.register(RegionKind::Block);
    let b = reg.register(RegionKind::Invert);
    let c = reg.register(RegionKind::Hotspot);
    assert!(a != b && b != c && a != c);
    for id in [c, a, b] {
        reg.update_rect(id, all);
    }
    assert_eq!(
        reg.kinds_at(Vec2::splat(50.0)),
        vec![RegionKind::Block, RegionKind::Invert, RegionKind::Hotspot]
    );
    assert!(reg.kinds_at(Vec2::splat(150.0)).is_empty());
    let mut ids: Vec<RegionId> = reg.ids().collect();
    ids.sort();
    assert_eq!(ids, vec![a, b, c]);

    reg.clear();
    assert!(reg.is_empty());
    let d = reg.register(RegionKind::Invert);
    assert!(d > c);
}

#[test]
fn region_kind_parse() {
    assert_eq!(RegionKind::parse("invert"), Some(RegionKind::Invert));
    assert_eq!(RegionKind::parse(" Block "), Some(RegionKind::Block));
    assert_eq!(RegionKind::parse("blocked"), Some(RegionKind::Block));
    assert_eq!(RegionKind::parse("HOTSPOT"), Some(RegionKind::Hotspot));
    assert_eq!(RegionKind::parse("glow"), None);
}
