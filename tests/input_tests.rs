// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn client_to_local_subtracts_rect_origin() {
    let local = client_to_local(Vec2::new(150.0, 80.0), 100.0, 20.0);
    assert_eq!(local, Vec2::new(50.0, 60.0));
}

#[test]
fn client_to_uv_is_top_left_origin() {
    // 400x200 element at (100, 50)
    let uv = client_to_uv(Vec2::new(200.0, 100.0), 100.0, 50.0, 400.0, 200.0);
    assert!((uv.x - 0.25).abs() < 1e-6);
    assert!((uv.y - 0.25).abs() < 1e-6);

    let corner = client_to_uv(Vec2::new(500.0, 250.0), 100.0, 50.0, 400.0, 200.0);
    assert_eq!(corner, Vec2::new(1.0, 1.0));
}

#[test]
fn client_to_uv_clamps_outside_points() {
    let uv = client_to_uv(Vec2::new(-50.0, 900.0), 0.0, 0.0, 100.0, 100.0);
    assert_eq!(uv, Vec2::new(0.0, 1.0));
}

#[test]
fn client_to_uv_empty_surface_is_center() {
    assert_eq!(
        client_to_uv(Vec2::new(10.0, 10.0), 0.0, 0.0, 0.0, 100.0),
        Vec2::splat(0.5)
    );
    assert_eq!(
        client_to_uv(Vec2::new(10.0, 10.0), 0.0, 0.0, 100.0, -1.0),
        Vec2::splat(0.5)
    );
}

#[test]
fn backing_size_scales_and_rounds() {
    assert_eq!(backing_size(800.0, 600.0, 2.0), (1600, 1200));
    assert_eq!(backing_size(100.3, 50.0, 1.5), (150, 75));
}

#[test]
fn backing_size_never_zero() {
    assert_eq!(backing_size(0.0, 0.0, 2.0), (1, 1));
    assert_eq!(backing_size(-10.0, 5.0, 1.0), (1, 5));
}

#[test]
fn parallax_speed_parsing() {
    assert_eq!(parse_parallax_speed(Some("0.2")), 0.2);
    assert_eq!(parse_parallax_speed(Some("  -0.5 ")), -0.5);
    assert_eq!(parse_parallax_speed(Some("fast")), 0.0);
    assert_eq!(parse_parallax_speed(Some("NaN")), 0.0);
    assert_eq!(parse_parallax_speed(Some("inf")), 0.0);
    assert_eq!(parse_parallax_speed(None), 0.0);
}

#[test]
fn cover_crop_wide_image_into_square() {
    // 2:1 image filling a square keeps the full height and the middle half.
    let [sx, sy, sw, sh] = cover_crop(Vec2::new(2000.0, 1000.0), Vec2::new(100.0, 100.0)).unwrap();
    assert!((sx - 500.0).abs() < 1e-3);
    assert!(sy.abs() < 1e-3);
    assert!((sw - 1000.0).abs() < 1e-3);
    assert!((sh - 1000.0).abs() < 1e-3);
}

#[test]
fn cover_crop_tall_image_into_wide_dest() {
    let [sx, sy, sw, sh] = cover_crop(Vec2::new(600.0, 1200.0), Vec2::new(300.0, 150.0)).unwrap();
    assert!(sx.abs() < 1e-3);
    assert!((sw - 600.0).abs() < 1e-3);
    assert!((sh - 300.0).abs() < 1e-3);
    assert!((sy - 450.0).abs() < 1e-3);
}

#[test]
fn cover_crop_preserves_dest_aspect() {
    let dest = Vec2::new(180.0, 240.0);
    let [_, _, sw, sh] = cover_crop(Vec2::new(1920.0, 1080.0), dest).unwrap();
    assert!((sw / sh - dest.x / dest.y).abs() < 1e-4);
}

#[test]
fn cover_crop_rejects_empty_sizes() {
    assert!(cover_crop(Vec2::ZERO, Vec2::new(10.0, 10.0)).is_none());
    assert!(cover_crop(Vec2::new(10.0, 10.0), Vec2::new(0.0, 10.0)).is_none());
}
