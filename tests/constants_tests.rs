// Host-side tests for constants and their mathematical relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;
use fx_core::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn easing_factors_are_in_unit_interval() {
    for f in [
        HERO_SPOTLIGHT_EASE,
        HERO_CURSOR_EASE,
        TRAIL_CURSOR_LERP,
        TRAIL_FOLLOW_LERP,
        FLUID_CURSOR_LERP,
        GALLERY_SCROLL_EASE,
        INVERT_LERP,
        INVERT_SCALE_LERP,
        SCROLL_LERP,
    ] {
        assert!(f > 0.0 && f <= 1.0, "lerp factor {f} out of range");
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn decays_stay_below_one() {
    // Anything at or above one never settles.
    assert!(TRAIL_DAMPING < 1.0);
    assert!(FLUID_DISSIPATION < 1.0);
    assert!(ECHO_DECAY > 0.0 && ECHO_DECAY < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn gallery_planes_do_not_overlap() {
    assert!(GALLERY_PLANE_WIDTH < GALLERY_SPACING);
    assert!(GALLERY_LABEL_Y.abs() > GALLERY_PLANE_HEIGHT * 0.5);
    assert!(GALLERY_HIT_RADIUS > 0.0 && GALLERY_HIT_RADIUS < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn echo_sizes_fit_inside_the_spotlight() {
    assert!(ECHO_SIZE_MIN > 0.0);
    assert!(ECHO_SIZE_MIN + ECHO_SIZE_JITTER <= 1.0);
    assert!(ECHO_OPACITY <= 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn fluid_defaults_are_usable() {
    assert!(FLUID_SIM_RESOLUTION >= 8);
    assert!(FLUID_PRESSURE_ITERATIONS >= 1);
    assert!(FLUID_MAX_DT > 0.0 && FLUID_MAX_DT < 0.1);
    assert!(FLUID_SPLAT_RADIUS > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn invert_scale_range() {
    assert!(INVERT_MAX_SCALE >= 1.0);
    assert!(INVERT_BASE_SIZE > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn dpr_caps_are_at_least_one() {
    assert!(CANVAS_DPR_CAP >= 1.0);
    assert!(GPU_DPR_CAP >= 1.0);
    assert!(LABEL_DPR_CAP >= CANVAS_DPR_CAP);
}

#[test]
fn hero_vars_are_custom_properties() {
    for name in HERO_VARS {
        assert!(name.starts_with("--"), "{name} is not a custom property");
    }
    let mut sorted = HERO_VARS.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), HERO_VARS.len());
    assert!(HERO_VARS.contains(&HERO_VAR_SPOT_OPACITY));
}

#[test]
fn parallax_selector_matches_attribute() {
    assert_eq!(PARALLAX_SELECTOR, format!("[{PARALLAX_ATTR}]"));
}

#[test]
fn placeholder_is_transparent() {
    assert_eq!(PLACEHOLDER_RGBA[3], 0);
    assert!(GALLERY_MAX_TEXTURE_PX.is_power_of_two());
}
