// Browser-side constants: pixel-ratio caps, attribute names and the CSS
// strings effects write onto host elements. Simulation tuning lives in
// `fx_core::constants`.

// Backing-store pixel ratio caps
pub const CANVAS_DPR_CAP: f64 = 2.0;
pub const LABEL_DPR_CAP: f64 = 3.0;
pub const GPU_DPR_CAP: f64 = 2.0;

// Overlay canvas styling for effects that create their own surface
pub const OVERLAY_CANVAS_CSS: &str = "position:absolute;inset:0;width:100%;height:100%;pointer-events:none;";
pub const GALLERY_CANVAS_CSS: &str = "display:block;width:100%;height:100%;touch-action:pan-y;";

// Gallery cursor styles
pub const CURSOR_GRAB: &str = "grab";
pub const CURSOR_GRABBING: &str = "grabbing";

// Magnetic button
pub const MAGNETIC_TRANSITION: &str = "transform 0.3s ease-out";
pub const MAGNETIC_RESET: &str = "translate(0px, 0px)";

// Parallax attribute read by the smooth-scroll context
pub const PARALLAX_ATTR: &str = "data-parallax";
pub const PARALLAX_SELECTOR: &str = "[data-parallax]";

// Trail colors (black on light backgrounds)
pub const TRAIL_RGB: [u8; 3] = [0, 0, 0];
pub const TRAIL_RING_ALPHA: f32 = 0.2;
pub const TRAIL_RING_WIDTH: f64 = 1.5;
pub const TRAIL_DOT_ALPHA: f32 = 0.7;
pub const TRAIL_RIBBON_HEAD_ALPHA: f32 = 0.15;

// Hero echoes
pub const ECHO_FILTER: &str = "saturate(1.4) contrast(1.1) brightness(1.05)";

// Gallery placeholder texel (transparent) and the longest texture side
pub const PLACEHOLDER_RGBA: [u8; 4] = [0, 0, 0, 0];
pub const GALLERY_MAX_TEXTURE_PX: u32 = 2048;

// Custom properties the hero spotlight writes onto its host element
pub const HERO_VAR_SPOT_X: &str = "--hero-spot-x";
pub const HERO_VAR_SPOT_Y: &str = "--hero-spot-y";
pub const HERO_VAR_SPOT_OPACITY: &str = "--hero-spot-opacity";
pub const HERO_VAR_CURSOR_X: &str = "--hero-cursor-x";
pub const HERO_VAR_CURSOR_Y: &str = "--hero-cursor-y";
pub const HERO_VAR_CURSOR_OPACITY: &str = "--hero-cursor-opacity";
pub const HERO_VAR_IMAGE_TRANSFORM: &str = "--hero-image-transform";
pub const HERO_VARS: [&str; 7] = [
    HERO_VAR_SPOT_X,
    HERO_VAR_SPOT_Y,
    HERO_VAR_SPOT_OPACITY,
    HERO_VAR_CURSOR_X,
    HERO_VAR_CURSOR_Y,
    HERO_VAR_CURSOR_OPACITY,
    HERO_VAR_IMAGE_TRANSFORM,
];
