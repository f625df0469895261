// Shared tuning constants for every simulation in the effects engine.
//
// Values are per animation frame unless the name says otherwise. Pixel values
// are CSS pixels; fluid values are normalized [0, 1] pointer units.

// Wave grid
pub const WAVE_LINE_COUNT: usize = 20;
pub const WAVE_LINE_SEGMENTS: usize = 120;
pub const WAVE_LINE_WIDTH: f32 = 1.2;
pub const WAVE_LINE_OPACITY: f32 = 0.06;
pub const WAVE_AMPLITUDE: f32 = 14.0;
pub const WAVE_CURSOR_RADIUS: f32 = 300.0;
pub const WAVE_CURSOR_PUSH: f32 = 50.0;
pub const WAVE_PULSE_SPEED: f32 = 1.8;
pub const WAVE_PULSE_CYCLE: f32 = 4.0; // pulse center sweeps 4 widths per cycle
pub const WAVE_PULSE_HALF_WIDTH: f32 = 0.35; // fraction of surface width
pub const WAVE_PULSE_ALPHA: f32 = 0.15;
pub const WAVE_PULSE_EXTRA_WIDTH: f32 = 1.5;
pub const WAVE_TIME_STEP: f32 = 0.016;

// Cursor particle trail
pub const TRAIL_CURSOR_SIZE: f32 = 12.0;
pub const TRAIL_RING_SIZE: f32 = 50.0;
pub const TRAIL_PARTICLE_COUNT: usize = 80;
pub const TRAIL_RETURN_FORCE: f32 = 0.03;
pub const TRAIL_DAMPING: f32 = 0.92;
pub const TRAIL_CURSOR_LERP: f32 = 0.15;
pub const TRAIL_FOLLOW_LERP: f32 = 0.06;
pub const TRAIL_SPLAT_RADIUS: f32 = 120.0;
pub const TRAIL_SPLAT_FORCE: f32 = 0.4;
pub const TRAIL_MIN_SPLAT_SPEED: f32 = 1.0; // px per frame
pub const TRAIL_VELOCITY_COUPLING: f32 = 0.05;
pub const TRAIL_SPEED_MULTIPLIER: f32 = 0.1;
pub const TRAIL_SPEED_MULTIPLIER_MAX: f32 = 3.0;
pub const TRAIL_LIFE_DISPLACEMENT: f32 = 20.0; // px of displacement for full life
pub const TRAIL_HISTORY_LEN: usize = 40;
pub const TRAIL_MIN_VISIBLE_LIFE: f32 = 0.01;

// Hero spotlight echoes
pub const HERO_SPOTLIGHT_SIZE: f32 = 200.0;
pub const HERO_SPOTLIGHT_EASE: f32 = 0.12;
pub const HERO_CURSOR_EASE: f32 = 0.2;
pub const ECHO_VELOCITY_THRESHOLD: f32 = 8.0; // px per frame
pub const ECHO_DECAY: f32 = 0.02;
pub const ECHO_OPACITY: f32 = 0.35;
pub const ECHO_SIZE_MIN: f32 = 0.6; // fraction of spotlight size
pub const ECHO_SIZE_JITTER: f32 = 0.3;
pub const HERO_PARALLAX_STRENGTH: f32 = 14.0;
pub const HERO_PARALLAX_SCALE: f32 = 1.04;

// Fluid solver
pub const FLUID_SIM_RESOLUTION: u32 = 128;
pub const FLUID_PRESSURE_ITERATIONS: u32 = 20;
pub const FLUID_DISSIPATION: f32 = 0.97;
pub const FLUID_SPLAT_RADIUS: f32 = 0.001;
pub const FLUID_SPLAT_FORCE: f32 = 8000.0;
pub const FLUID_CURSOR_LERP: f32 = 0.12;
pub const FLUID_SPLAT_THRESHOLD: f32 = 0.00005; // normalized units per frame
pub const FLUID_MAX_DT: f32 = 0.033;

// Circular gallery
pub const GALLERY_SPACING: f32 = 2.4;
pub const GALLERY_PLANE_WIDTH: f32 = 1.8;
pub const GALLERY_PLANE_HEIGHT: f32 = 2.4;
pub const GALLERY_CURVATURE: f32 = 0.15;
pub const GALLERY_SCROLL_SPEED: f32 = 2.0;
pub const GALLERY_SCROLL_EASE: f32 = 0.05;
pub const GALLERY_DRAG_SENSITIVITY: f32 = 0.005;
pub const GALLERY_BORDER_RADIUS: f32 = 0.05;
pub const GALLERY_LABEL_HEIGHT: f32 = 0.3;
pub const GALLERY_LABEL_Y: f32 = -1.5;
pub const GALLERY_CLICK_JITTER_PX: f32 = 10.0;
pub const GALLERY_HIT_RADIUS: f32 = 0.3; // NDC units
pub const GALLERY_CAMERA_Z: f32 = 6.0;
pub const GALLERY_CAMERA_FOV_DEG: f32 = 45.0;
pub const GALLERY_LABEL_PAD_X: f32 = 40.0;
pub const GALLERY_LABEL_PAD_Y: f32 = 20.0;
pub const GALLERY_LABEL_LINE_HEIGHT: f32 = 1.6;
pub const GALLERY_LABEL_FALLBACK_HEIGHT: f32 = 48.0;

// Ambient cursor effects
pub const INVERT_BASE_SIZE: f32 = 160.0;
pub const INVERT_MAX_SCALE: f32 = 1.6;
pub const INVERT_LERP: f32 = 0.1;
pub const INVERT_SCALE_LERP: f32 = 0.08;
pub const INVERT_VELOCITY_SCALE: f32 = 0.015;
pub const MAGNETIC_STRENGTH: f32 = 0.3;

// Smooth scroll
pub const SCROLL_LERP: f32 = 0.08;
pub const SCROLL_WHEEL_MULTIPLIER: f32 = 0.8;

// Count-up
pub const COUNT_UP_DURATION_MS: f64 = 2000.0;
pub const COUNT_UP_VISIBILITY_THRESHOLD: f64 = 0.3;
