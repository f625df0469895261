//! Scalar and vector easing helpers reused by every simulation.

use glam::Vec2;

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One exponential easing step: `current += (target - current) * factor`.
///
/// For `factor` in (0, 1] the result never overshoots `target`.
#[inline]
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

#[inline]
pub fn approach_vec2(current: Vec2, target: Vec2, factor: f32) -> Vec2 {
    current + (target - current) * factor
}

/// `1 - dist / radius` inside the radius, zero outside or when `radius <= 0`.
#[inline]
pub fn falloff_linear(dist: f32, radius: f32) -> f32 {
    if radius <= 0.0 || dist >= radius {
        return 0.0;
    }
    (1.0 - dist / radius).max(0.0)
}

/// Cubic-eased radial falloff `(1 - dist / radius)^3`.
#[inline]
pub fn falloff_cubic(dist: f32, radius: f32) -> f32 {
    let f = falloff_linear(dist, radius);
    f * f * f
}

#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Clamp a frame delta so a backgrounded tab does not inject one huge step.
#[inline]
pub fn clamp_dt(dt_sec: f32, max_sec: f32) -> f32 {
    if dt_sec.is_finite() {
        dt_sec.clamp(0.0, max_sec)
    } else {
        0.0
    }
}

/// A 2-D position that exponentially approaches a target once per frame.
#[derive(Clone, Copy, Debug)]
pub struct Follower {
    pub position: Vec2,
    pub factor: f32,
}

impl Follower {
    pub fn new(position: Vec2, factor: f32) -> Self {
        Self { position, factor }
    }

    /// Advance one frame toward `target` and return the new position.
    pub fn step(&mut self, target: Vec2) -> Vec2 {
        self.position = approach_vec2(self.position, target, self.factor);
        self.position
    }

    pub fn snap(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn lag(&self, target: Vec2) -> f32 {
        self.position.distance(target)
    }
}

/// Eased scroll offset with externally driven target.
///
/// `velocity` is computed from `current - last` before `last` is updated.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScrollState {
    pub current: f32,
    pub target: f32,
    pub last: f32,
}

impl ScrollState {
    pub fn step(&mut self, ease: f32) -> f32 {
        self.current = approach(self.current, self.target, ease);
        let velocity = self.current - self.last;
        self.last = self.current;
        velocity
    }

    pub fn snap(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.last = value;
    }
}
