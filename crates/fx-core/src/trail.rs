//! Cursor particle pool and smoothed ribbon trail.

use std::collections::VecDeque;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use smallvec::SmallVec;

use crate::config::{check_decay, check_factor, check_non_negative, check_positive, Validate};
use crate::constants::*;
use crate::easing::{falloff_linear, Follower};
use crate::error::ConfigResult;
use crate::pointer::PointerSample;

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrailConfig {
    pub cursor_size: f32,
    pub trail_size: f32,
    pub particle_count: usize,
    pub return_force: f32,
    pub damping: f32,
    pub cursor_lerp: f32,
    pub trail_lerp: f32,
    pub splat_radius: f32,
    pub splat_force: f32,
    /// Fixed seed for particle origins; random when absent.
    pub seed: Option<u64>,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            cursor_size: TRAIL_CURSOR_SIZE,
            trail_size: TRAIL_RING_SIZE,
            particle_count: TRAIL_PARTICLE_COUNT,
            return_force: TRAIL_RETURN_FORCE,
            damping: TRAIL_DAMPING,
            cursor_lerp: TRAIL_CURSOR_LERP,
            trail_lerp: TRAIL_FOLLOW_LERP,
            splat_radius: TRAIL_SPLAT_RADIUS,
            splat_force: TRAIL_SPLAT_FORCE,
            seed: None,
        }
    }
}

impl Validate for TrailConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_positive("cursorSize", self.cursor_size)?;
        check_positive("trailSize", self.trail_size)?;
        check_non_negative("returnForce", self.return_force)?;
        // Damping must stay strictly below one or particles never settle.
        check_decay("damping", self.damping)?;
        check_factor("cursorLerp", self.cursor_lerp)?;
        check_factor("trailLerp", self.trail_lerp)?;
        check_non_negative("splatRadius", self.splat_radius)?;
        check_non_negative("splatForce", self.splat_force)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub origin: Vec2,
    pub life: f32,
}

impl Particle {
    pub fn at_rest(origin: Vec2) -> Self {
        Self {
            position: origin,
            velocity: Vec2::ZERO,
            origin,
            life: 0.0,
        }
    }

    /// Accumulate `impulse` plus the spring toward the origin, damp, then
    /// integrate. Life follows displacement from the origin.
    pub fn integrate(&mut self, impulse: Vec2, return_force: f32, damping: f32) {
        self.velocity += impulse;
        self.velocity += (self.origin - self.position) * return_force;
        self.velocity *= damping;
        self.position += self.velocity;
        self.life = (self.position.distance(self.origin) / TRAIL_LIFE_DISPLACEMENT).min(1.0);
    }

    pub fn is_visible(&self) -> bool {
        self.life >= TRAIL_MIN_VISIBLE_LIFE
    }

    pub fn alpha(&self) -> f32 {
        self.life * 0.4
    }

    pub fn radius(&self) -> f32 {
        1.5 + self.life * 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    pub position: Vec2,
    pub speed: f32,
}

/// Ribbon through the trail history: starts at the head, then one quadratic
/// segment per interior point ending at the midpoint to the next one.
#[derive(Clone, Debug)]
pub struct Ribbon {
    pub start: Vec2,
    pub tail: Vec2,
    /// `(control, end)` pairs.
    pub curves: SmallVec<[(Vec2, Vec2); 64]>,
    pub width: f32,
}

pub struct CursorTrail {
    cfg: TrailConfig,
    particles: Vec<Particle>,
    cursor: Follower,
    trail: Follower,
    pointer: Vec2,
    size: Vec2,
    history: VecDeque<TrailPoint>,
    speed: f32,
    impulses: usize,
}

impl CursorTrail {
    pub fn new(cfg: TrailConfig, width: f32, height: f32) -> Self {
        let mut rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let w = width.max(0.0);
        let h = height.max(0.0);
        let particles = (0..cfg.particle_count)
            .map(|_| Particle::at_rest(Vec2::new(rng.gen::<f32>() * w, rng.gen::<f32>() * h)))
            .collect();
        let center = Vec2::new(w, h) * 0.5;
        Self {
            cursor: Follower::new(center, cfg.cursor_lerp),
            trail: Follower::new(center, cfg.trail_lerp),
            cfg,
            particles,
            pointer: center,
            size: Vec2::new(w, h),
            history: VecDeque::with_capacity(TRAIL_HISTORY_LEN + 1),
            speed: 0.0,
            impulses: 0,
        }
    }

    pub fn config(&self) -> &TrailConfig {
        &self.cfg
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Follow a surface resize without rebuilding the pool. Origins are
    /// rescaled per axis and each particle keeps its displacement; the
    /// followers and ribbon history are untouched.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !width.is_finite() || !height.is_finite() {
            return;
        }
        let new = Vec2::new(width.max(0.0), height.max(0.0));
        let old = self.size;
        let axis = |o: f32, n: f32| if o > 0.0 { n / o } else { 1.0 };
        let scale = Vec2::new(axis(old.x, new.x), axis(old.y, new.y));
        for p in &mut self.particles {
            let origin = (p.origin * scale).clamp(Vec2::ZERO, new);
            p.position += origin - p.origin;
            p.origin = origin;
        }
        self.size = new;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn history(&self) -> &VecDeque<TrailPoint> {
        &self.history
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor.position
    }

    pub fn ring_center(&self) -> Vec2 {
        self.trail.position
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Particles that received an impulse on the last step.
    pub fn impulses_applied(&self) -> usize {
        self.impulses
    }

    /// One frame: follow the pointer, record history and integrate particles.
    pub fn step(&mut self, sample: PointerSample) {
        self.pointer = sample.position;
        self.speed = sample.speed;
        let cursor = self.cursor.step(sample.position);
        self.trail.step(sample.position);

        self.history.push_front(TrailPoint {
            position: cursor,
            speed: sample.speed,
        });
        self.history.truncate(TRAIL_HISTORY_LEN);

        let cfg = &self.cfg;
        let moving = sample.speed > TRAIL_MIN_SPLAT_SPEED;
        let multiplier = (sample.speed * TRAIL_SPEED_MULTIPLIER).min(TRAIL_SPEED_MULTIPLIER_MAX);
        let mut impulses = 0;
        for p in &mut self.particles {
            let mut impulse = Vec2::ZERO;
            let offset = p.position - cursor;
            let dist = offset.length();
            if moving && dist < cfg.splat_radius {
                let force = falloff_linear(dist, cfg.splat_radius) * cfg.splat_force * multiplier;
                // A particle exactly on the cursor is pushed along +x.
                let dir = if dist > 0.0 { offset / dist } else { Vec2::X };
                impulse = dir * force + sample.delta * TRAIL_VELOCITY_COUPLING;
                impulses += 1;
            }
            p.integrate(impulse, cfg.return_force, cfg.damping);
        }
        self.impulses = impulses;
    }

    pub fn ribbon(&self) -> Option<Ribbon> {
        if self.history.len() <= 2 {
            return None;
        }
        let pts: Vec<Vec2> = self.history.iter().map(|p| p.position).collect();
        let curves = pts
            .windows(2)
            .skip(1)
            .map(|w| (w[0], (w[0] + w[1]) * 0.5))
            .collect();
        Some(Ribbon {
            start: pts[0],
            tail: pts[pts.len() - 1],
            curves,
            width: (self.speed * 0.3).clamp(1.0, 8.0),
        })
    }

    pub fn glow_radius(&self) -> f32 {
        60.0 + self.speed * 2.0
    }

    /// Outer ring diameter: grows with the lag between the slow follower and
    /// the pointer.
    pub fn ring_size(&self) -> f32 {
        let lag = self.trail.lag(self.pointer);
        self.cfg.trail_size * (1.0 + (lag * 0.01).min(0.5))
    }
}
