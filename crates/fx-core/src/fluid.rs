//! Semi-Lagrangian fluid solver: configuration, pass scheduling and pointer
//! driven splats.
//!
//! The pass sequence is backend-agnostic. The web front-end implements
//! [`FluidBackend`] with GPU render passes; [`CpuFluid`] implements it on
//! plain grids for tests and for browsers without WebGPU.

pub mod buffer;
pub mod cpu;

pub use buffer::DoubleBuffer;
pub use cpu::CpuFluid;

use glam::Vec2;
use serde::Deserialize;

use crate::config::{check_count, check_decay, check_factor, check_non_negative, check_positive, Validate};
use crate::constants::*;
use crate::easing::{approach_vec2, clamp_dt};
use crate::error::ConfigResult;

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FluidConfig {
    pub splat_radius: f32,
    pub splat_force: f32,
    pub dissipation: f32,
    pub pressure_iterations: u32,
    pub cursor_lerp: f32,
    /// Square simulation grid edge in cells. Fixed for the lifetime of the
    /// solver; display resizes never touch it.
    pub sim_resolution: u32,
    pub splat_threshold: f32,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            splat_radius: FLUID_SPLAT_RADIUS,
            splat_force: FLUID_SPLAT_FORCE,
            dissipation: FLUID_DISSIPATION,
            pressure_iterations: FLUID_PRESSURE_ITERATIONS,
            cursor_lerp: FLUID_CURSOR_LERP,
            sim_resolution: FLUID_SIM_RESOLUTION,
            splat_threshold: FLUID_SPLAT_THRESHOLD,
        }
    }
}

impl Validate for FluidConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_positive("splatRadius", self.splat_radius)?;
        check_non_negative("splatForce", self.splat_force)?;
        check_decay("dissipation", self.dissipation)?;
        check_count("pressureIterations", self.pressure_iterations as usize, 1)?;
        check_factor("cursorLerp", self.cursor_lerp)?;
        check_count("simResolution", self.sim_resolution as usize, 8)?;
        check_non_negative("splatThreshold", self.splat_threshold)
    }
}

/// One pass of the simulation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    Splat,
    Advect,
    Divergence,
    /// Jacobi iteration number, starting at zero.
    Pressure(u32),
    SubtractGradient,
}

impl Pass {
    /// Whether the pass ends with a swap of a double-buffered field.
    pub fn swaps(&self) -> bool {
        !matches!(self, Pass::Divergence)
    }
}

/// Fixed pass order for one frame: optional splat, then advect, divergence,
/// `iterations` Jacobi sweeps and gradient subtraction.
pub fn step_schedule(iterations: u32, with_splat: bool) -> Vec<Pass> {
    let mut passes = Vec::with_capacity(iterations as usize + 4);
    if with_splat {
        passes.push(Pass::Splat);
    }
    passes.push(Pass::Advect);
    passes.push(Pass::Divergence);
    passes.extend((0..iterations).map(Pass::Pressure));
    passes.push(Pass::SubtractGradient);
    passes
}

/// Velocity impulse at a normalized point (top-left origin).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Splat {
    pub point: Vec2,
    pub force: Vec2,
}

/// Storage and kernels for the simulation passes. Every method that mutates
/// a double-buffered field writes into its write slot and swaps.
pub trait FluidBackend {
    fn splat(&mut self, splat: Splat, radius: f32);
    fn advect(&mut self, dt: f32, dissipation: f32);
    fn divergence(&mut self);
    fn relax_pressure(&mut self);
    fn subtract_gradient(&mut self);
}

/// Run one frame of passes against a backend in schedule order.
pub fn run_step<B: FluidBackend + ?Sized>(
    backend: &mut B,
    splat: Option<Splat>,
    dt: f32,
    cfg: &FluidConfig,
) {
    for pass in step_schedule(cfg.pressure_iterations, splat.is_some()) {
        match pass {
            Pass::Splat => {
                if let Some(s) = splat {
                    backend.splat(s, cfg.splat_radius);
                }
            }
            Pass::Advect => backend.advect(dt, cfg.dissipation),
            Pass::Divergence => backend.divergence(),
            Pass::Pressure(_) => backend.relax_pressure(),
            Pass::SubtractGradient => backend.subtract_gradient(),
        }
    }
}

/// Smoothed pointer that turns its own frame-to-frame motion into splats.
#[derive(Clone, Debug)]
pub struct SplatDriver {
    target: Vec2,
    smooth: Vec2,
    prev: Vec2,
    lerp: f32,
    force: f32,
    threshold: f32,
}

impl SplatDriver {
    pub fn new(cfg: &FluidConfig) -> Self {
        let center = Vec2::splat(0.5);
        Self {
            target: center,
            smooth: center,
            prev: center,
            lerp: cfg.cursor_lerp,
            force: cfg.splat_force,
            threshold: cfg.splat_threshold,
        }
    }

    /// Pointer in normalized surface coordinates, top-left origin.
    pub fn set_pointer(&mut self, uv: Vec2) {
        if uv.is_finite() {
            self.target = uv;
        }
    }

    pub fn smoothed(&self) -> Vec2 {
        self.smooth
    }

    /// Ease toward the pointer and emit a splat when the smoothed point moved
    /// faster than the threshold since the previous frame.
    pub fn next(&mut self) -> Option<Splat> {
        self.smooth = approach_vec2(self.smooth, self.target, self.lerp);
        let delta = self.smooth - self.prev;
        self.prev = self.smooth;
        if delta.length() > self.threshold {
            Some(Splat {
                point: self.smooth,
                force: delta * self.force,
            })
        } else {
            None
        }
    }
}

/// What a frame did, for the renderer's uniforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidFrame {
    pub dt: f32,
    pub time: f32,
    pub pointer: Vec2,
    pub splat: Option<Splat>,
}

/// Per-overlay driver: clamps the frame delta, produces splats and runs the
/// pass sequence on whichever backend is active.
#[derive(Clone, Debug)]
pub struct FluidController {
    cfg: FluidConfig,
    driver: SplatDriver,
    time: f32,
}

impl FluidController {
    pub fn new(cfg: FluidConfig) -> Self {
        let driver = SplatDriver::new(&cfg);
        Self {
            cfg,
            driver,
            time: 0.0,
        }
    }

    pub fn config(&self) -> &FluidConfig {
        &self.cfg
    }

    pub fn set_pointer(&mut self, uv: Vec2) {
        self.driver.set_pointer(uv);
    }

    pub fn frame<B: FluidBackend + ?Sized>(&mut self, backend: &mut B, raw_dt: f32) -> FluidFrame {
        let dt = clamp_dt(raw_dt, FLUID_MAX_DT);
        let splat = self.driver.next();
        run_step(backend, splat, dt, &self.cfg);
        self.time += dt;
        FluidFrame {
            dt,
            time: self.time,
            pointer: self.driver.smoothed(),
            splat,
        }
    }
}
