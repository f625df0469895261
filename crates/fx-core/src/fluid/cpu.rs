//! Reference solver on `f32` grids.
//!
//! Kernels mirror the WGSL passes: cell centers sit at `(i + 0.5) / n`,
//! neighbours are one texel away and lookups clamp to the edge, like a
//! clamp-to-edge sampler with linear filtering.

use glam::Vec2;

use super::{DoubleBuffer, FluidBackend, Splat};
use crate::easing::smoothstep;

pub struct CpuFluid {
    n: usize,
    aspect: f32,
    velocity: DoubleBuffer<Vec<Vec2>>,
    pressure: DoubleBuffer<Vec<f32>>,
    divergence: Vec<f32>,
}

impl CpuFluid {
    pub fn new(resolution: u32) -> Self {
        let n = resolution.max(1) as usize;
        Self {
            n,
            aspect: 1.0,
            velocity: DoubleBuffer::filled(vec![Vec2::ZERO; n * n]),
            pressure: DoubleBuffer::filled(vec![0.0; n * n]),
            divergence: vec![0.0; n * n],
        }
    }

    pub fn resolution(&self) -> usize {
        self.n
    }

    /// Surface width over height. Splats are stretched by it along x so they
    /// stay round on a non-square surface. Non-finite or non-positive values
    /// are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    #[inline]
    fn idx(&self, i: usize, j: usize) -> usize {
        j * self.n + i
    }

    #[inline]
    fn clamp_cell(&self, i: isize, j: isize) -> usize {
        let max = self.n as isize - 1;
        self.idx(i.clamp(0, max) as usize, j.clamp(0, max) as usize)
    }

    /// Velocity of cell `(i, j)` in the read slot; row `j` grows downward.
    pub fn velocity_at(&self, i: usize, j: usize) -> Vec2 {
        self.velocity.read()[self.idx(i, j)]
    }

    pub fn velocity_field(&self) -> &DoubleBuffer<Vec<Vec2>> {
        &self.velocity
    }

    pub fn pressure_field(&self) -> &DoubleBuffer<Vec<f32>> {
        &self.pressure
    }

    pub fn divergence_field(&self) -> &[f32] {
        &self.divergence
    }

    /// Sum of |v|^2 over the grid.
    pub fn kinetic_energy(&self) -> f32 {
        self.velocity.read().iter().map(|v| v.length_squared()).sum()
    }

    /// Sum of |div v| of the current read velocity, computed fresh.
    pub fn total_divergence(&self) -> f32 {
        let v = self.velocity.read();
        let mut sum = 0.0;
        for j in 0..self.n as isize {
            for i in 0..self.n as isize {
                sum += self.divergence_of(v, i, j).abs();
            }
        }
        sum
    }

    /// Cell with the largest speed, as `(i, j)`.
    pub fn peak_cell(&self) -> (usize, usize) {
        let v = self.velocity.read();
        let mut best = (0, 0.0f32);
        for (k, vel) in v.iter().enumerate() {
            let s = vel.length_squared();
            if s > best.1 {
                best = (k, s);
            }
        }
        (best.0 % self.n, best.0 / self.n)
    }

    pub fn reset(&mut self) {
        let n2 = self.n * self.n;
        self.velocity = DoubleBuffer::filled(vec![Vec2::ZERO; n2]);
        self.pressure = DoubleBuffer::filled(vec![0.0; n2]);
        self.divergence.iter_mut().for_each(|d| *d = 0.0);
    }

    fn divergence_of(&self, v: &[Vec2], i: isize, j: isize) -> f32 {
        let l = v[self.clamp_cell(i - 1, j)].x;
        let r = v[self.clamp_cell(i + 1, j)].x;
        let b = v[self.clamp_cell(i, j - 1)].y;
        let t = v[self.clamp_cell(i, j + 1)].y;
        0.5 * (r - l + t - b)
    }

    /// Bilinear lookup at fractional cell coordinates, clamped to the edge.
    fn sample(&self, field: &[Vec2], x: f32, y: f32) -> Vec2 {
        let max = (self.n - 1) as f32;
        let x = x.clamp(0.0, max);
        let y = y.clamp(0.0, max);
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (i0, j0) = (x0 as isize, y0 as isize);
        let a = field[self.clamp_cell(i0, j0)];
        let b = field[self.clamp_cell(i0 + 1, j0)];
        let c = field[self.clamp_cell(i0, j0 + 1)];
        let d = field[self.clamp_cell(i0 + 1, j0 + 1)];
        let top = a.lerp(b, fx);
        let bottom = c.lerp(d, fx);
        top.lerp(bottom, fy)
    }

    /// Velocity brightness as RGBA8 at simulation resolution, for the 2D
    /// canvas fallback. Rows run top to bottom like `ImageData`.
    pub fn paint_rgba(&self, out: &mut Vec<u8>) {
        let pixels: Vec<[u8; 4]> = self
            .velocity
            .read()
            .iter()
            .map(|v| {
                let a = (smoothstep(0.0, 0.3, v.length()) * 0.8).clamp(0.0, 1.0);
                [255, 255, 255, (a * 255.0).round() as u8]
            })
            .collect();
        out.clear();
        out.extend_from_slice(bytemuck::cast_slice(&pixels));
    }
}

impl FluidBackend for CpuFluid {
    fn splat(&mut self, splat: Splat, radius: f32) {
        if radius <= 0.0 {
            return;
        }
        let n = self.n;
        let aspect = self.aspect;
        let (read, write) = self.velocity.split();
        for j in 0..n {
            for i in 0..n {
                let uv = Vec2::new((i as f32 + 0.5) / n as f32, (j as f32 + 0.5) / n as f32);
                let mut p = uv - splat.point;
                p.x *= aspect;
                let k = j * n + i;
                write[k] = read[k] + splat.force * (-p.dot(p) / radius).exp();
            }
        }
        self.velocity.swap();
    }

    fn advect(&mut self, dt: f32, dissipation: f32) {
        let n = self.n;
        let src = self.velocity.read().clone();
        let mut out = vec![Vec2::ZERO; n * n];
        for j in 0..n {
            for i in 0..n {
                let k = j * n + i;
                let back = Vec2::new(i as f32, j as f32) - dt * src[k];
                out[k] = self.sample(&src, back.x, back.y) * dissipation;
            }
        }
        *self.velocity.write_mut() = out;
        self.velocity.swap();
    }

    fn divergence(&mut self) {
        let n = self.n as isize;
        let v = self.velocity.read();
        let mut div = std::mem::take(&mut self.divergence);
        for j in 0..n {
            for i in 0..n {
                div[(j * n + i) as usize] = self.divergence_of(v, i, j);
            }
        }
        self.divergence = div;
    }

    fn relax_pressure(&mut self) {
        let n = self.n as isize;
        let mut out = std::mem::take(self.pressure.write_mut());
        {
            let p = self.pressure.read();
            for j in 0..n {
                for i in 0..n {
                    let l = p[self.clamp_cell(i - 1, j)];
                    let r = p[self.clamp_cell(i + 1, j)];
                    let b = p[self.clamp_cell(i, j - 1)];
                    let t = p[self.clamp_cell(i, j + 1)];
                    let k = (j * n + i) as usize;
                    out[k] = (l + r + b + t - self.divergence[k]) * 0.25;
                }
            }
        }
        *self.pressure.write_mut() = out;
        self.pressure.swap();
    }

    fn subtract_gradient(&mut self) {
        let n = self.n as isize;
        let mut out = std::mem::take(self.velocity.write_mut());
        {
            let p = self.pressure.read();
            let v = self.velocity.read();
            for j in 0..n {
                for i in 0..n {
                    let l = p[self.clamp_cell(i - 1, j)];
                    let r = p[self.clamp_cell(i + 1, j)];
                    let b = p[self.clamp_cell(i, j - 1)];
                    let t = p[self.clamp_cell(i, j + 1)];
                    let k = (j * n + i) as usize;
                    out[k] = v[k] - Vec2::new(r - l, t - b) * 0.5;
                }
            }
        }
        *self.velocity.write_mut() = out;
        self.velocity.swap();
    }
}
