//! Horizontal wave lines with a sweeping pulse and cursor repulsion.
//!
//! The simulation produces plain polylines; the web front-end strokes them
//! onto a 2D canvas.

use std::f32::consts::PI;
use std::ops::Range;

use glam::Vec2;
use serde::Deserialize;
use smallvec::SmallVec;

use crate::color::parse_rgb_triplet;
use crate::config::{check_count, check_non_negative, check_positive, Validate};
use crate::constants::*;
use crate::easing::falloff_cubic;
use crate::error::{ConfigError, ConfigResult};

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaveGridConfig {
    /// `"r, g, b"` triplet used for every stroke.
    pub color: String,
    pub line_count: usize,
    pub segments: usize,
    pub line_width: f32,
    pub opacity: f32,
    pub amplitude: f32,
    pub cursor_radius: f32,
    pub cursor_push: f32,
    pub pulse_speed: f32,
}

impl Default for WaveGridConfig {
    fn default() -> Self {
        Self {
            color: "0, 0, 0".to_string(),
            line_count: WAVE_LINE_COUNT,
            segments: WAVE_LINE_SEGMENTS,
            line_width: WAVE_LINE_WIDTH,
            opacity: WAVE_LINE_OPACITY,
            amplitude: WAVE_AMPLITUDE,
            cursor_radius: WAVE_CURSOR_RADIUS,
            cursor_push: WAVE_CURSOR_PUSH,
            pulse_speed: WAVE_PULSE_SPEED,
        }
    }
}

impl Validate for WaveGridConfig {
    fn validate(&self) -> ConfigResult<()> {
        if parse_rgb_triplet(&self.color).is_none() {
            return Err(ConfigError::OutOfRange {
                field: "color",
                value: f64::NAN,
                expected: "an \"r, g, b\" triplet of 0..=255",
            });
        }
        check_count("lineCount", self.line_count, 1)?;
        check_count("segments", self.segments, 1)?;
        check_positive("lineWidth", self.line_width)?;
        check_non_negative("opacity", self.opacity)?;
        check_non_negative("amplitude", self.amplitude)?;
        check_non_negative("cursorRadius", self.cursor_radius)?;
        check_non_negative("cursorPush", self.cursor_push)?;
        check_non_negative("pulseSpeed", self.pulse_speed)
    }
}

impl WaveGridConfig {
    pub fn rgb(&self) -> [u8; 3] {
        parse_rgb_triplet(&self.color).unwrap_or([0, 0, 0])
    }
}

/// Contiguous run of points inside the pulse, stroked brighter and thicker.
#[derive(Clone, Debug, PartialEq)]
pub struct Highlight {
    pub points: Range<usize>,
    pub width: f32,
}

#[derive(Clone, Debug)]
pub struct WaveLine {
    pub points: SmallVec<[Vec2; 128]>,
    /// Base stroke alpha including the pulse boost.
    pub alpha: f32,
    pub highlights: SmallVec<[Highlight; 2]>,
}

pub struct WaveGrid {
    cfg: WaveGridConfig,
    time: f32,
    width: f32,
    height: f32,
    /// `None` until the first pointer event; no displacement before that.
    pointer: Option<Vec2>,
}

impl WaveGrid {
    pub fn new(cfg: WaveGridConfig, width: f32, height: f32) -> Self {
        Self {
            cfg,
            time: 0.0,
            width,
            height,
            pointer: None,
        }
    }

    pub fn config(&self) -> &WaveGridConfig {
        &self.cfg
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    pub fn set_pointer(&mut self, p: Vec2) {
        self.pointer = Some(p);
    }

    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    /// Advance the wave clock by one frame.
    pub fn advance(&mut self) {
        self.time += WAVE_TIME_STEP;
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn set_time(&mut self, t: f32) {
        self.time = t;
    }

    fn line_phase(index: usize) -> f32 {
        index as f32 * 0.6
    }

    pub fn base_y(&self, index: usize) -> f32 {
        let spacing = self.height / (self.cfg.line_count as f32 + 1.0);
        spacing * (index as f32 + 1.0)
    }

    /// Sum of the three sine terms at normalized position `t` along the line.
    pub fn wave_offset(&self, index: usize, t: f32) -> f32 {
        let a = self.cfg.amplitude;
        let phase = Self::line_phase(index);
        let time = self.time;
        let w1 = (t * PI * 3.0 + time * 1.2 + phase).sin() * a;
        let w2 = (t * PI * 5.0 - time * 0.8 + phase * 1.5).sin() * a * 0.4;
        let w3 = (t * PI * 1.5 + time * 0.5 + phase * 0.7).sin() * a * 0.6;
        w1 + w2 + w3
    }

    /// Vertical push away from the pointer for a point at `p`. Zero outside the
    /// radius and when the point sits exactly on the pointer.
    pub fn cursor_offset(&self, p: Vec2) -> f32 {
        let Some(pointer) = self.pointer else {
            return 0.0;
        };
        let d = p - pointer;
        let dist = d.length();
        if dist <= 0.0 || dist >= self.cfg.cursor_radius {
            return 0.0;
        }
        (d.y / dist) * falloff_cubic(dist, self.cfg.cursor_radius) * self.cfg.cursor_push
    }

    /// Horizontal center of the pulse for line `index`.
    pub fn pulse_center(&self, index: usize) -> f32 {
        let phase = Self::line_phase(index);
        let cycle = (self.time * self.cfg.pulse_speed + phase * 0.3).rem_euclid(WAVE_PULSE_CYCLE);
        cycle * self.width - self.width * 0.5
    }

    pub fn pulse_half_width(&self) -> f32 {
        self.width * WAVE_PULSE_HALF_WIDTH
    }

    /// Extra alpha a line gets while the pulse passes the surface center.
    pub fn pulse_alpha(&self, index: usize) -> f32 {
        let half = self.pulse_half_width();
        if half <= 0.0 {
            return 0.0;
        }
        let dist = (self.width * 0.5 - self.pulse_center(index)).abs();
        (1.0 - dist / half).max(0.0) * WAVE_PULSE_ALPHA
    }

    pub fn line(&self, index: usize) -> WaveLine {
        let segments = self.cfg.segments;
        let base = self.base_y(index);
        let center = self.pulse_center(index);
        let half = self.pulse_half_width();

        let mut points = SmallVec::with_capacity(segments + 1);
        let mut highlights: SmallVec<[Highlight; 2]> = SmallVec::new();
        let mut run: Option<(usize, f32)> = None;

        for s in 0..=segments {
            let t = s as f32 / segments as f32;
            let x = t * self.width;
            let mut p = Vec2::new(x, base + self.wave_offset(index, t));
            p.y += self.cursor_offset(p);
            points.push(p);

            let from_pulse = (x - center).abs();
            if half > 0.0 && from_pulse < half {
                let f = 1.0 - from_pulse / half;
                let eased = f * f;
                run = Some(match run {
                    Some((start, best)) => (start, best.max(eased)),
                    None => (s, eased),
                });
            } else if let Some((start, best)) = run.take() {
                highlights.push(self.highlight(start..s, best));
            }
        }
        if let Some((start, best)) = run {
            highlights.push(self.highlight(start..segments + 1, best));
        }

        WaveLine {
            points,
            alpha: self.cfg.opacity + self.pulse_alpha(index),
            highlights,
        }
    }

    fn highlight(&self, points: Range<usize>, eased: f32) -> Highlight {
        Highlight {
            points,
            width: self.cfg.line_width + eased * WAVE_PULSE_EXTRA_WIDTH,
        }
    }

    /// Every line for the current frame. Empty while the surface has no area.
    pub fn frame(&self) -> Vec<WaveLine> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec::new();
        }
        (0..self.cfg.line_count).map(|i| self.line(i)).collect()
    }
}
