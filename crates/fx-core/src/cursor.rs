//! Ambient cursor effects: the color-inverting follower and the magnetic
//! button offset.

use glam::Vec2;
use serde::Deserialize;

use crate::config::{check_factor, check_non_negative, check_positive, Validate};
use crate::constants::*;
use crate::easing::{approach, Follower};
use crate::error::{ConfigError, ConfigResult};
use crate::pointer::PointerState;
use crate::regions::{Rect, RegionKind, RegionRegistry};

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvertConfig {
    pub base_size: f32,
    pub max_scale: f32,
    pub lerp: f32,
    pub scale_lerp: f32,
    pub velocity_scale: f32,
}

impl Default for InvertConfig {
    fn default() -> Self {
        Self {
            base_size: INVERT_BASE_SIZE,
            max_scale: INVERT_MAX_SCALE,
            lerp: INVERT_LERP,
            scale_lerp: INVERT_SCALE_LERP,
            velocity_scale: INVERT_VELOCITY_SCALE,
        }
    }
}

impl Validate for InvertConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_positive("baseSize", self.base_size)?;
        if !(self.max_scale >= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "maxScale",
                value: self.max_scale as f64,
                expected: ">= 1",
            });
        }
        check_factor("lerp", self.lerp)?;
        check_factor("scaleLerp", self.scale_lerp)?;
        check_non_negative("velocityScale", self.velocity_scale)
    }
}

/// Visibility decision for a point. Registration order stands in for
/// stacking order: the last-registered invert or block zone under the point
/// decides, so a nested zone registered after its parent overrides it.
pub fn inversion_visible(regions: &RegionRegistry, point: Vec2) -> bool {
    regions
        .kinds_at(point)
        .into_iter()
        .rev()
        .find(|k| matches!(k, RegionKind::Invert | RegionKind::Block))
        == Some(RegionKind::Invert)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvertFrame {
    pub position: Vec2,
    pub scale: f32,
    pub visible: bool,
}

pub struct InvertFollower {
    cfg: InvertConfig,
    pointer: PointerState,
    follower: Follower,
    scale: f32,
    in_window: bool,
    snap_pending: bool,
}

impl InvertFollower {
    pub fn new(cfg: InvertConfig) -> Self {
        Self {
            follower: Follower::new(Vec2::ZERO, cfg.lerp),
            cfg,
            pointer: PointerState::new(Vec2::ZERO),
            scale: 1.0,
            in_window: false,
            snap_pending: true,
        }
    }

    pub fn config(&self) -> &InvertConfig {
        &self.cfg
    }

    /// The first move after entering the window snaps the follower and
    /// resets the speed baseline.
    pub fn pointer_move(&mut self, p: Vec2) {
        if self.snap_pending {
            self.snap_pending = false;
            self.follower.snap(p);
            self.pointer.rebase(p);
        }
        self.in_window = true;
        self.pointer.move_to(p);
    }

    pub fn pointer_leave(&mut self) {
        self.in_window = false;
        self.snap_pending = true;
    }

    /// Entering alone does not show the follower; it waits for a position.
    pub fn pointer_enter(&mut self) {
        self.snap_pending = true;
    }

    pub fn is_in_window(&self) -> bool {
        self.in_window
    }

    pub fn scale_target(&self, speed: f32) -> f32 {
        1.0 + (speed * self.cfg.velocity_scale).min(self.cfg.max_scale - 1.0)
    }

    /// One frame. `None` while the pointer is outside the window; the host
    /// keeps the follower hidden.
    pub fn step(&mut self, regions: &RegionRegistry) -> Option<InvertFrame> {
        if !self.in_window {
            return None;
        }
        let target = self.pointer.position;
        let visible = inversion_visible(regions, target);
        let position = self.follower.step(target);
        let sample = self.pointer.sample();
        self.scale = approach(self.scale, self.scale_target(sample.speed), self.cfg.scale_lerp);
        Some(InvertFrame {
            position,
            scale: self.scale,
            visible,
        })
    }
}

/// Offset that pulls an element toward the pointer, or zero when the
/// pointer is outside its bounds.
pub fn magnetic_offset(rect: Rect, pointer: Vec2, strength: f32) -> Vec2 {
    if rect.is_empty() || !rect.contains(pointer) || !strength.is_finite() {
        return Vec2::ZERO;
    }
    (pointer - rect.center()) * strength
}

pub fn translate_css(offset: Vec2) -> String {
    format!("translate({}px, {}px)", offset.x, offset.y)
}
