//! Page-wide smooth scrolling context.
//!
//! Constructed explicitly by the root view and handed to every consumer;
//! there is no global instance.

use serde::Deserialize;

use crate::config::{check_factor, check_positive, Validate};
use crate::constants::{SCROLL_LERP, SCROLL_WHEEL_MULTIPLIER};
use crate::easing::approach;
use crate::error::ConfigResult;

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SmoothScrollConfig {
    pub lerp: f32,
    pub wheel_multiplier: f32,
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self {
            lerp: SCROLL_LERP,
            wheel_multiplier: SCROLL_WHEEL_MULTIPLIER,
        }
    }
}

impl Validate for SmoothScrollConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_factor("lerp", self.lerp)?;
        check_positive("wheelMultiplier", self.wheel_multiplier)
    }
}

// Below this distance the eased value snaps onto the target.
const SETTLE_EPS: f32 = 0.1;

#[derive(Clone, Debug)]
pub struct SmoothScroll {
    cfg: SmoothScrollConfig,
    current: f32,
    target: f32,
    limit: f32,
}

impl SmoothScroll {
    pub fn new(cfg: SmoothScrollConfig) -> Self {
        Self {
            cfg,
            current: 0.0,
            target: 0.0,
            limit: 0.0,
        }
    }

    /// Maximum scroll offset (document height minus viewport height).
    pub fn set_limit(&mut self, limit: f32) {
        self.limit = limit.max(0.0);
        self.target = self.target.clamp(0.0, self.limit);
        self.current = self.current.clamp(0.0, self.limit);
    }

    pub fn limit(&self) -> f32 {
        self.limit
    }

    pub fn on_wheel(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }
        self.target = (self.target + delta_y * self.cfg.wheel_multiplier).clamp(0.0, self.limit);
    }

    /// Jump (or ease) to an absolute offset, e.g. on route change.
    pub fn scroll_to(&mut self, y: f32, immediate: bool) {
        self.target = y.clamp(0.0, self.limit);
        if immediate {
            self.current = self.target;
        }
    }

    /// Sync with a scroll that happened outside of the wheel path (keyboard,
    /// scrollbar drag).
    pub fn sync(&mut self, y: f32) {
        let y = y.clamp(0.0, self.limit);
        self.current = y;
        self.target = y;
    }

    /// One frame of easing; returns the offset to apply.
    pub fn step(&mut self) -> f32 {
        self.current = approach(self.current, self.target, self.cfg.lerp);
        if (self.target - self.current).abs() < SETTLE_EPS {
            self.current = self.target;
        }
        self.current
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Scroll progress in [0, 1]; 0 when nothing can scroll.
    pub fn progress(&self) -> f32 {
        if self.limit <= 0.0 {
            return 0.0;
        }
        (self.current / self.limit).clamp(0.0, 1.0)
    }
}

/// Progress-bar fraction for a page scrolled to `top`.
pub fn scroll_progress(top: f32, doc_height: f32, view_height: f32) -> f32 {
    let range = doc_height - view_height;
    if range <= 0.0 || !range.is_finite() {
        return 0.0;
    }
    (top / range).clamp(0.0, 1.0)
}

/// Vertical translation for a `[data-parallax]` element: proportional to the
/// distance between the element's center and the viewport center.
pub fn parallax_offset(rect_top: f32, rect_height: f32, view_height: f32, speed: f32) -> f32 {
    let center = rect_top + rect_height * 0.5;
    (center - view_height * 0.5) * speed
}
