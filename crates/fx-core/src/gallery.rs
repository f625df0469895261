//! Circular gallery layout: ring wrap, depth, edge fade, drag input, label
//! sizing and click hit-testing.
//!
//! Items sit on a 1-D ring of length `count * spacing`. The scroll offset
//! eases toward a target set by dragging or by external scroll progress.

use glam::{Mat4, Vec2, Vec3};
use serde::Deserialize;

use crate::camera::{pixel_to_ndc, Camera};
use crate::color::parse_hex_rgb;
use crate::config::{check_factor, check_non_negative, check_positive, Validate};
use crate::constants::*;
use crate::easing::ScrollState;
use crate::error::{ConfigError, ConfigResult};

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GalleryItem {
    pub image: String,
    pub text: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryConfig {
    pub spacing: f32,
    pub curvature: f32,
    pub scroll_speed: f32,
    pub scroll_ease: f32,
    pub drag_sensitivity: f32,
    pub text_color: String,
    pub border_radius: f32,
    pub font: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            spacing: GALLERY_SPACING,
            curvature: GALLERY_CURVATURE,
            scroll_speed: GALLERY_SCROLL_SPEED,
            scroll_ease: GALLERY_SCROLL_EASE,
            drag_sensitivity: GALLERY_DRAG_SENSITIVITY,
            text_color: "#ffffff".to_string(),
            border_radius: GALLERY_BORDER_RADIUS,
            font: "bold 30px sans-serif".to_string(),
        }
    }
}

impl Validate for GalleryConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_positive("spacing", self.spacing)?;
        check_non_negative("curvature", self.curvature)?;
        check_non_negative("scrollSpeed", self.scroll_speed)?;
        check_factor("scrollEase", self.scroll_ease)?;
        check_non_negative("dragSensitivity", self.drag_sensitivity)?;
        check_non_negative("borderRadius", self.border_radius)?;
        if parse_hex_rgb(&self.text_color).is_none() {
            return Err(ConfigError::OutOfRange {
                field: "textColor",
                value: f64::NAN,
                expected: "a #rrggbb color",
            });
        }
        Ok(())
    }
}

impl GalleryConfig {
    pub fn text_rgb(&self) -> [f32; 3] {
        parse_hex_rgb(&self.text_color).unwrap_or([1.0, 1.0, 1.0])
    }
}

/// Map `x` onto `[-total/2, total/2)`. A non-positive ring length maps
/// everything to zero.
pub fn wrap(x: f32, total: f32) -> f32 {
    if total <= 0.0 || !total.is_finite() || !x.is_finite() {
        return 0.0;
    }
    let half = total * 0.5;
    let w = (x + half).rem_euclid(total) - half;
    // rem_euclid can round up to `total` for tiny negative inputs.
    if w >= half {
        w - total
    } else {
        w
    }
}

/// Quadratic edge fade: 1 at the center, 0 at and beyond the ring edge.
pub fn visibility(wrapped: f32, total: f32) -> f32 {
    if total <= 0.0 {
        return 0.0;
    }
    let r = wrapped.abs() / (total * 0.5);
    (1.0 - r * r).clamp(0.0, 1.0)
}

/// Font size in px from a CSS font shorthand: the first `<number>px` token.
pub fn font_px(font: &str) -> Option<f32> {
    font.split_whitespace()
        .find_map(|tok| tok.strip_suffix("px")?.parse::<f32>().ok())
        .filter(|px| px.is_finite() && *px > 0.0)
}

/// Logical pixel size of a rasterized caption.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelMetrics {
    pub width: f32,
    pub height: f32,
}

impl LabelMetrics {
    pub fn new(text_width: f32, font: &str) -> Self {
        let text_height = font_px(font)
            .map(|px| (px * GALLERY_LABEL_LINE_HEIGHT).ceil())
            .unwrap_or(GALLERY_LABEL_FALLBACK_HEIGHT);
        Self {
            width: text_width.max(0.0).ceil() + GALLERY_LABEL_PAD_X,
            height: text_height + GALLERY_LABEL_PAD_Y,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height <= 0.0 {
            return 1.0;
        }
        self.width / self.height
    }

    /// Plane size in world units at the fixed label height.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(GALLERY_LABEL_HEIGHT * self.aspect(), GALLERY_LABEL_HEIGHT)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub index: usize,
    pub x: f32,
    pub z: f32,
    pub alpha: f32,
}

impl Placement {
    pub fn image_model(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::new(GALLERY_PLANE_WIDTH, GALLERY_PLANE_HEIGHT, 1.0),
            glam::Quat::IDENTITY,
            Vec3::new(self.x, 0.0, self.z),
        )
    }

    pub fn label_model(&self, label: Vec2) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::new(label.x, label.y, 1.0),
            glam::Quat::IDENTITY,
            Vec3::new(self.x, GALLERY_LABEL_Y, self.z),
        )
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Drag {
    active: bool,
    start_x: f32,
    start_target: f32,
}

pub struct Gallery {
    cfg: GalleryConfig,
    count: usize,
    scroll: ScrollState,
    drag: Drag,
    velocity: f32,
    camera: Camera,
}

impl Gallery {
    pub fn new(cfg: GalleryConfig, count: usize) -> Self {
        Self {
            cfg,
            count,
            scroll: ScrollState::default(),
            drag: Drag::default(),
            velocity: 0.0,
            camera: Camera::default(),
        }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.cfg
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn total_width(&self) -> f32 {
        self.count as f32 * self.cfg.spacing
    }

    pub fn base_offset(&self, index: usize) -> f32 {
        index as f32 * self.cfg.spacing
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_viewport(width, height);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.active
    }

    /// External scroll progress in [0, 1] replaces drag state as the target.
    pub fn update_progress(&mut self, progress: f32) {
        if progress.is_finite() {
            self.scroll.target = progress * self.total_width();
        }
    }

    pub fn set_target(&mut self, target: f32) {
        if target.is_finite() {
            self.scroll.target = target;
        }
    }

    pub fn pointer_down(&mut self, x: f32) {
        self.drag = Drag {
            active: true,
            start_x: x,
            start_target: self.scroll.target,
        };
        self.velocity = 0.0;
    }

    pub fn pointer_move(&mut self, x: f32) {
        if !self.drag.active {
            return;
        }
        let delta = (self.drag.start_x - x) * self.cfg.drag_sensitivity * self.cfg.scroll_speed;
        self.scroll.target = self.drag.start_target + delta;
    }

    /// End a drag. Returns `true` when the pointer barely moved, i.e. the
    /// release counts as a click.
    pub fn pointer_up(&mut self, x: f32) -> bool {
        let was_active = std::mem::take(&mut self.drag.active);
        was_active && (self.drag.start_x - x).abs() <= GALLERY_CLICK_JITTER_PX
    }

    pub fn cancel_drag(&mut self) {
        self.drag.active = false;
    }

    /// Ease the scroll offset one frame.
    pub fn step(&mut self) {
        self.velocity = self.scroll.step(self.cfg.scroll_ease);
    }

    pub fn wrapped(&self, index: usize) -> f32 {
        wrap(self.base_offset(index) - self.scroll.current, self.total_width())
    }

    pub fn placement(&self, index: usize) -> Placement {
        let total = self.total_width();
        let x = self.wrapped(index);
        Placement {
            index,
            x,
            z: -self.cfg.curvature * x.abs(),
            alpha: visibility(x, total),
        }
    }

    pub fn placements(&self) -> Vec<Placement> {
        (0..self.count).map(|i| self.placement(i)).collect()
    }

    /// Item closest to the ring center; ties go to the lower index.
    pub fn nearest_to_center(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for i in 0..self.count {
            let d = self.wrapped(i).abs();
            match best {
                Some((_, bd)) if d >= bd - TIE_EPS => {}
                _ => best = Some((i, d)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Project every image center through the camera and pick the nearest
    /// one within the hit radius of `ndc`.
    pub fn hit_test(&self, ndc: Vec2) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for p in self.placements() {
            let Some(proj) = self.camera.project(Vec3::new(p.x, 0.0, p.z)) else {
                continue;
            };
            let d = proj.truncate().distance(ndc);
            if d >= GALLERY_HIT_RADIUS {
                continue;
            }
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((p.index, d)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Click at a surface pixel.
    pub fn hit_test_pixel(&self, px: Vec2, size: Vec2) -> Option<usize> {
        pixel_to_ndc(px, size).and_then(|ndc| self.hit_test(ndc))
    }
}

const TIE_EPS: f32 = 1e-4;
