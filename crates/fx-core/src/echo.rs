//! Hero spotlight: eased spotlight follower, fading echoes left behind on
//! fast pointer moves, and pointer parallax for the base image.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::config::{check_factor, check_non_negative, check_positive, Validate};
use crate::constants::*;
use crate::easing::Follower;
use crate::error::ConfigResult;
use crate::pointer::PointerSample;

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroConfig {
    /// URL of the color image revealed inside echoes.
    pub image: Option<String>,
    pub spotlight_size: f32,
    pub spotlight_ease: f32,
    pub cursor_ease: f32,
    /// Pixels per frame of raw pointer motion that spawn an echo.
    pub echo_threshold: f32,
    pub echo_decay: f32,
    pub parallax_strength: f32,
    pub parallax_scale: f32,
    pub seed: Option<u64>,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            image: None,
            spotlight_size: HERO_SPOTLIGHT_SIZE,
            spotlight_ease: HERO_SPOTLIGHT_EASE,
            cursor_ease: HERO_CURSOR_EASE,
            echo_threshold: ECHO_VELOCITY_THRESHOLD,
            echo_decay: ECHO_DECAY,
            parallax_strength: HERO_PARALLAX_STRENGTH,
            parallax_scale: HERO_PARALLAX_SCALE,
            seed: None,
        }
    }
}

impl Validate for HeroConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_positive("spotlightSize", self.spotlight_size)?;
        check_factor("spotlightEase", self.spotlight_ease)?;
        check_factor("cursorEase", self.cursor_ease)?;
        check_non_negative("echoThreshold", self.echo_threshold)?;
        check_positive("echoDecay", self.echo_decay)?;
        check_non_negative("parallaxStrength", self.parallax_strength)?;
        check_positive("parallaxScale", self.parallax_scale)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Echo {
    pub position: Vec2,
    pub size: f32,
    pub life: f32,
    pub decay: f32,
}

impl Echo {
    pub fn new(position: Vec2, size: f32, decay: f32) -> Self {
        Self {
            position,
            size,
            life: 1.0,
            decay,
        }
    }

    /// Decay one frame; `false` once the echo is spent.
    pub fn update(&mut self) -> bool {
        self.life -= self.decay;
        self.life > 0.0
    }

    pub fn opacity(&self) -> f32 {
        (self.life * ECHO_OPACITY).max(0.0)
    }
}

/// Pointer-relative image offset in pixels, `-c * strength` with
/// `c = (p / viewport - 0.5) * 2`. Zero for an empty viewport.
pub fn parallax(pointer: Vec2, viewport: Vec2, strength: f32) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec2::ZERO;
    }
    let c = (pointer / viewport - 0.5) * 2.0;
    -c * strength
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroFrame {
    pub spotlight: Vec2,
    pub cursor: Vec2,
    pub parallax: Vec2,
    pub spawned: bool,
}

/// Overlay opacities for one frame. Leaving the document hides the
/// spotlight and the cursor dot together; the dot additionally needs the
/// content shown and a hotspot under the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroVisibility {
    pub spotlight: f32,
    pub cursor: f32,
}

impl HeroVisibility {
    pub fn new(inside_document: bool, content_visible: bool, on_hotspot: bool) -> Self {
        let on = |b: bool| if b { 1.0 } else { 0.0 };
        Self {
            spotlight: on(inside_document),
            cursor: on(inside_document && content_visible && on_hotspot),
        }
    }
}

pub struct HeroSpotlight {
    cfg: HeroConfig,
    spotlight: Follower,
    cursor: Follower,
    echoes: Vec<Echo>,
    rng: StdRng,
}

impl HeroSpotlight {
    pub fn new(cfg: HeroConfig, center: Vec2) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            spotlight: Follower::new(center, cfg.spotlight_ease),
            cursor: Follower::new(center, cfg.cursor_ease),
            cfg,
            echoes: Vec::new(),
            rng,
        }
    }

    pub fn config(&self) -> &HeroConfig {
        &self.cfg
    }

    pub fn echoes(&self) -> &[Echo] {
        &self.echoes
    }

    /// Jump both followers to `p`, e.g. on touch start.
    pub fn snap(&mut self, p: Vec2) {
        self.spotlight.snap(p);
        self.cursor.snap(p);
    }

    pub fn step(&mut self, sample: PointerSample, viewport: Vec2) -> HeroFrame {
        let spotlight = self.spotlight.step(sample.position);
        let cursor = self.cursor.step(sample.position);
        let parallax = parallax(sample.position, viewport, self.cfg.parallax_strength);

        let spawned = sample.speed > self.cfg.echo_threshold;
        if spawned {
            let jitter = ECHO_SIZE_MIN + self.rng.gen::<f32>() * ECHO_SIZE_JITTER;
            self.echoes.push(Echo::new(
                spotlight,
                self.cfg.spotlight_size * jitter,
                self.cfg.echo_decay,
            ));
        }
        self.echoes.retain_mut(Echo::update);

        HeroFrame {
            spotlight,
            cursor,
            parallax,
            spawned,
        }
    }
}
