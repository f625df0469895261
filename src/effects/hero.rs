use crate::canvas2d::Canvas2d;
use crate::constants::*;
use crate::core::echo::{HeroConfig, HeroFrame, HeroSpotlight as Spotlight, HeroVisibility};
use crate::core::regions::{RegionId, RegionKind};
use crate::core::PointerState;
use crate::dom::{self, js_err};
use crate::effects::load_config;
use crate::frame::EffectHandle;
use crate::input::{client_to_local, cover_crop};
use crate::zones::Zones;
use glam::Vec2;
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

struct State {
    surface: Canvas2d,
    canvas: web::HtmlCanvasElement,
    host: web::HtmlElement,
    image: Option<web::HtmlImageElement>,
    spotlight: Spotlight,
    pointer: PointerState,
    client: Vec2,
    inside_document: bool,
    content_visible: bool,
    hotspots: Zones,
}

/// Hero section spotlight: eased spotlight and cursor positions published as
/// CSS custom properties on the host element, plus fading color "echoes" of
/// the hero image painted on the canvas when the pointer moves fast.
#[wasm_bindgen]
pub struct HeroSpotlight {
    handle: EffectHandle,
    state: Rc<RefCell<State>>,
}

#[wasm_bindgen]
impl HeroSpotlight {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: web::HtmlCanvasElement, config_json: Option<String>) -> Result<HeroSpotlight, JsValue> {
        build(canvas, config_json.as_deref()).map_err(dom::to_js)
    }

    /// The cursor dot is only shown while the hero content is visible.
    #[wasm_bindgen(js_name = setContentVisible)]
    pub fn set_content_visible(&self, visible: bool) {
        if let Ok(mut s) = self.state.try_borrow_mut() {
            s.content_visible = visible;
        }
    }

    #[wasm_bindgen(js_name = registerHotspot)]
    pub fn register_hotspot(&self, el: web::Element) -> u32 {
        self.state
            .borrow_mut()
            .hotspots
            .register(el, RegionKind::Hotspot)
            .0
    }

    #[wasm_bindgen(js_name = unregisterHotspot)]
    pub fn unregister_hotspot(&self, id: u32) -> bool {
        self.state.borrow_mut().hotspots.unregister(RegionId(id))
    }

    pub fn dispose(&mut self) {
        self.handle.dispose();
    }
}

fn build(canvas: web::HtmlCanvasElement, config_json: Option<&str>) -> anyhow::Result<HeroSpotlight> {
    let cfg: HeroConfig = load_config("hero", config_json)?;
    let host: web::HtmlElement = canvas
        .parent_element()
        .and_then(|p| p.dyn_into::<web::HtmlElement>().ok())
        .unwrap_or_else(|| canvas.clone().unchecked_into());
    let image = match cfg.image.as_deref() {
        Some(src) => Some(load_image(src)?),
        None => None,
    };
    let surface = Canvas2d::new(canvas.clone(), CANVAS_DPR_CAP)?;
    let (w, h) = surface.size();
    let center = Vec2::new(w * 0.5, h * 0.5);
    let state = Rc::new(RefCell::new(State {
        surface,
        canvas,
        host,
        image,
        spotlight: Spotlight::new(cfg, center),
        pointer: PointerState::new(center),
        client: Vec2::splat(f32::NEG_INFINITY),
        inside_document: true,
        content_visible: true,
        hotspots: Zones::new(),
    }));

    let mut handle = EffectHandle::new("hero");
    let window = dom::window()?;
    let root = dom::document()?
        .document_element()
        .ok_or_else(|| anyhow::anyhow!("no document element"))?;
    {
        let state = state.clone();
        handle.listeners.add(&window, "resize", move |_: web::Event| {
            if let Err(e) = state.borrow_mut().surface.fit_window() {
                log::warn!("[hero] resize failed: {e:#}");
            }
        })?;
    }
    {
        let state = state.clone();
        handle.listeners.add(&window, "pointermove", move |ev: web::PointerEvent| {
            let client = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
            let mut s = state.borrow_mut();
            let r = dom::element_rect(&s.canvas);
            let local = client_to_local(client, r.x, r.y);
            s.client = client;
            if !s.pointer.has_moved() {
                s.pointer.rebase(local);
            }
            s.pointer.move_to(local);
        })?;
    }
    {
        // Touch has no hover, so jump straight to the touch point.
        let state = state.clone();
        handle.listeners.add(&window, "pointerdown", move |ev: web::PointerEvent| {
            if ev.pointer_type() != "touch" {
                return;
            }
            let client = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
            let mut s = state.borrow_mut();
            let r = dom::element_rect(&s.canvas);
            let local = client_to_local(client, r.x, r.y);
            s.client = client;
            s.pointer.rebase(local);
            s.spotlight.snap(local);
        })?;
    }
    {
        let state = state.clone();
        handle.listeners.add(&root, "mouseleave", move |_: web::MouseEvent| {
            state.borrow_mut().inside_document = false;
        })?;
    }
    {
        let state = state.clone();
        handle.listeners.add(&root, "mouseenter", move |_: web::MouseEvent| {
            state.borrow_mut().inside_document = true;
        })?;
    }
    {
        let state = state.clone();
        handle.start_loop(move |_| {
            let mut s = state.borrow_mut();
            let (w, h) = s.surface.size();
            let sample = s.pointer.sample();
            let frame = s.spotlight.step(sample, Vec2::new(w, h));
            s.hotspots.refresh();
            publish(&s, &frame);
            if let Err(e) = draw_echoes(&s, &frame) {
                log::warn!("[hero] draw failed: {e:#}");
                return false;
            }
            true
        })?;
    }
    let state_handle = state.clone();
    handle.on_dispose(move || {
        if let Ok(mut s) = state.try_borrow_mut() {
            s.hotspots.clear();
            s.surface.release();
            let style = s.host.style();
            for var in HERO_VARS {
                _ = style.remove_property(var);
            }
        }
    });

    log::info!("[hero] started at {w}x{h}");
    Ok(HeroSpotlight {
        handle,
        state: state_handle,
    })
}

fn load_image(src: &str) -> anyhow::Result<web::HtmlImageElement> {
    let img = web::HtmlImageElement::new().map_err(js_err)?;
    img.set_cross_origin(Some("anonymous"));
    img.set_src(src);
    Ok(img)
}

fn publish(s: &State, frame: &HeroFrame) {
    let visibility = HeroVisibility::new(
        s.inside_document,
        s.content_visible,
        s.hotspots
            .registry()
            .contains_kind(s.client, RegionKind::Hotspot),
    );
    let scale = s.spotlight.config().parallax_scale;
    let style = s.host.style();
    _ = style.set_property(HERO_VAR_SPOT_X, &format!("{}px", frame.spotlight.x));
    _ = style.set_property(HERO_VAR_SPOT_Y, &format!("{}px", frame.spotlight.y));
    _ = style.set_property(HERO_VAR_CURSOR_X, &format!("{}px", frame.cursor.x));
    _ = style.set_property(HERO_VAR_CURSOR_Y, &format!("{}px", frame.cursor.y));
    _ = style.set_property(HERO_VAR_SPOT_OPACITY, &visibility.spotlight.to_string());
    _ = style.set_property(HERO_VAR_CURSOR_OPACITY, &visibility.cursor.to_string());
    _ = style.set_property(
        HERO_VAR_IMAGE_TRANSFORM,
        &format!(
            "translate({}px, {}px) scale({})",
            frame.parallax.x, frame.parallax.y, scale
        ),
    );
}

/// Each echo is a circular window onto a saturated copy of the hero image,
/// placed where the parallax-shifted base image currently sits.
fn draw_echoes(s: &State, frame: &HeroFrame) -> anyhow::Result<()> {
    s.surface.clear();
    let Some(img) = s.image.as_ref() else {
        return Ok(());
    };
    if !img.complete() || img.natural_width() == 0 || s.spotlight.echoes().is_empty() {
        return Ok(());
    }
    let (w, h) = s.surface.size();
    let scale = s.spotlight.config().parallax_scale;
    let dest = Vec2::new(w, h) * scale;
    let origin = (Vec2::new(w, h) - dest) * 0.5 + frame.parallax;
    let natural = Vec2::new(img.natural_width() as f32, img.natural_height() as f32);
    let Some([sx, sy, sw, sh]) = cover_crop(natural, dest) else {
        return Ok(());
    };

    let ctx = s.surface.ctx();
    for echo in s.spotlight.echoes() {
        ctx.save();
        ctx.begin_path();
        ctx.arc(
            echo.position.x as f64,
            echo.position.y as f64,
            (echo.size * 0.5) as f64,
            0.0,
            TAU,
        )
        .map_err(js_err)?;
        ctx.clip();
        ctx.set_global_alpha(echo.opacity() as f64);
        ctx.set_filter(ECHO_FILTER);
        let drawn = ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                img,
                sx as f64,
                sy as f64,
                sw as f64,
                sh as f64,
                origin.x as f64,
                origin.y as f64,
                dest.x as f64,
                dest.y as f64,
            );
        ctx.restore();
        drawn.map_err(js_err)?;
    }
    Ok(())
}
