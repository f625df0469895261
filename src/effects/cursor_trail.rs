use crate::canvas2d::Canvas2d;
use crate::constants::{
    CANVAS_DPR_CAP, TRAIL_DOT_ALPHA, TRAIL_RGB, TRAIL_RIBBON_HEAD_ALPHA, TRAIL_RING_ALPHA,
    TRAIL_RING_WIDTH,
};
use crate::core::color::rgba;
use crate::core::trail::{CursorTrail as Trail, TrailConfig};
use crate::core::PointerState;
use crate::dom::{self, js_err};
use crate::effects::load_config;
use crate::frame::EffectHandle;
use glam::Vec2;
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

struct State {
    surface: Canvas2d,
    trail: Trail,
    pointer: PointerState,
}

/// Cursor dot, lagging ring and a particle field that scatters under fast
/// pointer motion, drawn on a full-viewport 2D canvas.
#[wasm_bindgen]
pub struct CursorTrail {
    handle: EffectHandle,
}

#[wasm_bindgen]
impl CursorTrail {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: web::HtmlCanvasElement, config_json: Option<String>) -> Result<CursorTrail, JsValue> {
        build(canvas, config_json.as_deref()).map_err(dom::to_js)
    }

    pub fn dispose(&mut self) {
        self.handle.dispose();
    }
}

fn build(canvas: web::HtmlCanvasElement, config_json: Option<&str>) -> anyhow::Result<CursorTrail> {
    let cfg: TrailConfig = load_config("trail", config_json)?;
    let surface = Canvas2d::new(canvas, CANVAS_DPR_CAP)?;
    let (w, h) = surface.size();
    let state = Rc::new(RefCell::new(State {
        surface,
        trail: Trail::new(cfg, w, h),
        pointer: PointerState::new(Vec2::new(w * 0.5, h * 0.5)),
    }));

    let mut handle = EffectHandle::new("trail");
    let window = dom::window()?;
    {
        let state = state.clone();
        handle.listeners.add(&window, "resize", move |_: web::Event| {
            let mut s = state.borrow_mut();
            match s.surface.fit_window() {
                Ok((w, h)) => s.trail.resize(w, h),
                Err(e) => log::warn!("[trail] resize failed: {e:#}"),
            }
        })?;
    }
    {
        let state = state.clone();
        handle.listeners.add(&window, "pointermove", move |ev: web::PointerEvent| {
            let p = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
            let mut s = state.borrow_mut();
            if !s.pointer.has_moved() {
                s.pointer.rebase(p);
            }
            s.pointer.move_to(p);
        })?;
    }
    {
        let state = state.clone();
        handle.start_loop(move |_| {
            let mut s = state.borrow_mut();
            let sample = s.pointer.sample();
            s.trail.step(sample);
            if let Err(e) = draw(&s) {
                log::warn!("[trail] draw failed: {e:#}");
                return false;
            }
            true
        })?;
    }
    handle.on_dispose(move || {
        if let Ok(s) = state.try_borrow() {
            s.surface.release();
        }
    });

    log::info!("[trail] started at {w}x{h}");
    Ok(CursorTrail { handle })
}

fn draw(s: &State) -> anyhow::Result<()> {
    s.surface.clear();
    let ctx = s.surface.ctx();
    draw_particles(ctx, &s.trail);
    if !s.pointer.has_moved() {
        return Ok(());
    }
    draw_ribbon(ctx, &s.trail);
    draw_glow(ctx, &s.trail)?;

    let ring = s.trail.ring_center();
    ctx.begin_path();
    ctx.arc(
        ring.x as f64,
        ring.y as f64,
        (s.trail.ring_size() * 0.5) as f64,
        0.0,
        TAU,
    )
    .map_err(js_err)?;
    ctx.set_stroke_style_str(&rgba(TRAIL_RGB, TRAIL_RING_ALPHA));
    ctx.set_line_width(TRAIL_RING_WIDTH);
    ctx.stroke();

    let dot = s.trail.cursor();
    ctx.begin_path();
    ctx.arc(
        dot.x as f64,
        dot.y as f64,
        (s.trail.config().cursor_size * 0.5) as f64,
        0.0,
        TAU,
    )
    .map_err(js_err)?;
    ctx.set_fill_style_str(&rgba(TRAIL_RGB, TRAIL_DOT_ALPHA));
    ctx.fill();
    Ok(())
}

fn draw_particles(ctx: &web::CanvasRenderingContext2d, trail: &Trail) {
    for p in trail.particles().iter().filter(|p| p.is_visible()) {
        ctx.begin_path();
        if ctx
            .arc(p.position.x as f64, p.position.y as f64, p.radius() as f64, 0.0, TAU)
            .is_err()
        {
            continue;
        }
        ctx.set_fill_style_str(&rgba(TRAIL_RGB, p.alpha()));
        ctx.fill();
    }
}

fn draw_ribbon(ctx: &web::CanvasRenderingContext2d, trail: &Trail) {
    let Some(ribbon) = trail.ribbon() else {
        return;
    };
    ctx.begin_path();
    ctx.move_to(ribbon.start.x as f64, ribbon.start.y as f64);
    for (control, end) in &ribbon.curves {
        ctx.quadratic_curve_to(control.x as f64, control.y as f64, end.x as f64, end.y as f64);
    }
    let gradient = ctx.create_linear_gradient(
        ribbon.start.x as f64,
        ribbon.start.y as f64,
        ribbon.tail.x as f64,
        ribbon.tail.y as f64,
    );
    _ = gradient.add_color_stop(0.0, &rgba(TRAIL_RGB, TRAIL_RIBBON_HEAD_ALPHA));
    _ = gradient.add_color_stop(1.0, &rgba(TRAIL_RGB, 0.0));
    ctx.set_stroke_style_canvas_gradient(&gradient);
    ctx.set_line_width(ribbon.width as f64);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.stroke();
}

fn draw_glow(ctx: &web::CanvasRenderingContext2d, trail: &Trail) -> anyhow::Result<()> {
    let c = trail.cursor();
    let r = trail.glow_radius() as f64;
    let (cx, cy) = (c.x as f64, c.y as f64);
    let gradient = ctx
        .create_radial_gradient(cx, cy, 0.0, cx, cy, r)
        .map_err(js_err)?;
    _ = gradient.add_color_stop(0.0, &rgba(TRAIL_RGB, 0.06));
    _ = gradient.add_color_stop(0.5, &rgba(TRAIL_RGB, 0.02));
    _ = gradient.add_color_stop(1.0, &rgba(TRAIL_RGB, 0.0));
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(cx - r, cy - r, r * 2.0, r * 2.0);
    Ok(())
}
