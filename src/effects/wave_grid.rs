use crate::canvas2d::Canvas2d;
use crate::constants::CANVAS_DPR_CAP;
use crate::core::color::rgba;
use crate::core::constants::WAVE_PULSE_ALPHA;
use crate::core::wave_grid::{WaveGrid as Grid, WaveGridConfig, WaveLine};
use crate::dom;
use crate::effects::load_config;
use crate::frame::EffectHandle;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

struct State {
    surface: Canvas2d,
    grid: Grid,
    rgb: [u8; 3],
}

/// Full-viewport grid of sine-wave lines bent away from the cursor.
#[wasm_bindgen]
pub struct WaveGrid {
    handle: EffectHandle,
}

#[wasm_bindgen]
impl WaveGrid {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: web::HtmlCanvasElement, config_json: Option<String>) -> Result<WaveGrid, JsValue> {
        build(canvas, config_json.as_deref()).map_err(dom::to_js)
    }

    pub fn dispose(&mut self) {
        self.handle.dispose();
    }
}

fn build(canvas: web::HtmlCanvasElement, config_json: Option<&str>) -> anyhow::Result<WaveGrid> {
    let cfg: WaveGridConfig = load_config("wave-grid", config_json)?;
    let surface = Canvas2d::new(canvas, CANVAS_DPR_CAP)?;
    let (w, h) = surface.size();
    let rgb = cfg.rgb();
    let state = Rc::new(RefCell::new(State {
        surface,
        grid: Grid::new(cfg, w, h),
        rgb,
    }));

    let mut handle = EffectHandle::new("wave-grid");
    let window = dom::window()?;
    {
        let state = state.clone();
        handle.listeners.add(&window, "resize", move |_: web::Event| {
            let mut s = state.borrow_mut();
            match s.surface.fit_window() {
                Ok((w, h)) => s.grid.resize(w, h),
                Err(e) => log::warn!("[wave-grid] resize failed: {e:#}"),
            }
        })?;
    }
    {
        let state = state.clone();
        handle.listeners.add(&window, "pointermove", move |ev: web::PointerEvent| {
            let p = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
            state.borrow_mut().grid.set_pointer(p);
        })?;
    }
    {
        let state = state.clone();
        handle.start_loop(move |_| {
            let mut s = state.borrow_mut();
            s.grid.advance();
            draw(&s);
            true
        })?;
    }
    handle.on_dispose(move || {
        if let Ok(s) = state.try_borrow() {
            s.surface.release();
        }
    });

    log::info!("[wave-grid] started at {w}x{h}");
    Ok(WaveGrid { handle })
}

fn draw(s: &State) {
    s.surface.clear();
    let ctx = s.surface.ctx();
    let base_width = s.grid.config().line_width as f64;
    for line in s.grid.frame() {
        stroke_polyline(ctx, &line.points);
        ctx.set_line_width(base_width);
        ctx.set_stroke_style_str(&rgba(s.rgb, line.alpha));
        ctx.stroke();
        draw_highlights(ctx, &line, s.rgb);
    }
}

fn draw_highlights(ctx: &web::CanvasRenderingContext2d, line: &WaveLine, rgb: [u8; 3]) {
    if line.highlights.is_empty() {
        return;
    }
    ctx.set_stroke_style_str(&rgba(rgb, WAVE_PULSE_ALPHA));
    for hl in &line.highlights {
        let Some(points) = line.points.get(hl.points.clone()) else {
            continue;
        };
        stroke_polyline(ctx, points);
        ctx.set_line_width(hl.width as f64);
        ctx.stroke();
    }
}

fn stroke_polyline(ctx: &web::CanvasRenderingContext2d, points: &[Vec2]) {
    ctx.begin_path();
    for (k, p) in points.iter().enumerate() {
        if k == 0 {
            ctx.move_to(p.x as f64, p.y as f64);
        } else {
            ctx.line_to(p.x as f64, p.y as f64);
        }
    }
}
