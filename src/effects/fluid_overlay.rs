use crate::constants::{GPU_DPR_CAP, OVERLAY_CANVAS_CSS};
use crate::core::fluid::{CpuFluid, FluidConfig, FluidController};
use crate::dom::{self, js_err};
use crate::effects::load_config;
use crate::frame::EffectHandle;
use crate::input::{backing_size, client_to_uv};
use crate::render::fluid::FluidRenderer;
use glam::Vec2;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::Clamped;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// CPU solver painted into a 2D canvas at simulation resolution; the
/// browser stretches it over the container.
struct CpuOverlay {
    fluid: CpuFluid,
    ctx: web::CanvasRenderingContext2d,
    pixels: Vec<u8>,
}

impl CpuOverlay {
    fn new(canvas: &web::HtmlCanvasElement, resolution: u32) -> anyhow::Result<Self> {
        canvas.set_width(resolution);
        canvas.set_height(resolution);
        let ctx = dom::context_2d(canvas)?;
        Ok(Self {
            fluid: CpuFluid::new(resolution),
            ctx,
            pixels: Vec::new(),
        })
    }

    fn paint(&mut self) -> anyhow::Result<()> {
        self.fluid.paint_rgba(&mut self.pixels);
        let n = self.fluid.resolution() as u32;
        let image = web::ImageData::new_with_u8_clamped_array_and_sh(Clamped(&self.pixels[..]), n, n)
            .map_err(js_err)?;
        self.ctx.put_image_data(&image, 0.0, 0.0).map_err(js_err)
    }
}

enum Backend {
    /// Waiting for the WebGPU adapter.
    Pending,
    Gpu(FluidRenderer),
    Cpu(CpuOverlay),
    Stopped,
}

struct State {
    controller: FluidController,
    backend: Backend,
    container: web::Element,
    canvas: web::HtmlCanvasElement,
    last: Instant,
}

impl State {
    /// Swap the WebGPU canvas for a fresh 2D one running the CPU solver.
    fn fall_back_to_cpu(&mut self) {
        let resolution = self.controller.config().sim_resolution;
        let canvas = match dom::append_canvas(&self.container, OVERLAY_CANVAS_CSS) {
            Ok(c) => c,
            Err(e) => {
                log::error!("[fluid] cpu fallback failed: {e:#}");
                self.backend = Backend::Stopped;
                return;
            }
        };
        match CpuOverlay::new(&canvas, resolution) {
            Ok(overlay) => {
                dom::remove_element(&self.canvas);
                self.canvas = canvas;
                self.backend = Backend::Cpu(overlay);
                log::info!("[fluid] cpu solver running at {resolution}x{resolution}");
            }
            Err(e) => {
                dom::remove_element(&canvas);
                log::error!("[fluid] cpu fallback failed: {e:#}");
                self.backend = Backend::Stopped;
            }
        }
    }

    fn device_size(&self) -> (u32, u32) {
        let dpr = dom::window()
            .map(|w| dom::capped_dpr(&w, GPU_DPR_CAP))
            .unwrap_or(1.0);
        let (w, h) = backing_size(
            self.canvas.client_width() as f32,
            self.canvas.client_height() as f32,
            dpr,
        );
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }
        (w, h)
    }

    fn tick(&mut self) {
        let dt = self.last.elapsed().as_secs_f32();
        self.last = Instant::now();
        let size = match self.backend {
            Backend::Gpu(_) => self.device_size(),
            _ => (0, 0),
        };
        let failure = match &mut self.backend {
            Backend::Pending | Backend::Stopped => None,
            Backend::Gpu(renderer) => renderer.frame(&mut self.controller, dt, size).err(),
            Backend::Cpu(overlay) => {
                let (w, h) = (self.canvas.client_width(), self.canvas.client_height());
                if h > 0 {
                    overlay.fluid.set_aspect(w as f32 / h as f32);
                }
                self.controller.frame(&mut overlay.fluid, dt);
                overlay.paint().err()
            }
        };
        if let Some(e) = failure {
            log::error!("[fluid] frame failed, overlay stopped: {e:#}");
            self.backend = Backend::Stopped;
        }
    }
}

/// Fluid-distorted noise overlay appended to `container`. Runs on WebGPU
/// when available, otherwise on the CPU solver.
#[wasm_bindgen]
pub struct FluidOverlay {
    handle: EffectHandle,
}

#[wasm_bindgen]
impl FluidOverlay {
    #[wasm_bindgen(constructor)]
    pub fn new(container: web::Element, config_json: Option<String>) -> Result<FluidOverlay, JsValue> {
        build(container, config_json.as_deref()).map_err(dom::to_js)
    }

    pub fn dispose(&mut self) {
        self.handle.dispose();
    }
}

fn build(container: web::Element, config_json: Option<&str>) -> anyhow::Result<FluidOverlay> {
    let cfg: FluidConfig = load_config("fluid", config_json)?;
    let resolution = cfg.sim_resolution;
    let canvas = dom::append_canvas(&container, OVERLAY_CANVAS_CSS)?;
    let state = Rc::new(RefCell::new(State {
        controller: FluidController::new(cfg),
        backend: Backend::Pending,
        container,
        canvas: canvas.clone(),
        last: Instant::now(),
    }));

    let mut handle = EffectHandle::new("fluid");
    let window = dom::window()?;
    {
        let state = state.clone();
        handle.listeners.add(&window, "pointermove", move |ev: web::PointerEvent| {
            let mut s = state.borrow_mut();
            let r = dom::element_rect(&s.container);
            let client = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
            let uv = client_to_uv(client, r.x, r.y, r.width, r.height);
            s.controller.set_pointer(uv);
        })?;
    }
    {
        let state = state.clone();
        handle.start_loop(move |_| {
            state.borrow_mut().tick();
            true
        })?;
    }
    {
        let lifecycle = handle.lifecycle();
        let weak = Rc::downgrade(&state);
        spawn_local(async move {
            let result = FluidRenderer::new(&canvas, resolution).await;
            // Disposed while waiting: the renderer drops here with its textures.
            if lifecycle.is_disposed() {
                return;
            }
            let Some(state) = weak.upgrade() else {
                return;
            };
            let mut s = state.borrow_mut();
            match result {
                Ok(renderer) => s.backend = Backend::Gpu(renderer),
                Err(e) => {
                    log::warn!("[fluid] WebGPU unavailable ({e:#}), using cpu solver");
                    s.fall_back_to_cpu();
                }
            }
        });
    }
    handle.on_dispose(move || {
        if let Ok(mut s) = state.try_borrow_mut() {
            s.backend = Backend::Stopped;
            dom::remove_element(&s.canvas);
        }
    });

    log::info!("[fluid] overlay created");
    Ok(FluidOverlay { handle })
}
