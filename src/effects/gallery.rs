use crate::constants::*;
use crate::core::constants::{GALLERY_PLANE_HEIGHT, GALLERY_PLANE_WIDTH};
use crate::core::gallery::{Gallery, GalleryConfig, GalleryItem, LabelMetrics};
use crate::dom::{self, js_err, Listeners};
use crate::effects::load_config;
use crate::frame::EffectHandle;
use crate::input::{backing_size, client_to_local, cover_crop};
use crate::render::gallery::GalleryRenderer;
use anyhow::Context;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

struct State {
    gallery: Gallery,
    items: Vec<GalleryItem>,
    renderer: Option<GalleryRenderer>,
    canvas: web::HtmlCanvasElement,
    // One load and one error listener per pending image.
    image_loads: Listeners,
    on_select: Option<js_sys::Function>,
}

impl State {
    fn tick(&mut self) {
        let css = Vec2::new(
            self.canvas.client_width() as f32,
            self.canvas.client_height() as f32,
        );
        self.gallery.resize(css.x, css.y);
        self.gallery.step();
        if self.gallery.is_empty() {
            return;
        }
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let dpr = dom::window()
            .map(|w| dom::capped_dpr(&w, GPU_DPR_CAP))
            .unwrap_or(1.0);
        let (w, h) = backing_size(css.x, css.y, dpr);
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }
        if let Err(e) = renderer.render(&self.gallery, (w, h)) {
            log::error!("[gallery] render error, renderer dropped: {e:#}");
            self.renderer = None;
        }
    }
}

/// Drag- and scroll-driven 3D ring of image cards with captions, rendered
/// with WebGPU into a canvas appended to `container`.
#[wasm_bindgen]
pub struct CircularGallery {
    handle: EffectHandle,
    state: Rc<RefCell<State>>,
}

#[wasm_bindgen]
impl CircularGallery {
    /// `items_json` is an array of `{ "image": url, "text": caption }`.
    /// `on_select` receives the index of a clicked item.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: web::Element,
        items_json: String,
        config_json: Option<String>,
        on_select: Option<js_sys::Function>,
    ) -> Result<CircularGallery, JsValue> {
        build(container, &items_json, config_json.as_deref(), on_select).map_err(dom::to_js)
    }

    /// External scroll progress in [0, 1].
    pub fn update(&self, progress: f32) {
        if let Ok(mut s) = self.state.try_borrow_mut() {
            s.gallery.update_progress(progress);
        }
    }

    pub fn dispose(&mut self) {
        self.handle.dispose();
    }
}

fn build(
    container: web::Element,
    items_json: &str,
    config_json: Option<&str>,
    on_select: Option<js_sys::Function>,
) -> anyhow::Result<CircularGallery> {
    let cfg: GalleryConfig = load_config("gallery", config_json)?;
    let items: Vec<GalleryItem> =
        serde_json::from_str(items_json).context("gallery items must be a JSON array")?;
    let canvas = dom::append_canvas(&container, GALLERY_CANVAS_CSS)?;
    dom::set_style(&canvas, "cursor", CURSOR_GRAB);

    let state = Rc::new(RefCell::new(State {
        gallery: Gallery::new(cfg, items.len()),
        items,
        renderer: None,
        canvas: canvas.clone(),
        image_loads: Listeners::new(),
        on_select,
    }));

    let mut handle = EffectHandle::new("gallery");
    let window = dom::window()?;
    {
        let state = state.clone();
        handle.listeners.add(&canvas, "pointerdown", move |ev: web::PointerEvent| {
            let mut s = state.borrow_mut();
            s.gallery.pointer_down(ev.client_x() as f32);
            dom::set_style(&s.canvas, "cursor", CURSOR_GRABBING);
        })?;
    }
    {
        let state = state.clone();
        handle.listeners.add(&window, "pointermove", move |ev: web::PointerEvent| {
            state.borrow_mut().gallery.pointer_move(ev.client_x() as f32);
        })?;
    }
    {
        let state = state.clone();
        handle.listeners.add(&window, "pointerup", move |ev: web::PointerEvent| {
            let selected = {
                let mut s = state.borrow_mut();
                if !s.gallery.is_dragging() {
                    return;
                }
                dom::set_style(&s.canvas, "cursor", CURSOR_GRAB);
                let client = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
                if !s.gallery.pointer_up(client.x) {
                    return;
                }
                let r = dom::element_rect(&s.canvas);
                let local = client_to_local(client, r.x, r.y);
                match s.gallery.hit_test_pixel(local, Vec2::new(r.width, r.height)) {
                    Some(index) => s.on_select.clone().map(|cb| (index, cb)),
                    None => None,
                }
            };
            // The callback may call back into this effect; the borrow is released.
            if let Some((index, cb)) = selected {
                log::info!("[gallery] selected item {index}");
                if let Err(e) = cb.call1(&JsValue::NULL, &JsValue::from(index as u32)) {
                    log::warn!("[gallery] select callback threw: {e:?}");
                }
            }
        })?;
    }
    {
        let state = state.clone();
        handle.listeners.add(&window, "pointercancel", move |_: web::PointerEvent| {
            let mut s = state.borrow_mut();
            s.gallery.cancel_drag();
            dom::set_style(&s.canvas, "cursor", CURSOR_GRAB);
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
        let count = state.borrow().items.len();
        spawn_local(async move {
            let result = GalleryRenderer::new(&canvas, count).await;
            if lifecycle.is_disposed() {
                return;
            }
            let Some(state) = weak.upgrade() else {
                return;
            };
            match result {
                Ok(renderer) => {
                    state.borrow_mut().renderer = Some(renderer);
                    upload_labels(&state);
                    load_images(&state);
                }
                Err(e) => log::warn!("[gallery] WebGPU unavailable, gallery stays empty: {e:#}"),
            }
        });
    }
    {
        let state = state.clone();
        handle.on_dispose(move || {
            if let Ok(mut s) = state.try_borrow_mut() {
                s.image_loads.clear();
                s.renderer = None;
                dom::remove_element(&s.canvas);
            }
        });
    }

    log::info!("[gallery] created with {} items", state.borrow().items.len());
    Ok(CircularGallery { handle, state })
}

/// Rasterize `text` in white into a buffer sized to its measured metrics.
fn rasterize_label(text: &str, font: &str, dpr: f64) -> anyhow::Result<(u32, u32, Vec<u8>, LabelMetrics)> {
    let (canvas, ctx) = dom::offscreen_canvas(1, 1)?;
    ctx.set_font(font);
    let text_width = ctx.measure_text(text).map_err(js_err)?.width();
    let metrics = LabelMetrics::new(text_width as f32, font);
    let (w, h) = backing_size(metrics.width, metrics.height, dpr);
    canvas.set_width(w);
    canvas.set_height(h);
    // Resizing resets the context state.
    ctx.scale(dpr, dpr).map_err(js_err)?;
    ctx.set_font(font);
    ctx.set_fill_style_str("#ffffff");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(
        text,
        metrics.width as f64 * 0.5,
        metrics.height as f64 * 0.5,
    )
    .map_err(js_err)?;
    let data = ctx
        .get_image_data(0.0, 0.0, w as f64, h as f64)
        .map_err(js_err)?;
    Ok((w, h, data.data().0, metrics))
}

fn upload_labels(state: &Rc<RefCell<State>>) {
    let dpr = dom::window()
        .map(|w| dom::capped_dpr(&w, LABEL_DPR_CAP))
        .unwrap_or(1.0);
    let mut s = state.borrow_mut();
    let s = &mut *s;
    let Some(renderer) = s.renderer.as_mut() else {
        return;
    };
    let font = &s.gallery.config().font;
    for (i, item) in s.items.iter().enumerate() {
        match rasterize_label(&item.text, font, dpr) {
            Ok((w, h, pixels, metrics)) => renderer.set_label(i, w, h, &pixels, metrics.world_size()),
            Err(e) => log::warn!("[gallery] label {i} not rasterized: {e:#}"),
        }
    }
}

/// Decode a loaded image into RGBA at the card aspect ratio, cover-cropped
/// and capped in size.
fn image_pixels(img: &web::HtmlImageElement) -> anyhow::Result<(u32, u32, Vec<u8>)> {
    let natural = Vec2::new(img.natural_width() as f32, img.natural_height() as f32);
    let aspect = GALLERY_PLANE_WIDTH / GALLERY_PLANE_HEIGHT;
    let h = natural
        .y
        .min(natural.x / aspect)
        .min(GALLERY_MAX_TEXTURE_PX as f32)
        .round()
        .max(1.0);
    let w = (h * aspect).round().max(1.0);
    let [sx, sy, sw, sh] =
        cover_crop(natural, Vec2::new(w, h)).ok_or_else(|| anyhow::anyhow!("image has no pixels"))?;
    let (w, h) = (w as u32, h as u32);
    let (_canvas, ctx) = dom::offscreen_canvas(w, h)?;
    ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
        img,
        sx as f64,
        sy as f64,
        sw as f64,
        sh as f64,
        0.0,
        0.0,
        w as f64,
        h as f64,
    )
    .map_err(js_err)?;
    // Throws for cross-origin images served without CORS headers.
    let data = ctx
        .get_image_data(0.0, 0.0, w as f64, h as f64)
        .map_err(js_err)?;
    Ok((w, h, data.data().0))
}

fn load_images(state: &Rc<RefCell<State>>) {
    let sources: Vec<String> = state.borrow().items.iter().map(|i| i.image.clone()).collect();
    for (index, src) in sources.into_iter().enumerate() {
        if let Err(e) = load_image(state, index, &src) {
            log::warn!("[gallery] image {index} not requested: {e:#}");
        }
    }
}

fn load_image(state: &Rc<RefCell<State>>, index: usize, src: &str) -> anyhow::Result<()> {
    let img = web::HtmlImageElement::new().map_err(js_err)?;
    img.set_cross_origin(Some("anonymous"));
    let mut s = state.borrow_mut();
    {
        let weak = Rc::downgrade(state);
        let loaded = img.clone();
        s.image_loads.add(&img, "load", move |_: web::Event| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            match image_pixels(&loaded) {
                Ok((w, h, pixels)) => {
                    if let Some(r) = state.borrow_mut().renderer.as_mut() {
                        r.set_image(index, w, h, &pixels);
                    }
                }
                Err(e) => log::warn!("[gallery] image {index} unreadable: {e:#}"),
            }
        })?;
    }
    {
        let src = src.to_string();
        s.image_loads.add(&img, "error", move |_: web::Event| {
            log::warn!("[gallery] image {index} failed to load: {src}");
        })?;
    }
    img.set_src(src);
    Ok(())
}
