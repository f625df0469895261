use crate::dom::{self, js_err};
use web_sys as web;

/// A 2D canvas sized to the window in logical pixels, with the context
/// transform pre-scaled by the capped device pixel ratio.
pub struct Canvas2d {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    dpr_cap: f64,
    width: f32,
    height: f32,
}

impl Canvas2d {
    pub fn new(canvas: web::HtmlCanvasElement, dpr_cap: f64) -> anyhow::Result<Self> {
        let ctx = dom::context_2d(&canvas)?;
        let mut c = Self {
            canvas,
            ctx,
            dpr_cap,
            width: 0.0,
            height: 0.0,
        };
        c.fit_window()?;
        Ok(c)
    }

    pub fn ctx(&self) -> &web::CanvasRenderingContext2d {
        &self.ctx
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Match the window's inner size. Returns the new logical size.
    pub fn fit_window(&mut self) -> anyhow::Result<(f32, f32)> {
        let window = dom::window()?;
        let (w, h) = dom::inner_size(&window);
        let dpr = dom::capped_dpr(&window, self.dpr_cap);
        self.resize(w, h, dpr)?;
        Ok((w, h))
    }

    pub fn resize(&mut self, css_w: f32, css_h: f32, dpr: f64) -> anyhow::Result<()> {
        dom::sync_canvas_backing_size(&self.canvas, css_w, css_h, dpr);
        self.ctx
            .set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
            .map_err(js_err)?;
        self.width = css_w;
        self.height = css_h;
        Ok(())
    }

    pub fn clear(&self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.width as f64, self.height as f64);
    }

    /// Shrink the backing store to free its memory. The element itself
    /// belongs to the host view.
    pub fn release(&self) {
        self.clear();
        self.canvas.set_width(0);
        self.canvas.set_height(0);
    }
}
