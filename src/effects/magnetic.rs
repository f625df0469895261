use crate::constants::{MAGNETIC_RESET, MAGNETIC_TRANSITION};
use crate::core::constants::MAGNETIC_STRENGTH;
use crate::core::cursor::{magnetic_offset, translate_css};
use crate::dom;
use crate::frame::EffectHandle;
use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys as web;

/// Pulls an element toward the pointer while the pointer is over it and
/// springs back through a CSS transition when it leaves.
#[wasm_bindgen]
pub struct MagneticButton {
    handle: EffectHandle,
}

#[wasm_bindgen]
impl MagneticButton {
    #[wasm_bindgen(constructor)]
    pub fn new(element: web::HtmlElement, strength: Option<f32>) -> Result<MagneticButton, JsValue> {
        build(element, strength).map_err(dom::to_js)
    }

    pub fn dispose(&mut self) {
        self.handle.dispose();
    }
}

fn build(element: web::HtmlElement, strength: Option<f32>) -> anyhow::Result<MagneticButton> {
    let strength = match strength {
        Some(s) if s.is_finite() => s,
        Some(s) => anyhow::bail!("magnetic strength must be finite, got {s}"),
        None => MAGNETIC_STRENGTH,
    };
    dom::set_style(&element, "transition", MAGNETIC_TRANSITION);

    let mut handle = EffectHandle::new("magnetic");
    {
        let el = element.clone();
        handle.listeners.add(&element, "mousemove", move |ev: web::MouseEvent| {
            let p = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
            let offset = magnetic_offset(dom::element_rect(&el), p, strength);
            dom::set_style(&el, "transform", &translate_css(offset));
        })?;
    }
    {
        let el = element.clone();
        handle.listeners.add(&element, "mouseleave", move |_: web::MouseEvent| {
            dom::set_style(&el, "transform", MAGNETIC_RESET);
        })?;
    }
    handle.on_dispose(move || {
        dom::set_style(&element, "transform", MAGNETIC_RESET);
        _ = element.style().remove_property("transition");
    });
    Ok(MagneticButton { handle })
}
