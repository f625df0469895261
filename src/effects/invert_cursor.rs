use crate::core::cursor::{InvertConfig, InvertFollower};
use crate::core::regions::{RegionId, RegionKind};
use crate::dom;
use crate::effects::load_config;
use crate::frame::EffectHandle;
use crate::zones::Zones;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

const STYLE_PROPS: [&str; 6] = ["width", "height", "left", "top", "transform", "opacity"];

struct State {
    element: web::HtmlElement,
    follower: InvertFollower,
    zones: Zones,
}

/// Large circle that trails the pointer with a blend mode set by the host
/// CSS. It is shown only over `invert` zones that are not inside a `block`
/// zone, and grows with pointer speed.
#[wasm_bindgen]
pub struct InvertCursor {
    handle: EffectHandle,
    state: Rc<RefCell<State>>,
}

#[wasm_bindgen]
impl InvertCursor {
    #[wasm_bindgen(constructor)]
    pub fn new(element: web::HtmlElement, config_json: Option<String>) -> Result<InvertCursor, JsValue> {
        build(element, config_json.as_deref()).map_err(dom::to_js)
    }

    /// `kind` is `"invert"` or `"block"`.
    #[wasm_bindgen(js_name = registerZone)]
    pub fn register_zone(&self, el: web::Element, kind: &str) -> Result<u32, JsValue> {
        let kind = match RegionKind::parse(kind) {
            Some(k @ (RegionKind::Invert | RegionKind::Block)) => k,
            _ => return Err(JsValue::from_str(&format!("unknown zone kind {kind:?}"))),
        };
        Ok(self.state.borrow_mut().zones.register(el, kind).0)
    }

    #[wasm_bindgen(js_name = unregisterZone)]
    pub fn unregister_zone(&self, id: u32) -> bool {
        self.state.borrow_mut().zones.unregister(RegionId(id))
    }

    pub fn dispose(&mut self) {
        self.handle.dispose();
    }
}

fn build(element: web::HtmlElement, config_json: Option<&str>) -> anyhow::Result<InvertCursor> {
    let cfg: InvertConfig = load_config("cursor", config_json)?;
    let size = format!("{}px", cfg.base_size);
    dom::set_style(&element, "width", &size);
    dom::set_style(&element, "height", &size);
    dom::set_style(&element, "opacity", "0");
    let state = Rc::new(RefCell::new(State {
        element,
        follower: InvertFollower::new(cfg),
        zones: Zones::new(),
    }));

    let mut handle = EffectHandle::new("cursor");
    let window = dom::window()?;
    let root = dom::document()?
        .document_element()
        .ok_or_else(|| anyhow::anyhow!("no document element"))?;
    {
        let state = state.clone();
        handle.listeners.add(&window, "pointermove", move |ev: web::PointerEvent| {
            let p = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
            state.borrow_mut().follower.pointer_move(p);
        })?;
    }
    {
        let state = state.clone();
        handle.listeners.add(&root, "mouseleave", move |_: web::MouseEvent| {
            state.borrow_mut().follower.pointer_leave();
        })?;
    }
    {
        let state = state.clone();
        handle.listeners.add(&root, "mouseenter", move |_: web::MouseEvent| {
            state.borrow_mut().follower.pointer_enter();
        })?;
    }
    {
        let state = state.clone();
        handle.start_loop(move |_| {
            let mut s = state.borrow_mut();
            s.zones.refresh();
            let State {
                element,
                follower,
                zones,
            } = &mut *s;
            match follower.step(zones.registry()) {
                Some(frame) => {
                    dom::set_style(element, "left", &format!("{}px", frame.position.x));
                    dom::set_style(element, "top", &format!("{}px", frame.position.y));
                    dom::set_style(
                        element,
                        "transform",
                        &format!("translate(-50%, -50%) scale({:.3})", frame.scale),
                    );
                    dom::set_style(element, "opacity", if frame.visible { "1" } else { "0" });
                }
                None => dom::set_style(element, "opacity", "0"),
            }
            true
        })?;
    }
    let state_handle = state.clone();
    handle.on_dispose(move || {
        if let Ok(mut s) = state.try_borrow_mut() {
            s.zones.clear();
            let style = s.element.style();
            for prop in STYLE_PROPS {
                _ = style.remove_property(prop);
            }
        }
    });

    log::info!("[cursor] invert follower started");
    Ok(InvertCursor {
        handle,
        state: state_handle,
    })
}
