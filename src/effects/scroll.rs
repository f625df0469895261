use crate::constants::{PARALLAX_ATTR, PARALLAX_SELECTOR};
use crate::core::scroll::{parallax_offset, SmoothScroll as Scroller, SmoothScrollConfig};
use crate::dom;
use crate::effects::load_config;
use crate::frame::EffectHandle;
use crate::input::parse_parallax_speed;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

// Pixels per line for wheel events reported in lines.
const WHEEL_LINE_PX: f32 = 16.0;
// Drift between the eased offset and the real one that counts as a scroll
// from outside (keyboard, scrollbar drag).
const EXTERNAL_SCROLL_PX: f32 = 1.0;

/// Page-wide smooth scrolling context. The root view constructs one and
/// hands it to whoever needs `progress()` or `scrollTo`; there is no global.
#[wasm_bindgen]
pub struct SmoothScroll {
    handle: EffectHandle,
    state: Rc<RefCell<Scroller>>,
}

#[wasm_bindgen]
impl SmoothScroll {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<SmoothScroll, JsValue> {
        build(config_json.as_deref()).map_err(dom::to_js)
    }

    /// Scroll progress in [0, 1] for progress bars.
    pub fn progress(&self) -> f32 {
        self.state.try_borrow().map(|s| s.progress()).unwrap_or(0.0)
    }

    #[wasm_bindgen(js_name = scrollTo)]
    pub fn scroll_to(&self, y: f32, immediate: bool) {
        let Ok(mut s) = self.state.try_borrow_mut() else {
            return;
        };
        if let Ok(window) = dom::window() {
            s.set_limit(scroll_limit(&window));
            s.scroll_to(y, immediate);
            if immediate {
                window.scroll_to_with_x_and_y(0.0, s.current() as f64);
            }
        }
    }

    pub fn dispose(&mut self) {
        self.handle.dispose();
    }
}

fn build(config_json: Option<&str>) -> anyhow::Result<SmoothScroll> {
    let cfg: SmoothScrollConfig = load_config("scroll", config_json)?;
    let window = dom::window()?;
    let mut scroller = Scroller::new(cfg);
    scroller.set_limit(scroll_limit(&window));
    scroller.sync(window.scroll_y().unwrap_or(0.0) as f32);
    let state = Rc::new(RefCell::new(scroller));

    let mut handle = EffectHandle::new("scroll");
    {
        let state = state.clone();
        let view = window.clone();
        handle
            .listeners
            .add_active(&window, "wheel", move |ev: web::WheelEvent| {
                if ev.ctrl_key() {
                    // Pinch zoom.
                    return;
                }
                ev.prevent_default();
                let dy = ev.delta_y() as f32;
                let dy = match ev.delta_mode() {
                    web::WheelEvent::DOM_DELTA_LINE => dy * WHEEL_LINE_PX,
                    web::WheelEvent::DOM_DELTA_PAGE => dy * dom::inner_size(&view).1,
                    _ => dy,
                };
                state.borrow_mut().on_wheel(dy);
            })?;
    }
    {
        let state = state.clone();
        let view = window.clone();
        handle.start_loop(move |_| {
            let mut s = state.borrow_mut();
            s.set_limit(scroll_limit(&view));
            let actual = view.scroll_y().unwrap_or(0.0) as f32;
            if s.is_settled() {
                if (actual - s.current()).abs() > EXTERNAL_SCROLL_PX {
                    s.sync(actual);
                }
            } else {
                let y = s.step();
                view.scroll_to_with_x_and_y(0.0, y as f64);
            }
            drop(s);
            update_parallax(&view);
            true
        })?;
    }
    handle.on_dispose(clear_parallax);

    log::info!("[scroll] smooth scroll started");
    Ok(SmoothScroll { handle, state })
}

fn scroll_limit(window: &web::Window) -> f32 {
    let doc_h = window
        .document()
        .and_then(|d| d.document_element())
        .map(|el| el.scroll_height() as f32)
        .unwrap_or(0.0);
    doc_h - dom::inner_size(window).1
}

fn parallax_elements() -> Vec<web::HtmlElement> {
    let Some(list) = dom::window_document().and_then(|d| d.query_selector_all(PARALLAX_SELECTOR).ok()) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<web::HtmlElement>().ok())
        .collect()
}

/// Re-queried every frame so elements mounted later are picked up.
fn update_parallax(window: &web::Window) {
    let view_h = dom::inner_size(window).1;
    for el in parallax_elements() {
        let speed = parse_parallax_speed(el.get_attribute(PARALLAX_ATTR).as_deref());
        let r = dom::element_rect(&el);
        let offset = parallax_offset(r.y, r.height, view_h, speed);
        dom::set_style(&el, "transform", &format!("translateY({offset}px)"));
    }
}

fn clear_parallax() {
    for el in parallax_elements() {
        _ = el.style().remove_property("transform");
    }
}
