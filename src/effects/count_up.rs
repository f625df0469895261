use crate::core::constants::COUNT_UP_VISIBILITY_THRESHOLD;
use crate::core::trigger::{format_count, CountUp as Counter, TriggerOnce};
use crate::core::Lifecycle;
use crate::dom::{self, js_err};
use crate::frame::{EffectHandle, RafLoop};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, web::IntersectionObserver)>;

struct State {
    element: web::Element,
    trigger: TriggerOnce,
    counter: Counter,
    suffix: String,
    raf: Option<RafLoop>,
}

impl State {
    fn render(&self, value: i64) {
        self.element
            .set_text_content(Some(&format_count(value, &self.suffix)));
    }
}

/// Number that counts up from zero the first time its element is at least
/// 30% visible. Runs once; scrolling away and back does not restart it.
#[wasm_bindgen]
pub struct CountUp {
    handle: EffectHandle,
}

#[wasm_bindgen]
impl CountUp {
    #[wasm_bindgen(constructor)]
    pub fn new(
        element: web::Element,
        end: f64,
        suffix: Option<String>,
        duration_ms: Option<f64>,
    ) -> Result<CountUp, JsValue> {
        build(element, end, suffix.unwrap_or_default(), duration_ms).map_err(dom::to_js)
    }

    pub fn dispose(&mut self) {
        self.handle.dispose();
    }
}

fn build(
    element: web::Element,
    end: f64,
    suffix: String,
    duration_ms: Option<f64>,
) -> anyhow::Result<CountUp> {
    if !end.is_finite() {
        anyhow::bail!("count-up end must be finite, got {end}");
    }
    let state = Rc::new(RefCell::new(State {
        element: element.clone(),
        trigger: TriggerOnce::new(COUNT_UP_VISIBILITY_THRESHOLD),
        counter: Counter::new(end, duration_ms),
        suffix,
        raf: None,
    }));
    state.borrow().render(0);

    let mut handle = EffectHandle::new("count-up");
    let lifecycle = handle.lifecycle();
    let weak = Rc::downgrade(&state);
    let callback: ObserverCallback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, observer: web::IntersectionObserver| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let mut s = state.borrow_mut();
            let fired = entries
                .iter()
                .filter_map(|e| e.dyn_into::<web::IntersectionObserverEntry>().ok())
                .any(|e| s.trigger.observe(e.is_intersecting(), e.intersection_ratio()));
            if !fired {
                return;
            }
            observer.unobserve(&s.element);
            match RafLoop::start(lifecycle.clone(), animate(Rc::downgrade(&state), lifecycle.clone())) {
                Ok(raf) => s.raf = Some(raf),
                Err(e) => log::warn!("[count-up] could not start animation: {e:#}"),
            }
        },
    )
        as Box<dyn FnMut(js_sys::Array, web::IntersectionObserver)>);

    let init = web::IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(COUNT_UP_VISIBILITY_THRESHOLD));
    let observer =
        web::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(js_err)?;
    observer.observe(&element);

    handle.on_dispose(move || {
        observer.disconnect();
        dom::defer_drop(callback);
        if let Ok(mut s) = state.try_borrow_mut() {
            s.raf.take();
        }
    });
    Ok(CountUp { handle })
}

/// Per-frame tick: the first frame's timestamp is the animation start.
fn animate(state: Weak<RefCell<State>>, lifecycle: Rc<Lifecycle>) -> impl FnMut(f64) -> bool {
    move |now_ms| {
        let Some(state) = state.upgrade() else {
            return false;
        };
        if lifecycle.is_disposed() {
            return false;
        }
        let mut s = state.borrow_mut();
        s.counter.start(now_ms);
        let value = s.counter.value_at(now_ms);
        s.render(value);
        if s.counter.is_done(now_ms) {
            s.trigger.complete();
            log::debug!("[count-up] reached {value}");
            return false;
        }
        true
    }
}
