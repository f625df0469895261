use crate::core::Lifecycle;
use crate::dom::{self, Listeners};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Self-rescheduling `requestAnimationFrame` loop.
///
/// The tick only runs while the shared [`Lifecycle`] is live and returns
/// `false` to stop rescheduling; `cancel` cancels the pending frame so
/// nothing runs after disposal.
pub struct RafLoop {
    handle: Rc<Cell<Option<i32>>>,
    slot: TickSlot,
}

impl RafLoop {
    pub fn start(
        lifecycle: Rc<Lifecycle>,
        mut tick: impl FnMut(f64) -> bool + 'static,
    ) -> anyhow::Result<Self> {
        let window = dom::window()?;
        let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let slot: TickSlot = Rc::new(RefCell::new(None));

        let weak_slot = Rc::downgrade(&slot);
        let handle_tick = handle.clone();
        *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp_ms: f64| {
            handle_tick.set(None);
            if !lifecycle.begin_frame() {
                return;
            }
            let keep_going = tick(timestamp_ms);
            // The tick may have disposed its own effect.
            if !keep_going || lifecycle.is_disposed() {
                return;
            }
            let Some(slot) = weak_slot.upgrade() else {
                return;
            };
            let Some(w) = web::window() else {
                return;
            };
            if let Some(cb) = slot.borrow().as_ref() {
                if let Ok(id) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    handle_tick.set(Some(id));
                }
            }
        }) as Box<dyn FnMut(f64)>));

        let id = {
            let borrowed = slot.borrow();
            let cb = borrowed
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("frame callback missing"))?;
            window
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .map_err(dom::js_err)?
        };
        handle.set(Some(id));
        Ok(Self { handle, slot })
    }

    pub fn cancel(&self) {
        if let Some(id) = self.handle.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
        if let Some(cb) = self.slot.borrow_mut().take() {
            dom::defer_drop(cb);
        }
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Everything an effect must tear down, in teardown order: the disposed
/// flag, the frame loop, listeners, then effect-specific resources.
pub struct EffectHandle {
    name: &'static str,
    lifecycle: Rc<Lifecycle>,
    raf: Option<RafLoop>,
    pub listeners: Listeners,
    cleanup: Vec<Box<dyn FnOnce()>>,
}

impl EffectHandle {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            lifecycle: Rc::new(Lifecycle::new()),
            raf: None,
            listeners: Listeners::new(),
            cleanup: Vec::new(),
        }
    }

    pub fn lifecycle(&self) -> Rc<Lifecycle> {
        self.lifecycle.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle.is_disposed()
    }

    pub fn start_loop(&mut self, tick: impl FnMut(f64) -> bool + 'static) -> anyhow::Result<()> {
        self.raf = Some(RafLoop::start(self.lifecycle.clone(), tick)?);
        Ok(())
    }

    /// Register a release step run once by `dispose`.
    pub fn on_dispose(&mut self, f: impl FnOnce() + 'static) {
        self.cleanup.push(Box::new(f));
    }

    /// Idempotent: the first call tears everything down, later calls return
    /// `false` and do nothing.
    pub fn dispose(&mut self) -> bool {
        if !self.lifecycle.dispose() {
            return false;
        }
        if let Some(raf) = self.raf.take() {
            raf.cancel();
        }
        self.listeners.clear();
        for f in self.cleanup.drain(..) {
            f();
        }
        log::info!("[{}] disposed", self.name);
        true
    }
}

impl Drop for EffectHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}
