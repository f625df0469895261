use std::cell::Cell;

/// Disposed flag shared by an effect's frame callback, async initializer and
/// `dispose()`.
///
/// Every frame checks `is_disposed()` before touching a resource; async
/// setup checks it again after each suspension point.
#[derive(Debug, Default)]
pub struct Lifecycle {
    disposed: Cell<bool>,
    frames: Cell<u64>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Flip to disposed. Returns `true` only for the call that performed the
    /// transition, so teardown runs exactly once.
    pub fn dispose(&self) -> bool {
        !self.disposed.replace(true)
    }

    /// Gate for a frame callback: returns `false` once disposed, otherwise
    /// counts the frame and lets it through.
    pub fn begin_frame(&self) -> bool {
        if self.disposed.get() {
            return false;
        }
        self.frames.set(self.frames.get().wrapping_add(1));
        true
    }

    pub fn frames(&self) -> u64 {
        self.frames.get()
    }
}
