use glam::Vec2;

/// Pointer position written by event handlers and sampled once per frame.
#[derive(Clone, Copy, Debug)]
pub struct PointerState {
    pub position: Vec2,
    previous: Vec2,
    has_moved: bool,
}

/// Per-frame view of the pointer: where it is and how far it moved since the
/// previous sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub position: Vec2,
    pub delta: Vec2,
    pub speed: f32,
}

impl PointerState {
    /// `initial` is the safe default used until the first event arrives
    /// (typically the surface center).
    pub fn new(initial: Vec2) -> Self {
        Self {
            position: initial,
            previous: initial,
            has_moved: false,
        }
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
        self.has_moved = true;
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Take the frame sample and roll `previous` forward. Speed is the
    /// Euclidean distance between consecutive samples, never negative.
    pub fn sample(&mut self) -> PointerSample {
        let delta = self.position - self.previous;
        self.previous = self.position;
        PointerSample {
            position: self.position,
            delta,
            speed: delta.length(),
        }
    }

    /// Reset the motion baseline, e.g. after the pointer re-enters the window.
    pub fn rebase(&mut self, position: Vec2) {
        self.position = position;
        self.previous = position;
    }
}
