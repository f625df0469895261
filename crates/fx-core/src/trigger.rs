//! Trigger-once animations started by the first visibility signal.

use crate::constants::{COUNT_UP_DURATION_MS, COUNT_UP_VISIBILITY_THRESHOLD};
use crate::easing::ease_out_cubic;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    Triggered,
    Complete,
}

/// `Idle -> Triggered -> Complete`; never re-enters `Idle`.
#[derive(Clone, Copy, Debug)]
pub struct TriggerOnce {
    state: TriggerState,
    threshold: f64,
}

impl Default for TriggerOnce {
    fn default() -> Self {
        Self::new(COUNT_UP_VISIBILITY_THRESHOLD)
    }
}

impl TriggerOnce {
    pub fn new(threshold: f64) -> Self {
        Self {
            state: TriggerState::Idle,
            threshold,
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Feed a visibility signal (intersection ratio). Returns `true` exactly
    /// once: on the signal that moves the machine out of `Idle`.
    pub fn observe(&mut self, intersecting: bool, ratio: f64) -> bool {
        if self.state != TriggerState::Idle {
            return false;
        }
        if intersecting && ratio >= self.threshold {
            self.state = TriggerState::Triggered;
            return true;
        }
        false
    }

    pub fn complete(&mut self) {
        if self.state == TriggerState::Triggered {
            self.state = TriggerState::Complete;
        }
    }
}

/// Eased count from zero to `end` over `duration_ms`.
#[derive(Clone, Copy, Debug)]
pub struct CountUp {
    pub end: f64,
    pub duration_ms: f64,
    start_ms: Option<f64>,
}

impl CountUp {
    pub fn new(end: f64, duration_ms: Option<f64>) -> Self {
        let duration_ms = duration_ms
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(COUNT_UP_DURATION_MS);
        Self {
            end,
            duration_ms,
            start_ms: None,
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        self.start_ms.get_or_insert(now_ms);
    }

    pub fn is_started(&self) -> bool {
        self.start_ms.is_some()
    }

    pub fn progress(&self, now_ms: f64) -> f64 {
        match self.start_ms {
            Some(start) => ((now_ms - start) / self.duration_ms).clamp(0.0, 1.0),
            None => 0.0,
        }
    }

    /// Displayed integer at `now_ms`.
    pub fn value_at(&self, now_ms: f64) -> i64 {
        let eased = ease_out_cubic(self.progress(now_ms) as f32) as f64;
        (eased * self.end).round() as i64
    }

    pub fn is_done(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

pub fn format_count(value: i64, suffix: &str) -> String {
    format!("{value}{suffix}")
}
