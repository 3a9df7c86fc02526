// GroupScout - core/debounce.rs
//
// Trailing-edge debounce timer.
//
// Every trigger replaces the pending value and re-arms the deadline; the value
// is released by the first tick at or after the deadline. The caller supplies
// the clock, so the timer is deterministic under test.

use std::time::{Duration, Instant};

/// Collapses bursts of triggers into a single trailing value.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            deadline: None,
        }
    }

    /// Arm the timer with `value`, discarding any value already pending.
    pub fn trigger_at(&mut self, value: T, now: Instant) {
        self.pending = Some(value);
        self.deadline = Some(now + self.window);
    }

    /// Release the pending value if its quiet period has elapsed.
    pub fn tick_at(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        self.pending.take()
    }

    /// Drop the pending value without releasing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before the pending value is released, or `None` when
    /// nothing is pending.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        let deadline = self.deadline?;
        Some(deadline.saturating_duration_since(now))
    }
}
