//! Debounce
//!
//! Stateful debounce over a [`TimerQueue`]. Every call (re)arms a suppression
//! window of `wait_ms`. In immediate (leading-edge) mode the call that finds
//! no window pending runs the handler right away; in trailing mode the
//! handler runs when a window expires without being re-armed.
//!
//! The debounce never owns the handler. [`Debounce::call`] and
//! [`Debounce::expire`] return whether the caller should run it now.

use crate::timer::{Millis, TimerId, TimerQueue};

/// Leading- or trailing-edge debounce state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Debounce {
    wait_ms: Millis,
    immediate: bool,
    pending: Option<TimerId>,
}

impl Debounce {
    /// Create a debounce with the given window and edge
    pub fn new(wait_ms: Millis, immediate: bool) -> Self {
        Self {
            wait_ms,
            immediate,
            pending: None,
        }
    }

    /// Leading-edge debounce
    pub fn leading(wait_ms: Millis) -> Self {
        Self::new(wait_ms, true)
    }

    /// Trailing-edge debounce
    pub fn trailing(wait_ms: Millis) -> Self {
        Self::new(wait_ms, false)
    }

    pub fn wait_ms(&self) -> Millis {
        self.wait_ms
    }

    pub fn is_immediate(&self) -> bool {
        self.immediate
    }

    /// Whether a suppression window is armed
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The armed window's timer, if any
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending
    }

    /// Register a call
    ///
    /// Re-arms the window with `expiry` as its timer task and returns `true`
    /// when the handler should run immediately.
    pub fn call<T>(&mut self, timers: &mut TimerQueue<T>, expiry: impl Into<T>) -> bool {
        let call_now = self.immediate && self.pending.is_none();

        if let Some(previous) = self.pending.take() {
            timers.clear(previous);
        }
        self.pending = Some(timers.set_timeout(self.wait_ms, expiry));

        call_now
    }

    /// Handle the expiry of timer `id`
    ///
    /// Returns `true` when the handler should run now (trailing mode only).
    /// Expiries of timers that are no longer the armed window are ignored.
    pub fn expire(&mut self, id: TimerId) -> bool {
        if self.pending != Some(id) {
            return false;
        }
        self.pending = None;
        !self.immediate
    }

    /// Disarm the window without running anything
    pub fn cancel<T>(&mut self, timers: &mut TimerQueue<T>) {
        if let Some(id) = self.pending.take() {
            timers.clear(id);
        }
    }
}
