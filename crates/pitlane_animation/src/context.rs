//! Scheduler context
//!
//! Reveal schedulers never own the document or the event loop. Each call
//! that may mutate the page or arm a timer receives a [`RevealContext`]
//! borrowing both, plus the id of the scheduler being driven so armed
//! timers can be routed back to it.

use pitlane_core::{Document, ElementId};
use pitlane_platform::TimerQueue;
use slotmap::new_key_type;

new_key_type! {
    /// Handle to a scheduler registered with a [`crate::RevealRuntime`]
    pub struct SchedulerId;
    /// Handle to a running counter ramp
    pub struct RampId;
}

/// Timer payloads produced by reveal schedulers
///
/// Hosts with their own task type embed this through `From<AnimationTask>`
/// and hand it back to [`crate::RevealRuntime::run_task`] when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationTask {
    /// A delayed reveal became due
    Reveal {
        scheduler: SchedulerId,
        element: ElementId,
    },
    /// A counter ramp ticks
    CounterTick { scheduler: SchedulerId, ramp: RampId },
}

impl AnimationTask {
    /// Scheduler the task belongs to
    pub fn scheduler(&self) -> SchedulerId {
        match *self {
            AnimationTask::Reveal { scheduler, .. } => scheduler,
            AnimationTask::CounterTick { scheduler, .. } => scheduler,
        }
    }
}

/// Borrowed page state for one scheduler operation
pub struct RevealContext<'a, T> {
    pub doc: &'a mut dyn Document,
    pub timers: &'a mut TimerQueue<T>,
    pub scheduler: SchedulerId,
}

impl<'a, T: From<AnimationTask>> RevealContext<'a, T> {
    pub fn new(
        doc: &'a mut dyn Document,
        timers: &'a mut TimerQueue<T>,
        scheduler: SchedulerId,
    ) -> Self {
        Self {
            doc,
            timers,
            scheduler,
        }
    }
}
