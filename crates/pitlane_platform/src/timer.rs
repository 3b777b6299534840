//! Event-loop timers
//!
//! `setTimeout`/`setInterval` for a single-threaded host. The queue owns a
//! millisecond clock that only moves when the host pops due timers, which
//! keeps every page behaviour deterministic.
//!
//! Timers fire in due-time order; timers due at the same millisecond fire in
//! the order they were armed. An interval re-arms at `due + period`, so a
//! late pop never shifts later ticks.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use slotmap::{new_key_type, SlotMap};

use crate::error::{PlatformError, Result};

/// Milliseconds on the event-loop clock
pub type Millis = u64;

new_key_type! {
    /// Handle to an armed timer
    pub struct TimerId;
}

struct Timer<T> {
    due: Millis,
    /// Sequence number of the heap entry that is currently live
    seq: u64,
    period: Option<Millis>,
    task: T,
}

/// Timers of one event loop, carrying tasks of type `T`
pub struct TimerQueue<T> {
    now: Millis,
    next_seq: u64,
    timers: SlotMap<TimerId, Timer<T>>,
    /// Min-heap of (due, seq, id); entries whose seq is stale are skipped
    heap: BinaryHeap<Reverse<(Millis, u64, TimerId)>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            timers: SlotMap::with_key(),
            heap: BinaryHeap::new(),
        }
    }

    /// Current clock value
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Arm a one-shot timer `delay_ms` from now
    pub fn set_timeout(&mut self, delay_ms: Millis, task: impl Into<T>) -> TimerId {
        self.arm(delay_ms, None, task.into())
    }

    /// Arm a repeating timer firing every `period_ms`
    pub fn set_interval(&mut self, period_ms: Millis, task: impl Into<T>) -> Result<TimerId> {
        if period_ms == 0 {
            return Err(PlatformError::ZeroInterval);
        }
        Ok(self.arm(period_ms, Some(period_ms), task.into()))
    }

    /// Cancel a timer, returning whether it was still armed
    pub fn clear(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    /// Check if a timer is still armed
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Next due time of an armed timer
    pub fn due(&self, id: TimerId) -> Option<Millis> {
        self.timers.get(id).map(|timer| timer.due)
    }

    /// Number of armed timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Due time of the earliest armed timer
    pub fn next_due(&mut self) -> Option<Millis> {
        self.discard_stale();
        self.heap.peek().map(|Reverse((due, _, _))| *due)
    }

    /// Move the clock forward without firing anything
    ///
    /// The clock never moves backwards.
    pub fn advance_clock(&mut self, to: Millis) {
        self.now = self.now.max(to);
    }

    fn arm(&mut self, delay_ms: Millis, period: Option<Millis>, task: T) -> TimerId {
        let due = self.now.saturating_add(delay_ms);
        let seq = self.bump_seq();
        let id = self.timers.insert(Timer {
            due,
            seq,
            period,
            task,
        });
        self.heap.push(Reverse((due, seq, id)));
        tracing::trace!(?id, due, ?period, "timer armed");
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn discard_stale(&mut self) {
        while let Some(&Reverse((_, seq, id))) = self.heap.peek() {
            match self.timers.get(id) {
                Some(timer) if timer.seq == seq => break,
                _ => {
                    self.heap.pop();
                }
            }
        }
    }
}

impl<T: Clone> TimerQueue<T> {
    /// Pop the earliest timer due at or before `until`
    ///
    /// The clock moves to the timer's due time. One-shot timers are
    /// disarmed; intervals are re-armed one period later and hand out a
    /// clone of their task.
    pub fn pop_due(&mut self, until: Millis) -> Option<(TimerId, T)> {
        self.discard_stale();
        let &Reverse((due, _, id)) = self.heap.peek()?;
        if due > until {
            return None;
        }
        self.heap.pop();
        self.now = self.now.max(due);

        let period = self.timers.get(id)?.period;
        match period {
            None => self.timers.remove(id).map(|timer| (id, timer.task)),
            Some(period) => {
                let seq = self.bump_seq();
                let timer = self.timers.get_mut(id)?;
                timer.due = due + period;
                timer.seq = seq;
                let task = timer.task.clone();
                self.heap.push(Reverse((due + period, seq, id)));
                Some((id, task))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &mut TimerQueue<u32>, until: Millis) -> Vec<(Millis, u32)> {
        let mut fired = Vec::new();
        while let Some((_, task)) = queue.pop_due(until) {
            fired.push((queue.now(), task));
        }
        queue.advance_clock(until);
        fired
    }

    #[test]
    fn test_timeouts_fire_in_due_order() {
        let mut queue: TimerQueue<u32> = TimerQueue::new();
        queue.set_timeout(300, 3u32);
        queue.set_timeout(100, 1u32);
        queue.set_timeout(200, 2u32);

        assert_eq!(drain(&mut queue, 1000), vec![(100, 1), (200, 2), (300, 3)]);
        assert!(queue.is_empty());
        assert_eq!(queue.now(), 1000);
    }

    #[test]
    fn test_same_due_keeps_arming_order() {
        let mut queue: TimerQueue<u32> = TimerQueue::new();
        queue.set_timeout(50, 1u32);
        queue.set_timeout(50, 2u32);
        queue.set_timeout(50, 3u32);

        let order: Vec<u32> = drain(&mut queue, 50).into_iter().map(|(_, t)| t).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_clear_cancels() {
        let mut queue: TimerQueue<u32> = TimerQueue::new();
        let id = queue.set_timeout(10, 1u32);
        assert!(queue.is_pending(id));
        assert!(queue.clear(id));
        assert!(!queue.clear(id));
        assert!(drain(&mut queue, 100).is_empty());
    }

    #[test]
    fn test_interval_rearms_until_cleared() {
        let mut queue: TimerQueue<u32> = TimerQueue::new();
        let id = queue.set_interval(16, 7u32).unwrap();

        let fired = drain(&mut queue, 64);
        assert_eq!(fired, vec![(16, 7), (32, 7), (48, 7), (64, 7)]);
        assert_eq!(queue.next_due(), Some(80));

        queue.clear(id);
        assert_eq!(queue.next_due(), None);
        assert!(drain(&mut queue, 200).is_empty());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut queue: TimerQueue<u32> = TimerQueue::new();
        assert_eq!(queue.set_interval(0, 1u32), Err(PlatformError::ZeroInterval));
    }

    #[test]
    fn test_zero_delay_fires_without_moving_clock() {
        let mut queue: TimerQueue<u32> = TimerQueue::new();
        queue.advance_clock(40);
        queue.set_timeout(0, 9u32);
        assert_eq!(queue.pop_due(40).map(|(_, t)| t), Some(9));
        assert_eq!(queue.now(), 40);
    }

    #[test]
    fn test_clock_never_rewinds() {
        let mut queue: TimerQueue<u32> = TimerQueue::new();
        queue.advance_clock(100);
        queue.advance_clock(50);
        assert_eq!(queue.now(), 100);
    }
}
