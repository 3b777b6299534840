//! Counter ramp
//!
//! Counts a displayed integer up from 0 to a target over a fixed duration,
//! one step per 16ms tick. The step is `target / (duration / 16)`; the value
//! shown after tick `k` is the floor of `k * step`, and the tick at which the
//! running value reaches the target shows the target exactly and finishes.
//!
//! Values are computed from the tick index rather than accumulated, so the
//! sequence is exact: 250 over 2000ms shows 2, 4, ..., 250 across 125 ticks.

use pitlane_platform::Millis;

/// Tick period of every counter ramp
pub const COUNTER_TICK_MS: Millis = 16;

/// Default ramp duration
pub const DEFAULT_COUNTER_DURATION_MS: Millis = 2000;

/// Result of one ramp tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RampStep {
    /// Integer to display
    pub value: i64,
    /// The ramp reached its target and must not tick again
    pub finished: bool,
}

/// Linear integer ramp from 0 to a target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterRamp {
    target: i64,
    duration_ms: Millis,
    ticks: u64,
    finished: bool,
}

impl CounterRamp {
    pub fn new(target: i64, duration_ms: Millis) -> Self {
        Self {
            target,
            duration_ms,
            ticks: 0,
            finished: false,
        }
    }

    /// Ramp over the default 2000ms
    pub fn with_default_duration(target: i64) -> Self {
        Self::new(target, DEFAULT_COUNTER_DURATION_MS)
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub fn duration_ms(&self) -> Millis {
        self.duration_ms
    }

    /// Increment per tick, `target / (duration / 16)`
    pub fn step_size(&self) -> f64 {
        if self.duration_ms == 0 {
            return self.target as f64;
        }
        self.target as f64 / (self.duration_ms as f64 / COUNTER_TICK_MS as f64)
    }

    /// Number of ticks a full run takes, `ceil(duration / 16)` and at least one
    pub fn total_ticks(&self) -> u64 {
        if self.target <= 0 {
            return 1;
        }
        self.duration_ms.div_ceil(COUNTER_TICK_MS).max(1)
    }

    /// Ticks taken so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance one tick
    ///
    /// Ticking a finished ramp keeps returning the target.
    pub fn tick(&mut self) -> RampStep {
        if self.finished {
            return RampStep {
                value: self.target,
                finished: true,
            };
        }

        self.ticks += 1;
        let elapsed = self.ticks * COUNTER_TICK_MS;

        // A non-positive target is already reached by the starting value
        if self.target <= 0 || elapsed >= self.duration_ms {
            self.finished = true;
            return RampStep {
                value: self.target,
                finished: true,
            };
        }

        let value = (self.target as i128 * elapsed as i128 / self.duration_ms as i128) as i64;
        if value >= self.target {
            self.finished = true;
            return RampStep {
                value: self.target,
                finished: true,
            };
        }

        RampStep {
            value,
            finished: false,
        }
    }
}
