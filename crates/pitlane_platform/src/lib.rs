//! Pitlane Host Abstraction
//!
//! Platform-agnostic types for the host a page runs in:
//!
//! - [`Event`] - typed host events (load, scroll, resize, click, frame)
//! - [`Viewport`] - the visible window onto the document
//! - [`Dispatch`] - what the host must do after an event was handled
//! - [`TimerQueue`] - the single-threaded event-loop timers
//! - [`Debounce`] - leading/trailing debounce on top of the timers
//!
//! Everything runs on one thread. Hosts translate their native events into
//! [`Event`] values and advance the [`TimerQueue`] clock as time passes.
//!
//! # Example
//!
//! ```rust
//! use pitlane_platform::TimerQueue;
//!
//! let mut timers: TimerQueue<&str> = TimerQueue::new();
//! timers.set_timeout(100, "fade-in");
//!
//! assert!(timers.pop_due(99).is_none());
//! let (_, task) = timers.pop_due(100).unwrap();
//! assert_eq!(task, "fade-in");
//! assert_eq!(timers.now(), 100);
//! ```

mod debounce;
mod error;
mod event;
mod timer;
mod viewport;

// Re-export all public types
pub use debounce::Debounce;
pub use error::{PlatformError, Result};
pub use event::{Dispatch, Event, ScrollBehavior, ScrollRequest};
pub use timer::{Millis, TimerId, TimerQueue};
pub use viewport::Viewport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::debounce::Debounce;
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{Dispatch, Event, ScrollBehavior, ScrollRequest};
    pub use crate::timer::{Millis, TimerId, TimerQueue};
    pub use crate::viewport::Viewport;
}
