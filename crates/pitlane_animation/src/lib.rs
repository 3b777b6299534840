//! Pitlane Reveal Animations
//!
//! Scroll-triggered, one-shot reveals for page elements.
//!
//! # Features
//!
//! - **Visibility Watching**: threshold and root-margin based, batched per pass
//! - **One-shot Triggers**: per-element `Pending -> Scheduled -> Fired` state machine
//! - **Delays**: per-element delays armed on the host timer queue
//! - **Effects**: inline-style reveals, class reveals, and counter ramps
//! - **Presets**: attribute-driven entry animations backed by a style sheet
//!
//! # Example
//!
//! ```rust
//! use pitlane_animation::{
//!     AnimationTask, RevealEffect, RevealRuntime, RevealScheduler, StyleReveal, WatcherConfig,
//! };
//! use pitlane_core::{Document, MemoryDocument, Rect};
//! use pitlane_platform::{TimerQueue, Viewport};
//!
//! let mut doc = MemoryDocument::new();
//! let body = doc.body();
//! let card = doc
//!     .create("div")
//!     .bounds(Rect::new(0.0, 100.0, 300.0, 200.0))
//!     .append_to(body);
//!
//! let mut timers: TimerQueue<AnimationTask> = TimerQueue::new();
//! let mut runtime = RevealRuntime::new();
//! let reveal = runtime.add(RevealScheduler::new(
//!     "reveal",
//!     WatcherConfig::new(0.1).unwrap(),
//!     RevealEffect::style(StyleReveal::fade_up(30.0, "opacity 0.6s ease")),
//! ));
//! runtime.register(reveal, &mut doc, card, 0);
//!
//! runtime.observe_all(&mut doc, &mut timers, &Viewport::default());
//! assert_eq!(doc.inline_style(card, "opacity").as_deref(), Some("1"));
//! ```

pub mod context;
pub mod counter;
pub mod effect;
pub mod presets;
pub mod reveal;
pub mod watcher;

pub use context::{AnimationTask, RampId, RevealContext, SchedulerId};
pub use counter::{CounterRamp, RampStep, COUNTER_TICK_MS, DEFAULT_COUNTER_DURATION_MS};
pub use effect::{
    CounterEffect, RevealEffect, StyleReveal, DEFAULT_REVEAL_OFFSET_PX, DEFAULT_REVEAL_TRANSITION,
};
pub use presets::{
    aos_stylesheet, AosPreset, AOS_ANIMATE_CLASS, AOS_ATTRIBUTE, AOS_DELAY_ATTRIBUTE,
    AOS_TRANSITION,
};
pub use reveal::{RevealRuntime, RevealScheduler, RevealState};
pub use watcher::{VisibilityEvent, VisibilityWatcher, WatcherConfig};
