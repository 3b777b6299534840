//! Pitlane Application Framework
//!
//! Mounts the page behaviours onto a document and drives them from host
//! events and the event-loop clock.
//!
//! # Example
//!
//! ```rust
//! use pitlane_app::prelude::*;
//! use pitlane_core::{Document, MemoryDocument, Rect};
//!
//! let mut doc = MemoryDocument::new();
//! let body = doc.body();
//! let card = doc
//!     .create("div")
//!     .class("team-card")
//!     .bounds(Rect::new(0.0, 1400.0, 300.0, 200.0))
//!     .append_to(body);
//!
//! let mut page = Page::mount(doc, PageConfig::default().with_current_year(2025)).unwrap();
//! page.dispatch(Event::DomContentLoaded);
//! assert_eq!(page.document().inline_style(card, "opacity").as_deref(), Some("0"));
//!
//! page.dispatch(Event::Scroll { y: 900.0 });
//! assert_eq!(page.document().inline_style(card, "opacity").as_deref(), Some("1"));
//! ```

pub mod anchors;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod nav;
pub mod page;
pub mod scroll;


pub use config::{
    AosConfig, CountersConfig, DebounceConfig, HeaderConfig, LifecycleConfig, NavigationConfig,
    PageConfig, ParallaxConfig, RevealConfig, SmoothScrollConfig,
};
pub use error::{PageError, Result};
pub use page::{Page, PageSchedulers, PageTask};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::PageConfig;
    pub use crate::error::{PageError, Result};
    pub use crate::page::{Page, PageTask};
    pub use pitlane_platform::{Dispatch, Event, ScrollBehavior, ScrollRequest, Viewport};
}
