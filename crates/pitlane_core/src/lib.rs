//! Pitlane Core
//!
//! Foundational types shared by every Pitlane crate:
//!
//! - **Geometry**: points, sizes, rectangles and CSS-style box offsets
//! - **Selectors**: a parser and matcher for the selector subset the page uses
//! - **Document**: the narrow query/mutation interface page behaviours talk to
//! - **MemoryDocument**: an in-memory document for demos and tests
//!
//! # Example
//!
//! ```rust
//! use pitlane_core::{Document, DocumentExt, MemoryDocument, Rect};
//!
//! let mut doc = MemoryDocument::new();
//! let body = doc.body();
//! let card = doc
//!     .create("div")
//!     .class("team-card")
//!     .bounds(Rect::new(0.0, 1200.0, 300.0, 200.0))
//!     .append_to(body);
//!
//! let found = doc.select_all(".team-card").unwrap();
//! assert_eq!(found, vec![card]);
//!
//! doc.set_inline_style(card, "opacity", "0");
//! assert_eq!(doc.inline_style(card, "opacity").as_deref(), Some("0"));
//! ```

pub mod document;
pub mod error;
pub mod geometry;
pub mod memory;
pub mod selector;

pub use document::{Document, DocumentExt, ElementId};
pub use error::{CoreError, Result};
pub use geometry::{Insets, Length, Point, Rect, Size};
pub use memory::{ElementBuilder, MemoryDocument};
pub use selector::{AttributeOp, Compound, ElementSource, Selector, SelectorList};
