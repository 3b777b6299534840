//! Host events and dispatch results

use pitlane_core::ElementId;

/// Events the host delivers to the page
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The document finished parsing
    DomContentLoaded,
    /// The window scrolled to a new vertical offset
    Scroll {
        /// New `pageYOffset` in CSS pixels
        y: f32,
    },
    /// The window was resized
    Resize {
        /// New viewport width in CSS pixels
        width: f32,
        /// New viewport height in CSS pixels
        height: f32,
    },
    /// An element was clicked
    Click {
        /// The clicked element
        target: ElementId,
    },
    /// Rendering opportunity - the host runs its observation pass here
    Frame,
}

/// How a requested scroll should be animated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Jump immediately
    #[default]
    Auto,
    /// Let the host animate the scroll
    Smooth,
}

/// A `window.scrollTo` request the host should carry out
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRequest {
    /// Target vertical offset in CSS pixels
    pub top: f32,
    /// Animation behaviour
    pub behavior: ScrollBehavior,
}

/// Result of handling one event
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dispatch {
    /// The host should suppress the event's default action
    pub default_prevented: bool,
    /// The host should scroll the window
    pub scroll: Option<ScrollRequest>,
}

impl Dispatch {
    /// Nothing for the host to do
    pub fn none() -> Self {
        Self::default()
    }

    /// Prevent the default action and scroll smoothly to `top`
    pub fn smooth_scroll(top: f32) -> Self {
        Self {
            default_prevented: true,
            scroll: Some(ScrollRequest {
                top,
                behavior: ScrollBehavior::Smooth,
            }),
        }
    }

    /// Fold another dispatch result into this one
    pub fn merge(&mut self, other: Dispatch) {
        self.default_prevented |= other.default_prevented;
        if other.scroll.is_some() {
            self.scroll = other.scroll;
        }
    }
}
