//! Viewport state

use pitlane_core::Rect;

use crate::error::{PlatformError, Result};

/// The visible window onto the document
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Viewport width in CSS pixels
    pub width: f32,
    /// Viewport height in CSS pixels
    pub height: f32,
    /// Vertical scroll offset (`pageYOffset`)
    pub scroll_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            scroll_y: 0.0,
        }
    }
}

impl Viewport {
    /// Create a viewport scrolled to the top
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(PlatformError::InvalidViewport {
                width: width.to_string(),
                height: height.to_string(),
            });
        }
        Ok(Self {
            width,
            height,
            scroll_y: 0.0,
        })
    }

    /// The viewport rectangle in client coordinates
    pub fn client_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Convert a document-space rectangle to client coordinates
    pub fn to_client(&self, document_rect: Rect) -> Rect {
        document_rect.offset(0.0, -self.scroll_y)
    }
}
