//! Smooth scrolling for in-page anchors

use pitlane_core::{Document, ElementId, SelectorList};
use pitlane_platform::{Dispatch, Viewport};

use crate::config::SmoothScrollConfig;
use crate::error::Result;

/// Same-page links bound at mount
#[derive(Clone, Debug)]
pub struct SmoothScroll {
    anchors: Vec<ElementId>,
    header_offset: f32,
}

impl SmoothScroll {
    pub fn bind(doc: &dyn Document, config: &SmoothScrollConfig) -> Result<Self> {
        let anchors = doc.query_all(&SelectorList::parse(&config.anchors)?);
        Ok(Self {
            anchors,
            header_offset: config.header_offset,
        })
    }

    pub fn anchors(&self) -> &[ElementId] {
        &self.anchors
    }

    /// Handle a click reaching `element`
    ///
    /// Returns `None` when `element` is not a bound anchor, or when its
    /// target is `#` alone or does not exist; the click keeps its default
    /// action then.
    pub fn handle_click(
        &self,
        doc: &dyn Document,
        element: ElementId,
        viewport: &Viewport,
    ) -> Option<Dispatch> {
        if !self.anchors.contains(&element) {
            return None;
        }
        let href = doc.attribute(element, "href")?;
        if href == "#" {
            return None;
        }

        let target = match SelectorList::parse(&href) {
            Ok(selector) => doc.query_one(&selector)?,
            Err(err) => {
                tracing::debug!(%href, %err, "anchor target is not a selector");
                return None;
            }
        };

        // Unlaid targets report an empty box at the client origin
        let client_top = doc
            .bounds(target)
            .map(|bounds| viewport.to_client(bounds).y())
            .unwrap_or(0.0);
        let top = client_top + viewport.scroll_y - self.header_offset;
        tracing::debug!(%href, top, "smooth scroll to anchor");
        Some(Dispatch::smooth_scroll(top))
    }
}
