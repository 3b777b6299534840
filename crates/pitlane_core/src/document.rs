//! Document interface
//!
//! Page behaviours never touch a concrete DOM. They talk to a [`Document`],
//! which covers exactly what the page needs: queries, attribute reads, class
//! and inline-style writes, text writes, layout boxes and style-sheet
//! injection.
//!
//! Operations on an element that no longer exists are no-ops (writes) or
//! return `None`/empty (reads). Nothing here can fail at runtime.

use slotmap::new_key_type;

use crate::error::Result;
use crate::geometry::Rect;
use crate::selector::SelectorList;

new_key_type! {
    /// Handle to an element in a document
    pub struct ElementId;
}

/// Query and mutation interface over a page document
pub trait Document {
    /// The `<body>` element
    fn body(&self) -> ElementId;

    /// Parent element, `None` for the root or an unknown element
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// All elements matching `selector`, in document order
    fn query_all(&self, selector: &SelectorList) -> Vec<ElementId>;

    /// First element matching `selector`, in document order
    fn query_one(&self, selector: &SelectorList) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    /// Descendants of `root` matching `selector`, in document order
    fn query_within(&self, root: ElementId, selector: &SelectorList) -> Vec<ElementId>;

    /// Read an attribute value
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Check whether the element carries `class`
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Add (`present == true`) or remove a class
    fn set_class(&mut self, element: ElementId, class: &str, present: bool);

    /// Flip a class, returning whether it is now present
    fn toggle_class(&mut self, element: ElementId, class: &str) -> bool {
        let present = !self.has_class(element, class);
        self.set_class(element, class, present);
        present
    }

    /// Read an inline style property
    fn inline_style(&self, element: ElementId, property: &str) -> Option<String>;

    /// Write an inline style property
    fn set_inline_style(&mut self, element: ElementId, property: &str, value: &str);

    /// Text content of the element
    fn text(&self, element: ElementId) -> String;

    /// Replace the text content of the element
    fn set_text(&mut self, element: ElementId, text: &str);

    /// Inner HTML of the element
    fn inner_html(&self, element: ElementId) -> String;

    /// Replace the inner HTML of the element
    fn set_inner_html(&mut self, element: ElementId, html: &str);

    /// Layout box in document coordinates, `None` when the element is not laid out
    fn bounds(&self, element: ElementId) -> Option<Rect>;

    /// Append a `<style>` element with `css` to the document head
    fn append_style_sheet(&mut self, css: &str);
}

/// Convenience methods taking selector strings
pub trait DocumentExt: Document {
    /// Parse `selector` and return every match
    fn select_all(&self, selector: &str) -> Result<Vec<ElementId>> {
        let selector = SelectorList::parse(selector)?;
        Ok(self.query_all(&selector))
    }

    /// Parse `selector` and return the first match
    fn select_one(&self, selector: &str) -> Result<Option<ElementId>> {
        let selector = SelectorList::parse(selector)?;
        Ok(self.query_one(&selector))
    }
}

impl<D: Document + ?Sized> DocumentExt for D {}
