//! Scroll-driven effects
//!
//! Both effects re-query their element on every scroll, so elements added
//! after mount are picked up.

use pitlane_core::{Document, SelectorList};

use crate::config::{HeaderConfig, ParallaxConfig};
use crate::error::Result;

/// Toggles the header's scrolled class past a scroll offset
#[derive(Clone, Debug)]
pub struct HeaderEffect {
    navbar: SelectorList,
    scrolled_class: String,
    threshold: f32,
}

impl HeaderEffect {
    pub fn new(config: &HeaderConfig) -> Result<Self> {
        Ok(Self {
            navbar: SelectorList::parse(&config.navbar)?,
            scrolled_class: config.scrolled_class.clone(),
            threshold: config.scroll_threshold,
        })
    }

    pub fn on_scroll(&self, doc: &mut dyn Document, scroll_y: f32) {
        if let Some(navbar) = doc.query_one(&self.navbar) {
            doc.set_class(navbar, &self.scrolled_class, scroll_y > self.threshold);
        }
    }
}

/// Moves an element by a fraction of the scroll offset
#[derive(Clone, Debug)]
pub struct Parallax {
    selector: SelectorList,
    factor: f32,
}

impl Parallax {
    pub fn new(config: &ParallaxConfig) -> Result<Self> {
        Ok(Self {
            selector: SelectorList::parse(&config.selector)?,
            factor: config.factor,
        })
    }

    pub fn on_scroll(&self, doc: &mut dyn Document, scroll_y: f32) {
        if let Some(hero) = doc.query_one(&self.selector) {
            let offset = scroll_y * self.factor;
            doc.set_inline_style(hero, "transform", &format!("translateY({offset}px)"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitlane_core::{ElementId, MemoryDocument};

    fn header_doc() -> (MemoryDocument, ElementId) {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let header = doc.create("header").id("header").append_to(body);
        let navbar = doc.create("nav").class("navbar").append_to(header);
        (doc, navbar)
    }

    #[test]
    fn test_scrolled_class_strictly_past_threshold() {
        let (mut doc, navbar) = header_doc();
        let effect = HeaderEffect::new(&HeaderConfig::default()).unwrap();

        effect.on_scroll(&mut doc, 100.0);
        assert!(!doc.has_class(navbar, "scrolled"));
        effect.on_scroll(&mut doc, 100.5);
        assert!(doc.has_class(navbar, "scrolled"));
        effect.on_scroll(&mut doc, 0.0);
        assert!(!doc.has_class(navbar, "scrolled"));
    }

    #[test]
    fn test_navbar_outside_header_is_ignored() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let stray = doc.create("nav").class("navbar").append_to(body);
        let effect = HeaderEffect::new(&HeaderConfig::default()).unwrap();

        effect.on_scroll(&mut doc, 500.0);
        assert!(!doc.has_class(stray, "scrolled"));
    }

    #[test]
    fn test_parallax_moves_hero_by_half() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let hero = doc.create("section").class("hero").append_to(body);
        let parallax = Parallax::new(&ParallaxConfig::default()).unwrap();

        parallax.on_scroll(&mut doc, 250.0);
        assert_eq!(
            doc.inline_style(hero, "transform").as_deref(),
            Some("translateY(125px)")
        );
        parallax.on_scroll(&mut doc, 3.0);
        assert_eq!(
            doc.inline_style(hero, "transform").as_deref(),
            Some("translateY(1.5px)")
        );
    }

    #[test]
    fn test_parallax_without_hero_is_noop() {
        let mut doc = MemoryDocument::new();
        let parallax = Parallax::new(&ParallaxConfig::default()).unwrap();
        parallax.on_scroll(&mut doc, 250.0);
        assert_eq!(doc.len(), 3);
    }
}
