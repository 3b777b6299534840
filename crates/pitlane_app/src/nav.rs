//! Mobile navigation menu

use pitlane_core::{Document, ElementId, SelectorList};

use crate::config::NavigationConfig;
use crate::error::Result;

/// Hamburger toggle and menu links, bound once at mount
#[derive(Clone, Debug)]
pub struct Navigation {
    hamburger: Option<ElementId>,
    menu: Option<ElementId>,
    links: Vec<ElementId>,
    active_class: String,
}

impl Navigation {
    pub fn bind(doc: &dyn Document, config: &NavigationConfig) -> Result<Self> {
        let hamburger = doc.query_one(&SelectorList::parse(&config.hamburger)?);
        let menu = doc.query_one(&SelectorList::parse(&config.menu)?);
        let links = doc.query_all(&SelectorList::parse(&config.links)?);

        if hamburger.is_none() || menu.is_none() {
            tracing::debug!("navigation menu not found, toggle disabled");
        }

        Ok(Self {
            hamburger,
            menu,
            links,
            active_class: config.active_class.clone(),
        })
    }

    pub fn hamburger(&self) -> Option<ElementId> {
        self.hamburger
    }

    pub fn links(&self) -> &[ElementId] {
        &self.links
    }

    /// Handle a click reaching `element`, returning whether it was ours
    pub fn handle_click(&self, doc: &mut dyn Document, element: ElementId) -> bool {
        if self.hamburger == Some(element) {
            self.toggle(doc);
            true
        } else if self.links.contains(&element) {
            self.select(doc, element);
            true
        } else {
            false
        }
    }

    /// Open or close the menu
    pub fn toggle(&self, doc: &mut dyn Document) {
        let (Some(menu), Some(hamburger)) = (self.menu, self.hamburger) else {
            return;
        };
        let open = doc.toggle_class(menu, &self.active_class);
        doc.toggle_class(hamburger, &self.active_class);
        tracing::debug!(open, "navigation menu toggled");
    }

    /// Close the menu and mark `link` as the current page section
    pub fn select(&self, doc: &mut dyn Document, link: ElementId) {
        for element in self.menu.iter().chain(self.hamburger.iter()) {
            doc.set_class(*element, &self.active_class, false);
        }
        for other in &self.links {
            doc.set_class(*other, &self.active_class, false);
        }
        doc.set_class(link, &self.active_class, true);
    }
}
