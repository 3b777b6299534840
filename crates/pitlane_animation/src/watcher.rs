//! Visibility watcher
//!
//! Tracks a set of elements against the viewport the way a host
//! intersection observer does: nothing is polled, the host runs an
//! observation pass (on load, scroll, resize, or frame) and the watcher
//! reports what changed since the previous pass.
//!
//! - The first pass after [`VisibilityWatcher::register`] reports the
//!   element's current state, visible or not.
//! - Later passes report only elements whose visible state flipped.
//! - A pass can report many elements at once; callers must handle the
//!   whole batch.

use indexmap::IndexMap;
use pitlane_core::{CoreError, Document, ElementId, Insets, Rect};
use pitlane_platform::Viewport;

/// Watcher configuration, fixed for the watcher's lifetime
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WatcherConfig {
    /// Minimum visible fraction of the element's box, in [0, 1]
    pub threshold: f32,
    /// Offsets applied to the viewport edges before intersecting
    pub root_margin: Insets,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: Insets::ZERO,
        }
    }
}

impl WatcherConfig {
    /// Create a config with the given threshold and no root margin
    pub fn new(threshold: f32) -> Result<Self, CoreError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CoreError::InvalidThreshold(threshold));
        }
        Ok(Self {
            threshold,
            root_margin: Insets::ZERO,
        })
    }

    /// Set the root margin
    pub fn with_root_margin(mut self, root_margin: Insets) -> Self {
        self.root_margin = root_margin;
        self
    }

    /// Fraction of `target` (client coordinates) inside the margin-adjusted root
    ///
    /// Returns `None` when the target does not intersect at all. A zero-area
    /// target that touches the root counts as fully inside.
    pub fn intersection_ratio(&self, root: Rect, target: Rect) -> Option<f32> {
        let root = root.outset(&self.root_margin);
        let hit = target.intersection(&root)?;
        let area = target.area();
        if area <= 0.0 {
            return Some(1.0);
        }
        Some((hit.area() / area).clamp(0.0, 1.0))
    }

    /// Whether a target with this intersection counts as visible
    pub fn is_visible(&self, ratio: Option<f32>) -> bool {
        matches!(ratio, Some(r) if r >= self.threshold)
    }
}

/// One element's visibility as observed in a pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityEvent {
    /// The observed element
    pub target: ElementId,
    /// Visible fraction reached the threshold
    pub is_visible: bool,
    /// Visible fraction, 0 when not intersecting
    pub ratio: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Observation {
    /// Registered, not yet seen by a pass
    Unobserved,
    /// Seen by a pass with this visibility
    Seen { visible: bool },
}

/// Watches elements and reports visibility changes per observation pass
#[derive(Clone, Debug)]
pub struct VisibilityWatcher {
    config: WatcherConfig,
    observed: IndexMap<ElementId, Observation>,
}

impl VisibilityWatcher {
    pub fn new(config: WatcherConfig) -> Self {
        Self {
            config,
            observed: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Start observing `element`
    ///
    /// Returns false (and changes nothing) when it is already observed.
    pub fn register(&mut self, element: ElementId) -> bool {
        if self.observed.contains_key(&element) {
            return false;
        }
        self.observed.insert(element, Observation::Unobserved);
        true
    }

    /// Stop observing `element`; no further events are produced for it
    pub fn unregister(&mut self, element: ElementId) -> bool {
        self.observed.shift_remove(&element).is_some()
    }

    /// Check if `element` is in the active set
    pub fn contains(&self, element: ElementId) -> bool {
        self.observed.contains_key(&element)
    }

    /// Number of observed elements
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Drop every observation
    pub fn clear(&mut self) {
        self.observed.clear();
    }

    /// Run one observation pass and return the batch of changes
    ///
    /// Elements without a layout box are treated as not intersecting.
    pub fn observe(&mut self, doc: &dyn Document, viewport: &Viewport) -> Vec<VisibilityEvent> {
        let root = viewport.client_rect();
        let mut events = Vec::new();

        for (&element, observation) in self.observed.iter_mut() {
            let ratio = doc
                .bounds(element)
                .and_then(|bounds| self.config.intersection_ratio(root, viewport.to_client(bounds)));
            let visible = self.config.is_visible(ratio);

            let changed = match *observation {
                Observation::Unobserved => true,
                Observation::Seen { visible: was } => was != visible,
            };
            *observation = Observation::Seen { visible };

            if changed {
                events.push(VisibilityEvent {
                    target: element,
                    is_visible: visible,
                    ratio: ratio.unwrap_or(0.0),
                });
            }
        }

        if !events.is_empty() {
            tracing::trace!(
                count = events.len(),
                scroll_y = viewport.scroll_y,
                "visibility pass produced events"
            );
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitlane_core::MemoryDocument;

    fn viewport(scroll_y: f32) -> Viewport {
        Viewport {
            width: 1000.0,
            height: 800.0,
            scroll_y,
        }
    }

    #[test]
    fn test_threshold_validation() {
        assert!(WatcherConfig::new(0.0).is_ok());
        assert!(WatcherConfig::new(1.0).is_ok());
        assert_eq!(
            WatcherConfig::new(1.5),
            Err(CoreError::InvalidThreshold(1.5))
        );
        assert!(WatcherConfig::new(-0.1).is_err());
        assert!(WatcherConfig::new(f32::NAN).is_err());
    }

    #[test]
    fn test_first_pass_reports_current_state() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let above_fold = doc
            .create("div")
            .bounds(Rect::new(0.0, 100.0, 200.0, 100.0))
            .append_to(body);
        let below_fold = doc
            .create("div")
            .bounds(Rect::new(0.0, 2000.0, 200.0, 100.0))
            .append_to(body);

        let mut watcher = VisibilityWatcher::new(WatcherConfig::new(0.1).unwrap());
        watcher.register(above_fold);
        watcher.register(below_fold);

        let events = watcher.observe(&doc, &viewport(0.0));
        assert_eq!(events.len(), 2);
        assert!(events[0].is_visible);
        assert_eq!(events[0].target, above_fold);
        assert!(!events[1].is_visible);

        // Nothing changed, nothing reported
        assert!(watcher.observe(&doc, &viewport(0.0)).is_empty());

        // Scroll the second element into view
        let events = watcher.observe(&doc, &viewport(1500.0));
        assert_eq!(events.len(), 2);
        assert!(!events[0].is_visible);
        assert!(events[1].is_visible);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let el = doc
            .create("div")
            .bounds(Rect::new(0.0, 0.0, 10.0, 10.0))
            .append_to(body);

        let mut watcher = VisibilityWatcher::new(WatcherConfig::default());
        assert!(watcher.register(el));
        assert!(!watcher.register(el));
        assert_eq!(watcher.len(), 1);
        assert_eq!(watcher.observe(&doc, &viewport(0.0)).len(), 1);
    }

    #[test]
    fn test_unregister_silences_element() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let el = doc
            .create("div")
            .bounds(Rect::new(0.0, 0.0, 10.0, 10.0))
            .append_to(body);

        let mut watcher = VisibilityWatcher::new(WatcherConfig::default());
        watcher.register(el);
        assert!(watcher.unregister(el));
        assert!(!watcher.contains(el));
        assert!(watcher.observe(&doc, &viewport(0.0)).is_empty());
        assert!(!watcher.unregister(el));
    }

    #[test]
    fn test_partial_visibility_below_threshold() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        // 100px tall, top at 770 => 30px (30%) inside an 800px viewport
        let el = doc
            .create("div")
            .bounds(Rect::new(0.0, 770.0, 100.0, 100.0))
            .append_to(body);

        let mut watcher = VisibilityWatcher::new(WatcherConfig::new(0.5).unwrap());
        watcher.register(el);

        let events = watcher.observe(&doc, &viewport(0.0));
        assert_eq!(events.len(), 1);
        assert!(!events[0].is_visible);
        assert!((events[0].ratio - 0.3).abs() < 1e-4);
    }

    #[test]
    fn test_root_margin_delays_trigger() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        // Fully inside the viewport but within the bottom 100px band
        let el = doc
            .create("div")
            .bounds(Rect::new(0.0, 720.0, 100.0, 50.0))
            .append_to(body);

        let config = WatcherConfig::new(0.1)
            .unwrap()
            .with_root_margin(Insets::parse("0px 0px -100px 0px").unwrap());
        let mut watcher = VisibilityWatcher::new(config);
        watcher.register(el);

        assert!(!watcher.observe(&doc, &viewport(0.0))[0].is_visible);
        assert!(watcher.observe(&doc, &viewport(100.0))[0].is_visible);
    }

    #[test]
    fn test_zero_threshold_edge_and_unlaid_elements() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let touching = doc
            .create("div")
            .bounds(Rect::new(0.0, 800.0, 100.0, 100.0))
            .append_to(body);
        let unlaid = doc.create("div").append_to(body);

        let mut watcher = VisibilityWatcher::new(WatcherConfig::default());
        watcher.register(touching);
        watcher.register(unlaid);

        let events = watcher.observe(&doc, &viewport(0.0));
        assert!(events[0].is_visible);
        assert_eq!(events[0].ratio, 0.0);
        assert!(!events[1].is_visible);
    }
}
