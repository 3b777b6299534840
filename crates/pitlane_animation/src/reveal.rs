//! Reveal scheduling
//!
//! A [`RevealScheduler`] owns one watcher config, one effect and the
//! targets registered with them. Each target runs a one-shot state machine:
//!
//! ```text
//! Pending --visible--> Scheduled { due } --timer--> Fired
//!    \                                                ^
//!     `------------- visible, no delay --------------'
//! ```
//!
//! Fired is terminal. A fired target is unregistered from the watcher, so
//! nothing can hide it again. Visibility events for scheduled or fired
//! targets are ignored, and a scheduled reveal is not cancelled when the
//! target scrolls back out of view.
//!
//! [`RevealRuntime`] holds the page's schedulers and routes fired
//! [`AnimationTask`]s back to the scheduler that armed them.

use pitlane_core::{Document, ElementId, SelectorList};
use pitlane_platform::{Millis, TimerId, TimerQueue, Viewport};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::context::{AnimationTask, RevealContext, SchedulerId};
use crate::effect::RevealEffect;
use crate::watcher::{VisibilityEvent, VisibilityWatcher, WatcherConfig};

/// Where a target is in its one-shot lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealState {
    /// Registered and watched, not yet seen visible
    Pending,
    /// Seen visible, waiting for its delay
    Scheduled { due: Millis, timer: TimerId },
    /// Revealed; terminal
    Fired { at: Millis },
}

#[derive(Clone, Debug)]
struct RevealTarget {
    delay_ms: Millis,
    state: RevealState,
}

/// One-shot reveal of a set of elements as they become visible
#[derive(Clone, Debug)]
pub struct RevealScheduler {
    name: String,
    watcher: VisibilityWatcher,
    targets: FxHashMap<ElementId, RevealTarget>,
    effect: RevealEffect,
    delay_attribute: Option<String>,
}

impl RevealScheduler {
    pub fn new(name: impl Into<String>, config: WatcherConfig, effect: RevealEffect) -> Self {
        Self {
            name: name.into(),
            watcher: VisibilityWatcher::new(config),
            targets: FxHashMap::default(),
            effect,
            delay_attribute: None,
        }
    }

    /// Read per-element delays from `attribute` in [`Self::register_matching`]
    pub fn with_delay_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.delay_attribute = Some(attribute.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &WatcherConfig {
        self.watcher.config()
    }

    pub fn watcher(&self) -> &VisibilityWatcher {
        &self.watcher
    }

    pub fn effect(&self) -> &RevealEffect {
        &self.effect
    }

    /// Start tracking `element`, writing its hidden state
    ///
    /// Returns false when the element is already tracked, including after it
    /// fired.
    pub fn register(&mut self, doc: &mut dyn Document, element: ElementId, delay_ms: Millis) -> bool {
        if self.targets.contains_key(&element) {
            return false;
        }
        self.effect.prepare(doc, element);
        self.watcher.register(element);
        self.targets.insert(
            element,
            RevealTarget {
                delay_ms,
                state: RevealState::Pending,
            },
        );
        tracing::trace!(scheduler = %self.name, ?element, delay_ms, "target registered");
        true
    }

    /// Register every element matching `selector`, returning how many were added
    pub fn register_matching(&mut self, doc: &mut dyn Document, selector: &SelectorList) -> usize {
        let mut added = 0;
        for element in doc.query_all(selector) {
            let delay_ms = self.read_delay(&*doc, element);
            if self.register(doc, element, delay_ms) {
                added += 1;
            }
        }
        added
    }

    fn read_delay(&self, doc: &dyn Document, element: ElementId) -> Millis {
        let Some(attribute) = self.delay_attribute.as_deref() else {
            return 0;
        };
        let Some(raw) = doc.attribute(element, attribute) else {
            return 0;
        };
        match raw.trim().parse::<Millis>() {
            Ok(delay) => delay,
            Err(_) => {
                tracing::warn!(
                    scheduler = %self.name,
                    ?element,
                    attribute,
                    value = %raw,
                    "invalid reveal delay, using 0"
                );
                0
            }
        }
    }

    /// Run an observation pass and feed its events through the trigger policy
    ///
    /// Returns the number of targets fired during the pass.
    pub fn observe<T: From<AnimationTask>>(
        &mut self,
        cx: &mut RevealContext<'_, T>,
        viewport: &Viewport,
    ) -> usize {
        let mut fired = 0;
        for event in self.watcher.observe(&*cx.doc, viewport) {
            if self.handle_event(cx, event) {
                fired += 1;
            }
        }
        fired
    }

    /// Apply the trigger policy to one visibility event
    ///
    /// Returns true when the target fired immediately.
    pub fn handle_event<T: From<AnimationTask>>(
        &mut self,
        cx: &mut RevealContext<'_, T>,
        event: VisibilityEvent,
    ) -> bool {
        if !event.is_visible {
            return false;
        }
        let element = event.target;
        let Some(target) = self.targets.get_mut(&element) else {
            return false;
        };
        if target.state != RevealState::Pending {
            tracing::trace!(scheduler = %self.name, ?element, state = ?target.state, "duplicate visibility ignored");
            return false;
        }

        if target.delay_ms == 0 {
            return self.fire(cx, element);
        }

        let delay_ms = target.delay_ms;
        let timer = cx.timers.set_timeout(
            delay_ms,
            AnimationTask::Reveal {
                scheduler: cx.scheduler,
                element,
            },
        );
        let due = cx.timers.now().saturating_add(delay_ms);
        target.state = RevealState::Scheduled { due, timer };
        tracing::debug!(scheduler = %self.name, ?element, due, "reveal scheduled");
        false
    }

    /// Reveal `element` now
    ///
    /// Idempotent: returns false for untracked or already fired targets.
    pub fn fire<T: From<AnimationTask>>(
        &mut self,
        cx: &mut RevealContext<'_, T>,
        element: ElementId,
    ) -> bool {
        let Some(target) = self.targets.get_mut(&element) else {
            return false;
        };
        if let RevealState::Fired { .. } = target.state {
            return false;
        }

        let at = cx.timers.now();
        target.state = RevealState::Fired { at };
        self.effect.apply(cx, element);
        self.watcher.unregister(element);
        tracing::debug!(scheduler = %self.name, ?element, at, "target revealed");
        true
    }

    /// Handle a task this scheduler armed
    pub fn on_task<T: From<AnimationTask>>(
        &mut self,
        cx: &mut RevealContext<'_, T>,
        task: AnimationTask,
    ) -> bool {
        match task {
            AnimationTask::Reveal { element, .. } => self.fire(cx, element),
            AnimationTask::CounterTick { ramp, .. } => self.effect.tick(cx, ramp),
        }
    }

    /// Stop everything: cancel pending timers and forget every target
    pub fn teardown<T>(&mut self, timers: &mut TimerQueue<T>) {
        for target in self.targets.values() {
            if let RevealState::Scheduled { timer, .. } = target.state {
                timers.clear(timer);
            }
        }
        self.effect.teardown(timers);
        self.watcher.clear();
        self.targets.clear();
    }

    pub fn state(&self, element: ElementId) -> Option<RevealState> {
        self.targets.get(&element).map(|target| target.state)
    }

    pub fn is_fired(&self, element: ElementId) -> bool {
        matches!(self.state(element), Some(RevealState::Fired { .. }))
    }

    /// Number of tracked targets, fired ones included
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.count(|state| matches!(state, RevealState::Pending))
    }

    pub fn scheduled_count(&self) -> usize {
        self.count(|state| matches!(state, RevealState::Scheduled { .. }))
    }

    pub fn fired_count(&self) -> usize {
        self.count(|state| matches!(state, RevealState::Fired { .. }))
    }

    fn count(&self, predicate: impl Fn(&RevealState) -> bool) -> usize {
        self.targets
            .values()
            .filter(|target| predicate(&target.state))
            .count()
    }
}

/// The schedulers of one page
#[derive(Clone, Debug, Default)]
pub struct RevealRuntime {
    schedulers: SlotMap<SchedulerId, RevealScheduler>,
}

impl RevealRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, scheduler: RevealScheduler) -> SchedulerId {
        self.schedulers.insert(scheduler)
    }

    pub fn get(&self, id: SchedulerId) -> Option<&RevealScheduler> {
        self.schedulers.get(id)
    }

    pub fn get_mut(&mut self, id: SchedulerId) -> Option<&mut RevealScheduler> {
        self.schedulers.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SchedulerId, &RevealScheduler)> {
        self.schedulers.iter()
    }

    pub fn len(&self) -> usize {
        self.schedulers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedulers.is_empty()
    }

    /// Register `element` with scheduler `id`
    pub fn register(
        &mut self,
        id: SchedulerId,
        doc: &mut dyn Document,
        element: ElementId,
        delay_ms: Millis,
    ) -> bool {
        self.schedulers
            .get_mut(id)
            .is_some_and(|scheduler| scheduler.register(doc, element, delay_ms))
    }

    /// Run one observation pass on every scheduler
    pub fn observe_all<T: From<AnimationTask>>(
        &mut self,
        doc: &mut dyn Document,
        timers: &mut TimerQueue<T>,
        viewport: &Viewport,
    ) -> usize {
        let mut fired = 0;
        for (id, scheduler) in self.schedulers.iter_mut() {
            let mut cx = RevealContext::new(&mut *doc, &mut *timers, id);
            fired += scheduler.observe(&mut cx, viewport);
        }
        fired
    }

    /// Route a fired task to its scheduler
    ///
    /// Tasks of removed schedulers are dropped.
    pub fn run_task<T: From<AnimationTask>>(
        &mut self,
        doc: &mut dyn Document,
        timers: &mut TimerQueue<T>,
        task: AnimationTask,
    ) -> bool {
        let id = task.scheduler();
        let Some(scheduler) = self.schedulers.get_mut(id) else {
            tracing::trace!(?task, "task for unknown scheduler dropped");
            return false;
        };
        let mut cx = RevealContext::new(doc, timers, id);
        scheduler.on_task(&mut cx, task)
    }

    /// Tear down and drop every scheduler
    pub fn teardown<T>(&mut self, timers: &mut TimerQueue<T>) {
        for (_, mut scheduler) in self.schedulers.drain() {
            scheduler.teardown(timers);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{CounterEffect, StyleReveal};
    use pitlane_core::{Insets, MemoryDocument, Rect};

    fn viewport(scroll_y: f32) -> Viewport {
        Viewport {
            width: 1000.0,
            height: 800.0,
            scroll_y,
        }
    }

    fn run_until(
        runtime: &mut RevealRuntime,
        doc: &mut MemoryDocument,
        timers: &mut TimerQueue<AnimationTask>,
        until: Millis,
    ) {
        while let Some((_, task)) = timers.pop_due(until) {
            runtime.run_task(doc, timers, task);
        }
        timers.advance_clock(until);
    }

    fn card(doc: &mut MemoryDocument, top: f32) -> ElementId {
        let body = doc.body();
        doc.create("div")
            .class("team-card")
            .bounds(Rect::new(0.0, top, 300.0, 200.0))
            .append_to(body)
    }

    fn fade_up_scheduler() -> RevealScheduler {
        let config = WatcherConfig::new(0.1)
            .unwrap()
            .with_root_margin(Insets::parse("0px 0px -100px 0px").unwrap());
        RevealScheduler::new(
            "reveal",
            config,
            RevealEffect::style(StyleReveal::fade_up(30.0, "opacity 0.6s ease")),
        )
    }

    #[test]
    fn test_reveal_on_scroll() {
        let mut doc = MemoryDocument::new();
        let mut timers: TimerQueue<AnimationTask> = TimerQueue::new();
        let el = card(&mut doc, 1500.0);

        let mut runtime = RevealRuntime::new();
        let id = runtime.add(fade_up_scheduler());
        assert!(runtime.register(id, &mut doc, el, 0));
        assert_eq!(doc.inline_style(el, "opacity").as_deref(), Some("0"));

        assert_eq!(runtime.observe_all(&mut doc, &mut timers, &viewport(0.0)), 0);
        assert_eq!(runtime.get(id).unwrap().state(el), Some(RevealState::Pending));

        assert_eq!(runtime.observe_all(&mut doc, &mut timers, &viewport(1000.0)), 1);
        assert_eq!(doc.inline_style(el, "opacity").as_deref(), Some("1"));
        assert!(runtime.get(id).unwrap().is_fired(el));
    }

    #[test]
    fn test_duplicate_events_fire_once() {
        let mut doc = MemoryDocument::new();
        let mut timers: TimerQueue<AnimationTask> = TimerQueue::new();
        let el = card(&mut doc, 0.0);
        let mut scheduler = fade_up_scheduler();
        scheduler.register(&mut doc, el, 0);

        let event = VisibilityEvent {
            target: el,
            is_visible: true,
            ratio: 1.0,
        };
        let mut cx = RevealContext::new(&mut doc, &mut timers, SchedulerId::default());
        assert!(scheduler.handle_event(&mut cx, event));
        assert!(!scheduler.handle_event(&mut cx, event));
        assert!(!scheduler.fire(&mut cx, el));
        assert_eq!(scheduler.fired_count(), 1);
    }

    #[test]
    fn test_fired_target_is_unregistered_and_never_rehidden() {
        let mut doc = MemoryDocument::new();
        let mut timers: TimerQueue<AnimationTask> = TimerQueue::new();
        let el = card(&mut doc, 100.0);
        let mut scheduler = fade_up_scheduler();
        scheduler.register(&mut doc, el, 0);

        let mut cx = RevealContext::new(&mut doc, &mut timers, SchedulerId::default());
        assert_eq!(scheduler.observe(&mut cx, &viewport(0.0)), 1);
        assert!(!scheduler.watcher().contains(el));

        // Scroll away and back: no events, state stays revealed
        assert_eq!(scheduler.observe(&mut cx, &viewport(5000.0)), 0);
        assert_eq!(scheduler.observe(&mut cx, &viewport(0.0)), 0);
        assert!(!scheduler.register(&mut doc, el, 0));
        assert_eq!(doc.inline_style(el, "opacity").as_deref(), Some("1"));
    }

    #[test]
    fn test_threshold_never_reached_never_fires() {
        let mut doc = MemoryDocument::new();
        let mut timers: TimerQueue<AnimationTask> = TimerQueue::new();
        let body = doc.body();
        let stats = doc
            .create("section")
            .class("stats")
            .bounds(Rect::new(0.0, 0.0, 1000.0, 2000.0))
            .append_to(body);

        let selector = SelectorList::parse(".stat-number").unwrap();
        let mut scheduler = RevealScheduler::new(
            "counters",
            WatcherConfig::new(0.5).unwrap(),
            RevealEffect::counter(CounterEffect::new(selector, "data-count", 2000)),
        );
        scheduler.register(&mut doc, stats, 0);

        // An 800px viewport never shows half of a 2000px section
        let mut cx = RevealContext::new(&mut doc, &mut timers, SchedulerId::default());
        for scroll in [0.0, 400.0, 800.0, 1200.0] {
            assert_eq!(scheduler.observe(&mut cx, &viewport(scroll)), 0);
        }
        assert_eq!(scheduler.pending_count(), 1);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_delay_is_honoured_and_survives_scrolling_away() {
        let mut doc = MemoryDocument::new();
        let mut timers: TimerQueue<AnimationTask> = TimerQueue::new();
        let body = doc.body();
        let el = doc
            .create("div")
            .attr("data-aos", "fade-up")
            .attr("data-aos-delay", "300")
            .bounds(Rect::new(0.0, 100.0, 200.0, 200.0))
            .append_to(body);

        let mut runtime = RevealRuntime::new();
        let id = runtime.add(
            RevealScheduler::new(
                "aos",
                WatcherConfig::new(0.2).unwrap(),
                RevealEffect::class("aos-animate"),
            )
            .with_delay_attribute("data-aos-delay"),
        );
        let selector = SelectorList::parse("[data-aos]").unwrap();
        let added = runtime
            .get_mut(id)
            .map(|scheduler| scheduler.register_matching(&mut doc, &selector));
        assert_eq!(added, Some(1));

        timers.advance_clock(50);
        runtime.observe_all(&mut doc, &mut timers, &viewport(0.0));
        assert!(matches!(
            runtime.get(id).unwrap().state(el),
            Some(RevealState::Scheduled { due: 350, .. })
        ));

        // Out of view again before the delay elapses
        runtime.observe_all(&mut doc, &mut timers, &viewport(3000.0));

        run_until(&mut runtime, &mut doc, &mut timers, 349);
        assert!(!doc.has_class(el, "aos-animate"));

        run_until(&mut runtime, &mut doc, &mut timers, 350);
        assert!(doc.has_class(el, "aos-animate"));
        assert_eq!(
            runtime.get(id).unwrap().state(el),
            Some(RevealState::Fired { at: 350 })
        );
    }

    #[test]
    fn test_invalid_delay_attribute_means_no_delay() {
        let mut doc = MemoryDocument::new();
        let mut timers: TimerQueue<AnimationTask> = TimerQueue::new();
        let body = doc.body();
        let el = doc
            .create("div")
            .attr("data-aos", "zoom-in")
            .attr("data-aos-delay", "soon")
            .bounds(Rect::new(0.0, 0.0, 100.0, 100.0))
            .append_to(body);

        let mut scheduler = RevealScheduler::new(
            "aos",
            WatcherConfig::new(0.2).unwrap(),
            RevealEffect::class("aos-animate"),
        )
        .with_delay_attribute("data-aos-delay");
        scheduler.register_matching(&mut doc, &SelectorList::parse("[data-aos]").unwrap());

        let mut cx = RevealContext::new(&mut doc, &mut timers, SchedulerId::default());
        assert_eq!(scheduler.observe(&mut cx, &viewport(0.0)), 1);
        assert!(doc.has_class(el, "aos-animate"));
    }

    #[test]
    fn test_counter_scheduler_runs_ramps_through_runtime() {
        let mut doc = MemoryDocument::new();
        let mut timers: TimerQueue<AnimationTask> = TimerQueue::new();
        let body = doc.body();
        let stats = doc
            .create("section")
            .class("stats")
            .bounds(Rect::new(0.0, 200.0, 1000.0, 400.0))
            .append_to(body);
        let number = doc
            .create("span")
            .class("stat-number")
            .attr("data-count", "250")
            .text("0")
            .append_to(stats);

        let mut runtime = RevealRuntime::new();
        let selector = SelectorList::parse(".stat-number").unwrap();
        let id = runtime.add(RevealScheduler::new(
            "counters",
            WatcherConfig::new(0.5).unwrap(),
            RevealEffect::counter(CounterEffect::new(selector, "data-count", 2000)),
        ));
        runtime.register(id, &mut doc, stats, 0);
        assert_eq!(runtime.observe_all(&mut doc, &mut timers, &viewport(0.0)), 1);

        // A second pass cannot restart the counter
        runtime.observe_all(&mut doc, &mut timers, &viewport(0.0));
        assert_eq!(timers.len(), 1);

        run_until(&mut runtime, &mut doc, &mut timers, 1984);
        assert_eq!(doc.text(number), "248");
        run_until(&mut runtime, &mut doc, &mut timers, 2000);
        assert_eq!(doc.text(number), "250");
        assert!(timers.is_empty());
    }

    #[test]
    fn test_teardown_cancels_scheduled_reveals() {
        let mut doc = MemoryDocument::new();
        let mut timers: TimerQueue<AnimationTask> = TimerQueue::new();
        let el = card(&mut doc, 0.0);

        let mut runtime = RevealRuntime::new();
        let id = runtime.add(RevealScheduler::new(
            "aos",
            WatcherConfig::default(),
            RevealEffect::class("aos-animate"),
        ));
        runtime.register(id, &mut doc, el, 500);
        runtime.observe_all(&mut doc, &mut timers, &viewport(0.0));
        assert_eq!(timers.len(), 1);

        runtime.teardown(&mut timers);
        assert!(runtime.is_empty());
        assert!(timers.is_empty());
        run_until(&mut runtime, &mut doc, &mut timers, 1000);
        assert!(!doc.has_class(el, "aos-animate"));
    }
}
