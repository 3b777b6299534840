//! The page runtime
//!
//! [`Page`] owns the document, the viewport, the event-loop timers and every
//! behaviour wired onto the page. Hosts feed it [`Event`]s and advance its
//! clock; the page answers each event with a [`Dispatch`] describing what
//! the host still has to do (prevent a default action, scroll the window).
//!
//! Every event that can move content relative to the viewport (load,
//! scroll, resize, frame) is followed by an observation pass of the reveal
//! schedulers.

use pitlane_animation::{
    aos_stylesheet, AnimationTask, AosPreset, CounterEffect, RevealEffect, RevealRuntime,
    RevealScheduler, SchedulerId, StyleReveal,
};
use pitlane_core::{Document, ElementId, SelectorList};
use pitlane_platform::{Debounce, Dispatch, Event, Millis, TimerId, TimerQueue, Viewport};

use crate::anchors::SmoothScroll;
use crate::config::PageConfig;
use crate::error::Result;
use crate::lifecycle::Lifecycle;
use crate::nav::Navigation;
use crate::scroll::{HeaderEffect, Parallax};

/// Timer payloads of a page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageTask {
    /// Reveal delay or counter tick
    Animation(AnimationTask),
    /// Body fade-in after load
    BodyFadeIn,
    /// Scroll debounce window elapsed
    ScrollDebounce,
}

impl From<AnimationTask> for PageTask {
    fn from(task: AnimationTask) -> Self {
        PageTask::Animation(task)
    }
}

/// Ids of the page's three reveal schedulers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSchedulers {
    /// Inline-style fade-up of content cards
    pub reveal: SchedulerId,
    /// Statistics counters
    pub counters: SchedulerId,
    /// Attribute-driven presets
    pub aos: SchedulerId,
}

/// A mounted page
pub struct Page<D: Document> {
    doc: D,
    config: PageConfig,
    viewport: Viewport,
    timers: TimerQueue<PageTask>,
    runtime: RevealRuntime,
    schedulers: PageSchedulers,
    navigation: Navigation,
    header: HeaderEffect,
    anchors: SmoothScroll,
    parallax: Parallax,
    lifecycle: Lifecycle,
    scroll_debounce: Debounce,
    fade_in: Option<TimerId>,
    last_scroll: f32,
}

impl<D: Document> Page<D> {
    /// Validate `config` and wire every behaviour onto `doc`
    ///
    /// Elements are enumerated once, here. Reveal targets get their hidden
    /// state immediately; the first observation pass runs on the first
    /// load, scroll, resize or frame event.
    pub fn mount(mut doc: D, config: PageConfig) -> Result<Self> {
        config.validate()?;

        let navigation = Navigation::bind(&doc, &config.navigation)?;
        let anchors = SmoothScroll::bind(&doc, &config.smooth_scroll)?;
        let header = HeaderEffect::new(&config.header)?;
        let parallax = Parallax::new(&config.parallax)?;
        let lifecycle = Lifecycle::new(&config.lifecycle)?;

        let mut runtime = RevealRuntime::new();
        let schedulers = PageSchedulers {
            counters: runtime.add(counter_scheduler(&mut doc, &config)?),
            reveal: runtime.add(reveal_scheduler(&mut doc, &config)?),
            aos: runtime.add(aos_scheduler(&mut doc, &config)?),
        };

        doc.append_style_sheet(&aos_stylesheet(
            &config.aos.attribute,
            &config.aos.animate_class,
            &config.aos.transition,
        ));

        let scroll_debounce = Debounce::new(config.debounce.wait_ms, config.debounce.immediate);

        let page = Self {
            doc,
            config,
            viewport: Viewport::default(),
            timers: TimerQueue::new(),
            runtime,
            schedulers,
            navigation,
            header,
            anchors,
            parallax,
            lifecycle,
            scroll_debounce,
            fade_in: None,
            last_scroll: 0.0,
        };

        tracing::info!(
            reveal = page.target_count(page.schedulers.reveal),
            counters = page.target_count(page.schedulers.counters),
            aos = page.target_count(page.schedulers.aos),
            "page loaded"
        );
        Ok(page)
    }

    /// Replace the viewport, e.g. to start from the host's real size
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Handle one host event
    pub fn dispatch(&mut self, event: Event) -> Dispatch {
        tracing::trace!(?event, now = self.timers.now(), "dispatch");
        match event {
            Event::DomContentLoaded => {
                self.lifecycle.on_loaded(&mut self.doc);
                if let Some(previous) = self.fade_in.take() {
                    self.timers.clear(previous);
                }
                self.fade_in = Some(
                    self.timers
                        .set_timeout(self.lifecycle.fade_in_delay_ms(), PageTask::BodyFadeIn),
                );
                self.observe();
                Dispatch::none()
            }
            Event::Scroll { y } => {
                self.on_scroll(y);
                self.observe();
                Dispatch::none()
            }
            Event::Resize { width, height } => {
                match self.resize(width, height) {
                    Ok(()) => self.observe(),
                    Err(err) => tracing::warn!(%err, "resize ignored"),
                }
                Dispatch::none()
            }
            Event::Click { target } => self.on_click(target),
            Event::Frame => {
                self.observe();
                Dispatch::none()
            }
        }
    }

    /// Resize the viewport, keeping the scroll offset
    ///
    /// Negative or non-finite sizes are rejected and leave the viewport as it was.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        let scroll_y = self.viewport.scroll_y;
        self.viewport = Viewport {
            scroll_y,
            ..Viewport::new(width, height)?
        };
        Ok(())
    }

    /// Move the clock forward by `ms`, running every timer that becomes due
    ///
    /// Returns the number of timer tasks run.
    pub fn advance(&mut self, ms: Millis) -> usize {
        let until = self.timers.now().saturating_add(ms);
        self.advance_to(until)
    }

    /// Move the clock to `until`, running every timer due at or before it
    pub fn advance_to(&mut self, until: Millis) -> usize {
        let mut ran = 0;
        while let Some((id, task)) = self.timers.pop_due(until) {
            self.run_task(id, task);
            ran += 1;
        }
        self.timers.advance_clock(until);
        ran
    }

    /// Cancel every timer and stop all reveal tracking
    pub fn teardown(&mut self) {
        self.runtime.teardown(&mut self.timers);
        self.scroll_debounce.cancel(&mut self.timers);
        if let Some(fade_in) = self.fade_in.take() {
            self.timers.clear(fade_in);
        }
        tracing::debug!(pending = self.timers.len(), "page torn down");
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn into_document(self) -> D {
        self.doc
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Current event-loop time
    pub fn now(&self) -> Millis {
        self.timers.now()
    }

    /// Number of armed timers
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Last scroll offset seen
    pub fn last_scroll(&self) -> f32 {
        self.last_scroll
    }

    pub fn schedulers(&self) -> PageSchedulers {
        self.schedulers
    }

    pub fn scheduler(&self, id: SchedulerId) -> Option<&RevealScheduler> {
        self.runtime.get(id)
    }

    pub fn runtime(&self) -> &RevealRuntime {
        &self.runtime
    }

    fn target_count(&self, id: SchedulerId) -> usize {
        self.runtime.get(id).map_or(0, RevealScheduler::len)
    }

    fn observe(&mut self) {
        self.runtime
            .observe_all(&mut self.doc, &mut self.timers, &self.viewport);
    }

    fn on_scroll(&mut self, y: f32) {
        self.viewport.scroll_y = y;
        self.header.on_scroll(&mut self.doc, y);
        self.parallax.on_scroll(&mut self.doc, y);
        self.last_scroll = y;

        if self
            .scroll_debounce
            .call(&mut self.timers, PageTask::ScrollDebounce)
        {
            self.debounced_scroll();
        }
    }

    /// Debounced scroll hook; nothing is attached to it yet
    fn debounced_scroll(&mut self) {
        tracing::trace!(scroll_y = self.last_scroll, "debounced scroll");
    }

    /// Deliver a click to the target and then each ancestor, like a bubbling DOM event
    fn on_click(&mut self, target: ElementId) -> Dispatch {
        let mut dispatch = Dispatch::none();
        let mut current = Some(target);

        while let Some(element) = current {
            self.navigation.handle_click(&mut self.doc, element);
            if let Some(scroll) = self.anchors.handle_click(&self.doc, element, &self.viewport) {
                dispatch.merge(scroll);
            }
            current = self.doc.parent(element);
        }
        dispatch
    }

    fn run_task(&mut self, id: TimerId, task: PageTask) {
        match task {
            PageTask::Animation(task) => {
                self.runtime.run_task(&mut self.doc, &mut self.timers, task);
            }
            PageTask::BodyFadeIn => {
                self.fade_in = None;
                self.lifecycle.fade_in(&mut self.doc);
            }
            PageTask::ScrollDebounce => {
                if self.scroll_debounce.expire(id) {
                    self.debounced_scroll();
                }
            }
        }
    }
}

fn counter_scheduler(doc: &mut dyn Document, config: &PageConfig) -> Result<RevealScheduler> {
    let counters = &config.counters;
    let effect = CounterEffect::new(
        SelectorList::parse(&counters.number)?,
        counters.attribute.clone(),
        counters.duration_ms,
    );
    let mut scheduler = RevealScheduler::new(
        "counters",
        counters.watcher_config()?,
        RevealEffect::counter(effect),
    );

    match doc.query_one(&SelectorList::parse(&counters.section)?) {
        Some(section) => {
            scheduler.register(doc, section, 0);
        }
        None => tracing::debug!(selector = %counters.section, "no stats section, counters disabled"),
    }
    Ok(scheduler)
}

fn reveal_scheduler(doc: &mut dyn Document, config: &PageConfig) -> Result<RevealScheduler> {
    let reveal = &config.reveal;
    let mut scheduler = RevealScheduler::new(
        "reveal",
        reveal.watcher_config()?,
        RevealEffect::style(StyleReveal::fade_up(reveal.offset_px, &reveal.transition)),
    );
    scheduler.register_matching(doc, &SelectorList::parse(&reveal.selector)?);
    Ok(scheduler)
}

fn aos_scheduler(doc: &mut dyn Document, config: &PageConfig) -> Result<RevealScheduler> {
    let aos = &config.aos;
    let selector = SelectorList::parse(&aos.selector())?;

    for element in doc.query_all(&selector) {
        let preset = doc.attribute(element, &aos.attribute).unwrap_or_default();
        if AosPreset::from_name(&preset).is_none() {
            tracing::warn!(?element, %preset, "unknown animation preset, only opacity will animate");
        }
    }

    let mut scheduler = RevealScheduler::new(
        "aos",
        aos.watcher_config()?,
        RevealEffect::class(aos.animate_class.clone()),
    )
    .with_delay_attribute(aos.delay_attribute.clone());
    scheduler.register_matching(doc, &selector);
    Ok(scheduler)
}
