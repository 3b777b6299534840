//! Reveal effects
//!
//! What happens to an element when its scheduler fires. An effect writes a
//! hidden state when the element is registered and a revealed state when it
//! fires; any interpolation between the two is left to the host's CSS
//! transitions. Counters are the exception: they drive a numeric ramp on the
//! event-loop timers.

use pitlane_core::{Document, ElementId, SelectorList};
use pitlane_platform::{Millis, TimerId, TimerQueue};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::context::{AnimationTask, RampId, RevealContext};
use crate::counter::{CounterRamp, COUNTER_TICK_MS};

/// Default slide distance of the fade-up style reveal
pub const DEFAULT_REVEAL_OFFSET_PX: f32 = 30.0;

/// Default transition of the fade-up style reveal
pub const DEFAULT_REVEAL_TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";

type StyleList = SmallVec<[(String, String); 3]>;

/// Inline-style reveal: one property list for hidden, one for revealed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleReveal {
    initial: StyleList,
    revealed: StyleList,
}

impl StyleReveal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fade in while sliding up from `offset_px` below
    pub fn fade_up(offset_px: f32, transition: &str) -> Self {
        Self::new()
            .initial("opacity", "0")
            .initial("transform", format!("translateY({offset_px}px)"))
            .initial("transition", transition)
            .revealed("opacity", "1")
            .revealed("transform", "translateY(0)")
    }

    /// Add a property written at registration
    pub fn initial(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.initial.push((property.into(), value.into()));
        self
    }

    /// Add a property written when the element fires
    pub fn revealed(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.revealed.push((property.into(), value.into()));
        self
    }

    pub fn initial_styles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.initial.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn revealed_styles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.revealed.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    fn write(doc: &mut dyn Document, element: ElementId, styles: &StyleList) {
        for (property, value) in styles {
            doc.set_inline_style(element, property, value);
        }
    }
}

#[derive(Clone, Debug)]
struct ActiveRamp {
    element: ElementId,
    ramp: CounterRamp,
    timer: Option<TimerId>,
}

/// Counter reveal
///
/// Firing a container starts one ramp for every descendant matching
/// `selector`, counting up to the integer in its `attribute`.
#[derive(Clone, Debug)]
pub struct CounterEffect {
    selector: SelectorList,
    attribute: String,
    duration_ms: Millis,
    ramps: SlotMap<RampId, ActiveRamp>,
}

impl CounterEffect {
    pub fn new(selector: SelectorList, attribute: impl Into<String>, duration_ms: Millis) -> Self {
        Self {
            selector,
            attribute: attribute.into(),
            duration_ms,
            ramps: SlotMap::with_key(),
        }
    }

    pub fn selector(&self) -> &SelectorList {
        &self.selector
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn duration_ms(&self) -> Millis {
        self.duration_ms
    }

    /// Number of ramps still ticking
    pub fn active_ramps(&self) -> usize {
        self.ramps.len()
    }

    fn start<T: From<AnimationTask>>(&mut self, cx: &mut RevealContext<'_, T>, container: ElementId) {
        for element in cx.doc.query_within(container, &self.selector) {
            let raw = cx.doc.attribute(element, &self.attribute).unwrap_or_default();
            let target = match leading_integer(&raw) {
                Some(target) => target,
                None => {
                    tracing::warn!(
                        ?element,
                        attribute = %self.attribute,
                        value = %raw,
                        "counter target is not an integer, skipping"
                    );
                    continue;
                }
            };

            let ramp_id = self.ramps.insert(ActiveRamp {
                element,
                ramp: CounterRamp::new(target, self.duration_ms),
                timer: None,
            });
            let task = AnimationTask::CounterTick {
                scheduler: cx.scheduler,
                ramp: ramp_id,
            };
            match cx.timers.set_interval(COUNTER_TICK_MS, task) {
                Ok(timer) => {
                    self.ramps[ramp_id].timer = Some(timer);
                    tracing::debug!(?element, target, duration_ms = self.duration_ms, "counter started");
                }
                Err(err) => {
                    tracing::warn!(?element, %err, "failed to arm counter timer");
                    self.ramps.remove(ramp_id);
                }
            }
        }
    }

    fn tick<T>(&mut self, cx: &mut RevealContext<'_, T>, ramp_id: RampId) -> bool {
        let Some(active) = self.ramps.get_mut(ramp_id) else {
            return false;
        };

        let step = active.ramp.tick();
        cx.doc.set_text(active.element, &step.value.to_string());

        if step.finished {
            if let Some(timer) = active.timer.take() {
                cx.timers.clear(timer);
            }
            tracing::debug!(element = ?active.element, value = step.value, "counter finished");
            self.ramps.remove(ramp_id);
        }
        true
    }

    fn stop_all<T>(&mut self, timers: &mut TimerQueue<T>) {
        for (_, active) in self.ramps.drain() {
            if let Some(timer) = active.timer {
                timers.clear(timer);
            }
        }
    }
}

/// Read the integer at the start of `raw`, ignoring anything after it
///
/// `" 300+ "` reads as 300 and `"98.5"` as 98; text without leading digits
/// has no value.
fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.trim_start_matches(['+', '-']);
    let sign_len = trimmed.len() - unsigned.len();
    if sign_len > 1 {
        return None;
    }
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }
    trimmed[..sign_len + digits].parse().ok()
}

/// Mutation applied by a scheduler when a target fires
#[derive(Clone, Debug)]
pub enum RevealEffect {
    /// Write inline styles
    Style(StyleReveal),
    /// Add a class; visuals come from a style sheet
    Class(String),
    /// Start counter ramps under the fired container
    Counter(CounterEffect),
}

impl RevealEffect {
    pub fn style(reveal: StyleReveal) -> Self {
        RevealEffect::Style(reveal)
    }

    pub fn class(class: impl Into<String>) -> Self {
        RevealEffect::Class(class.into())
    }

    pub fn counter(counter: CounterEffect) -> Self {
        RevealEffect::Counter(counter)
    }

    /// Put a freshly registered element into its hidden state
    pub fn prepare(&self, doc: &mut dyn Document, element: ElementId) {
        if let RevealEffect::Style(reveal) = self {
            StyleReveal::write(doc, element, &reveal.initial);
        }
    }

    /// Reveal `element`
    pub fn apply<T: From<AnimationTask>>(&mut self, cx: &mut RevealContext<'_, T>, element: ElementId) {
        match self {
            RevealEffect::Style(reveal) => StyleReveal::write(cx.doc, element, &reveal.revealed),
            RevealEffect::Class(class) => cx.doc.set_class(element, class, true),
            RevealEffect::Counter(counter) => counter.start(cx, element),
        }
    }

    /// Advance a counter ramp, returning false when it is unknown
    pub fn tick<T>(&mut self, cx: &mut RevealContext<'_, T>, ramp: RampId) -> bool {
        match self {
            RevealEffect::Counter(counter) => counter.tick(cx, ramp),
            _ => false,
        }
    }

    /// Cancel every timer the effect still owns
    pub fn teardown<T>(&mut self, timers: &mut TimerQueue<T>) {
        if let RevealEffect::Counter(counter) = self {
            counter.stop_all(timers);
        }
    }

    pub fn as_counter(&self) -> Option<&CounterEffect> {
        match self {
            RevealEffect::Counter(counter) => Some(counter),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SchedulerId;
    use crate::counter::DEFAULT_COUNTER_DURATION_MS;
    use pitlane_core::{DocumentExt, MemoryDocument};

    fn stat_counter() -> CounterEffect {
        CounterEffect::new(
            SelectorList::parse(".stat-number").unwrap(),
            "data-count",
            DEFAULT_COUNTER_DURATION_MS,
        )
    }

    fn stats_doc() -> (MemoryDocument, ElementId, ElementId, ElementId) {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let section = doc.create("section").class("stats").append_to(body);
        let first = doc
            .create("span")
            .class("stat-number")
            .attr("data-count", "250")
            .text("0")
            .append_to(section);
        let second = doc
            .create("span")
            .class("stat-number")
            .attr("data-count", "12")
            .text("0")
            .append_to(section);
        (doc, section, first, second)
    }

    fn drain(
        effect: &mut RevealEffect,
        doc: &mut MemoryDocument,
        timers: &mut TimerQueue<AnimationTask>,
        until: Millis,
    ) {
        while let Some((_, task)) = timers.pop_due(until) {
            if let AnimationTask::CounterTick { ramp, .. } = task {
                let mut cx = RevealContext::new(doc, timers, SchedulerId::default());
                effect.tick(&mut cx, ramp);
            }
        }
        timers.advance_clock(until);
    }

    #[test]
    fn test_fade_up_writes_hidden_then_revealed() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let card = doc.create("div").class("team-card").append_to(body);
        let mut timers: TimerQueue<AnimationTask> = TimerQueue::new();

        let mut effect = RevealEffect::style(StyleReveal::fade_up(
            DEFAULT_REVEAL_OFFSET_PX,
            DEFAULT_REVEAL_TRANSITION,
        ));
        effect.prepare(&mut doc, card);
        assert_eq!(doc.inline_style(card, "opacity").as_deref(), Some("0"));
        assert_eq!(
            doc.inline_style(card, "transform").as_deref(),
            Some("translateY(30px)")
        );
        assert_eq!(
            doc.inline_style(card, "transition").as_deref(),
            Some("opacity 0.6s ease, transform 0.6s ease")
        );

        let mut cx = RevealContext::new(&mut doc, &mut timers, SchedulerId::default());
        effect.apply(&mut cx, card);
        assert_eq!(doc.inline_style(card, "opacity").as_deref(), Some("1"));
        assert_eq!(
            doc.inline_style(card, "transform").as_deref(),
            Some("translateY(0)")
        );
    }

    #[test]
    fn test_class_effect_adds_class_only_on_apply() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let el = doc.create("div").attr("data-aos", "fade-up").append_to(body);
        let mut timers: TimerQueue<AnimationTask> = TimerQueue::new();

        let mut effect = RevealEffect::class("aos-animate");
        effect.prepare(&mut doc, el);
        assert!(!doc.has_class(el, "aos-animate"));

        let mut cx = RevealContext::new(&mut doc, &mut timers, SchedulerId::default());
        effect.apply(&mut cx, el);
        assert!(doc.has_class(el, "aos-animate"));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_counter_ramps_every_stat_to_its_target() {
        let (mut doc, section, first, second) = stats_doc();
        let mut timers: TimerQueue<AnimationTask> = TimerQueue::new();
        let mut effect = RevealEffect::counter(stat_counter());

        let mut cx = RevealContext::new(&mut doc, &mut timers, SchedulerId::default());
        effect.apply(&mut cx, section);
        assert_eq!(effect.as_counter().map(CounterEffect::active_ramps), Some(2));
        assert_eq!(timers.len(), 2);

        drain(&mut effect, &mut doc, &mut timers, 16);
        assert_eq!(doc.text(first), "2");
        assert_eq!(doc.text(second), "0");

        drain(&mut effect, &mut doc, &mut timers, 1000);
        // 62 ticks in
        assert_eq!(doc.text(first), "124");

        drain(&mut effect, &mut doc, &mut timers, 2000);
        assert_eq!(doc.text(first), "250");
        assert_eq!(doc.text(second), "12");
        assert_eq!(effect.as_counter().map(CounterEffect::active_ramps), Some(0));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_counter_skips_malformed_targets() {
        let (mut doc, section, first, _) = stats_doc();
        doc.set_attribute(first, "data-count", "lots");
        let mut timers: TimerQueue<AnimationTask> = TimerQueue::new();
        let mut effect = RevealEffect::counter(stat_counter());

        let mut cx = RevealContext::new(&mut doc, &mut timers, SchedulerId::default());
        effect.apply(&mut cx, section);
        assert_eq!(timers.len(), 1);

        drain(&mut effect, &mut doc, &mut timers, 5000);
        assert_eq!(doc.text(first), "0");
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("250"), Some(250));
        assert_eq!(leading_integer(" 300+ "), Some(300));
        assert_eq!(leading_integer("98.5"), Some(98));
        assert_eq!(leading_integer("-12km"), Some(-12));
        assert_eq!(leading_integer("+7"), Some(7));
        assert_eq!(leading_integer("lots"), None);
        assert_eq!(leading_integer("--5"), None);
        assert_eq!(leading_integer("-"), None);
        assert_eq!(leading_integer(""), None);
        assert_eq!(leading_integer("99999999999999999999"), None);
    }

    #[test]
    fn test_counter_reads_leading_integer() {
        let (mut doc, section, first, second) = stats_doc();
        doc.set_attribute(first, "data-count", "98.5");
        doc.set_attribute(second, "data-count", "300+");
        let mut timers: TimerQueue<AnimationTask> = TimerQueue::new();
        let mut effect = RevealEffect::counter(stat_counter());

        let mut cx = RevealContext::new(&mut doc, &mut timers, SchedulerId::default());
        effect.apply(&mut cx, section);
        assert_eq!(timers.len(), 2);

        drain(&mut effect, &mut doc, &mut timers, 2000);
        assert_eq!(doc.text(first), "98");
        assert_eq!(doc.text(second), "300");
    }

    #[test]
    fn test_teardown_cancels_ramps() {
        let (mut doc, section, first, _) = stats_doc();
        let mut timers: TimerQueue<AnimationTask> = TimerQueue::new();
        let mut effect = RevealEffect::counter(stat_counter());

        let mut cx = RevealContext::new(&mut doc, &mut timers, SchedulerId::default());
        effect.apply(&mut cx, section);
        drain(&mut effect, &mut doc, &mut timers, 160);
        effect.teardown(&mut timers);

        assert!(timers.is_empty());
        let frozen = doc.text(first);
        drain(&mut effect, &mut doc, &mut timers, 5000);
        assert_eq!(doc.text(first), frozen);
        assert_eq!(doc.select_all(".stat-number").unwrap().len(), 2);
    }
}
