//! Page configuration
//!
//! Every field defaults to the page's stock behaviour, so an empty TOML
//! document (or [`PageConfig::default`]) yields the standard page:
//!
//! ```toml
//! [reveal]
//! threshold = 0.1
//! root_margin = "0px 0px -100px 0px"
//!
//! [counters]
//! duration_ms = 2000
//!
//! [lifecycle]
//! current_year = 2025
//! ```

use std::fs;
use std::path::Path;

use pitlane_animation::{
    AOS_ANIMATE_CLASS, AOS_ATTRIBUTE, AOS_DELAY_ATTRIBUTE, AOS_TRANSITION,
    DEFAULT_COUNTER_DURATION_MS, DEFAULT_REVEAL_OFFSET_PX, DEFAULT_REVEAL_TRANSITION,
};
use pitlane_animation::WatcherConfig;
use pitlane_core::{Insets, SelectorList};
use pitlane_platform::Millis;
use serde::{Deserialize, Serialize};

use crate::error::{PageError, Result};

/// Mobile navigation menu
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Menu toggle button
    pub hamburger: String,
    /// Collapsible menu
    pub menu: String,
    /// Links inside the menu
    pub links: String,
    /// Class marking the open menu and the current link
    pub active_class: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            hamburger: "#hamburger".to_string(),
            menu: "#navMenu".to_string(),
            links: ".nav-link".to_string(),
            active_class: "active".to_string(),
        }
    }
}

/// Header style change once the page scrolls
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub navbar: String,
    pub scrolled_class: String,
    /// Scroll offset the page must exceed before the class is added
    pub scroll_threshold: f32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            navbar: "#header .navbar".to_string(),
            scrolled_class: "scrolled".to_string(),
            scroll_threshold: 100.0,
        }
    }
}

/// In-page anchor scrolling
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothScrollConfig {
    pub anchors: String,
    /// Height of the fixed header kept clear above the target
    pub header_offset: f32,
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self {
            anchors: "a[href^=\"#\"]".to_string(),
            header_offset: 80.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    pub selector: String,
    /// Fraction of the scroll offset the element moves by
    pub factor: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            selector: ".hero".to_string(),
            factor: 0.5,
        }
    }
}

/// Inline-style fade-up reveal of content cards
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selector: String,
    pub threshold: f32,
    /// CSS margin shorthand applied to the viewport
    pub root_margin: String,
    /// Initial downward offset in pixels
    pub offset_px: f32,
    pub transition: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".timeline-item, .team-card, .news-card, .stat-card, .record-card"
                .to_string(),
            threshold: 0.1,
            root_margin: "0px 0px -100px 0px".to_string(),
            offset_px: DEFAULT_REVEAL_OFFSET_PX,
            transition: DEFAULT_REVEAL_TRANSITION.to_string(),
        }
    }
}

impl RevealConfig {
    pub fn watcher_config(&self) -> Result<WatcherConfig> {
        let margin = Insets::parse(&self.root_margin)?;
        Ok(WatcherConfig::new(self.threshold)?.with_root_margin(margin))
    }
}

/// Animated statistics counters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountersConfig {
    /// Section whose visibility starts the counters; only the first match is used
    pub section: String,
    pub number: String,
    /// Attribute holding each counter's integer target
    pub attribute: String,
    pub threshold: f32,
    pub duration_ms: Millis,
}

impl Default for CountersConfig {
    fn default() -> Self {
        Self {
            section: ".stats".to_string(),
            number: ".stat-number".to_string(),
            attribute: "data-count".to_string(),
            threshold: 0.5,
            duration_ms: DEFAULT_COUNTER_DURATION_MS,
        }
    }
}

impl CountersConfig {
    pub fn watcher_config(&self) -> Result<WatcherConfig> {
        Ok(WatcherConfig::new(self.threshold)?)
    }
}

/// Attribute-driven entry animations
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AosConfig {
    /// Attribute selecting the preset; elements carrying it are registered
    pub attribute: String,
    pub delay_attribute: String,
    pub animate_class: String,
    pub threshold: f32,
    pub transition: String,
}

impl Default for AosConfig {
    fn default() -> Self {
        Self {
            attribute: AOS_ATTRIBUTE.to_string(),
            delay_attribute: AOS_DELAY_ATTRIBUTE.to_string(),
            animate_class: AOS_ANIMATE_CLASS.to_string(),
            threshold: 0.2,
            transition: AOS_TRANSITION.to_string(),
        }
    }
}

impl AosConfig {
    pub fn watcher_config(&self) -> Result<WatcherConfig> {
        Ok(WatcherConfig::new(self.threshold)?)
    }

    /// Selector for every opted-in element
    pub fn selector(&self) -> String {
        format!("[{}]", self.attribute)
    }
}

/// Scroll handler debounce
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    pub wait_ms: Millis,
    /// Run on the leading edge instead of the trailing edge
    pub immediate: bool,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            wait_ms: 10,
            immediate: true,
        }
    }
}

/// Page load fade-in and footer year
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub fade_in_delay_ms: Millis,
    pub fade_in_transition: String,
    pub footer_selector: String,
    /// Text replaced by the current year, first occurrence only
    pub year_placeholder: String,
    /// Year to substitute; the system clock is used when unset
    pub current_year: Option<i32>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            fade_in_delay_ms: 100,
            fade_in_transition: "opacity 0.5s ease".to_string(),
            footer_selector: ".footer-bottom p".to_string(),
            year_placeholder: "2024".to_string(),
            current_year: None,
        }
    }
}

/// Configuration of every page behaviour
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub navigation: NavigationConfig,
    pub header: HeaderConfig,
    pub smooth_scroll: SmoothScrollConfig,
    pub parallax: ParallaxConfig,
    pub reveal: RevealConfig,
    pub counters: CountersConfig,
    pub aos: AosConfig,
    pub debounce: DebounceConfig,
    pub lifecycle: LifecycleConfig,
}

impl PageConfig {
    /// Parse a TOML document; missing sections and keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PageConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| PageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "page config loaded");
        Ok(config)
    }

    /// Check every selector, threshold and length
    pub fn validate(&self) -> Result<()> {
        for selector in [
            self.navigation.hamburger.as_str(),
            self.navigation.menu.as_str(),
            self.navigation.links.as_str(),
            self.header.navbar.as_str(),
            self.smooth_scroll.anchors.as_str(),
            self.parallax.selector.as_str(),
            self.reveal.selector.as_str(),
            self.counters.section.as_str(),
            self.counters.number.as_str(),
            self.lifecycle.footer_selector.as_str(),
        ] {
            SelectorList::parse(selector)?;
        }
        SelectorList::parse(&self.aos.selector())?;

        self.reveal.watcher_config()?;
        self.counters.watcher_config()?;
        self.aos.watcher_config()?;

        for (field, value) in [
            ("header.scroll_threshold", self.header.scroll_threshold),
            ("smooth_scroll.header_offset", self.smooth_scroll.header_offset),
            ("parallax.factor", self.parallax.factor),
            ("reveal.offset_px", self.reveal.offset_px),
        ] {
            if !value.is_finite() {
                return Err(PageError::Invalid {
                    field,
                    reason: format!("{value} is not a finite number"),
                });
            }
        }

        if self.lifecycle.year_placeholder.is_empty() {
            return Err(PageError::Invalid {
                field: "lifecycle.year_placeholder",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Set the reveal threshold.
    pub fn with_reveal_threshold(mut self, threshold: f32) -> Self {
        self.reveal.threshold = threshold;
        self
    }

    /// Set the reveal root margin.
    pub fn with_reveal_root_margin(mut self, root_margin: impl Into<String>) -> Self {
        self.reveal.root_margin = root_margin.into();
        self
    }

    /// Set the counter ramp duration.
    pub fn with_counter_duration(mut self, duration_ms: Millis) -> Self {
        self.counters.duration_ms = duration_ms;
        self
    }

    /// Set the fixed-header offset used by anchor scrolling.
    pub fn with_header_offset(mut self, offset: f32) -> Self {
        self.smooth_scroll.header_offset = offset;
        self
    }

    /// Set the parallax factor.
    pub fn with_parallax_factor(mut self, factor: f32) -> Self {
        self.parallax.factor = factor;
        self
    }

    /// Pin the year written into the footer.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.lifecycle.current_year = Some(year);
        self
    }

    /// Set the scroll debounce window.
    pub fn with_debounce(mut self, wait_ms: Millis, immediate: bool) -> Self {
        self.debounce = DebounceConfig { wait_ms, immediate };
        self
    }
}
