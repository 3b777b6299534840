//! Page load fade-in and footer year

use std::time::{SystemTime, UNIX_EPOCH};

use pitlane_core::{Document, SelectorList};
use pitlane_platform::Millis;

use crate::config::LifecycleConfig;
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct Lifecycle {
    fade_in_delay_ms: Millis,
    fade_in_transition: String,
    footer: SelectorList,
    year_placeholder: String,
    year: i32,
}

impl Lifecycle {
    pub fn new(config: &LifecycleConfig) -> Result<Self> {
        Ok(Self {
            fade_in_delay_ms: config.fade_in_delay_ms,
            fade_in_transition: config.fade_in_transition.clone(),
            footer: SelectorList::parse(&config.footer_selector)?,
            year_placeholder: config.year_placeholder.clone(),
            year: config.current_year.unwrap_or_else(current_year),
        })
    }

    /// Delay between hiding the body and fading it in
    pub fn fade_in_delay_ms(&self) -> Millis {
        self.fade_in_delay_ms
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Hide the body and stamp the footer year
    pub fn on_loaded(&self, doc: &mut dyn Document) {
        let body = doc.body();
        doc.set_inline_style(body, "opacity", "0");

        if let Some(footer) = doc.query_one(&self.footer) {
            let html = doc.inner_html(footer);
            if html.contains(&self.year_placeholder) {
                let stamped = html.replacen(&self.year_placeholder, &self.year.to_string(), 1);
                doc.set_inner_html(footer, &stamped);
            }
        }
    }

    /// Start the body fade-in
    pub fn fade_in(&self, doc: &mut dyn Document) {
        let body = doc.body();
        doc.set_inline_style(body, "transition", &self.fade_in_transition);
        doc.set_inline_style(body, "opacity", "1");
    }
}

/// Current UTC year from the system clock
pub fn current_year() -> i32 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    year_from_days((secs / 86_400) as i64)
}

/// Proleptic Gregorian year of a day count since 1970-01-01
fn year_from_days(days: i64) -> i32 {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let year = yoe + era * 400 + if mp >= 10 { 1 } else { 0 };
    year as i32
}
