//! Scroll Demo
//!
//! Mounts the page on an in-memory document and replays a visitor scrolling
//! from the hero down to the footer:
//! - body fade-in and footer year on load
//! - card reveals and the statistics counters as they come into view
//! - delayed attribute-driven reveals
//! - an in-page anchor click
//!
//! Run with: cargo run -p pitlane_app --example scroll_demo [config.toml]
//! Set RUST_LOG=debug to watch every reveal.

use pitlane_app::prelude::*;
use pitlane_core::{Document, DocumentExt, MemoryDocument, Rect};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => PageConfig::load(path)?,
        None => PageConfig::default(),
    };

    let mut page = Page::mount(build_document(), config)?;
    page.dispatch(Event::DomContentLoaded);
    page.advance(100);

    // Scroll down the page 120px per frame
    let mut y = 0.0;
    while y <= 3200.0 {
        page.dispatch(Event::Scroll { y });
        page.advance(16);
        y += 120.0;
    }
    page.advance(2000);

    for stat in page.document().select_all(".stat-number")? {
        tracing::info!(
            label = %page.document().attribute(stat, "aria-label").unwrap_or_default(),
            value = %page.document().text(stat),
            "counter"
        );
    }

    if let Some(link) = page.document().select_one("a[href=\"#team\"]")? {
        let dispatch = page.dispatch(Event::Click { target: link });
        tracing::info!(scroll = ?dispatch.scroll, "anchor click");
    }

    let schedulers = page.schedulers();
    for (name, id) in [
        ("reveal", schedulers.reveal),
        ("counters", schedulers.counters),
        ("aos", schedulers.aos),
    ] {
        if let Some(scheduler) = page.scheduler(id) {
            tracing::info!(
                scheduler = name,
                fired = scheduler.fired_count(),
                pending = scheduler.pending_count(),
                "reveal progress"
            );
        }
    }

    page.teardown();
    Ok(())
}

/// A single-column page, 1280px wide
fn build_document() -> MemoryDocument {
    let mut doc = MemoryDocument::new();
    let body = doc.body();

    let header = doc.create("header").id("header").append_to(body);
    let navbar = doc.create("nav").class("navbar").append_to(header);
    doc.create("div").id("hamburger").append_to(navbar);
    let menu = doc.create("ul").id("navMenu").append_to(navbar);
    for section in ["history", "stats", "team"] {
        doc.create("a")
            .class("nav-link")
            .attr("href", &format!("#{section}"))
            .append_to(menu);
    }

    doc.create("section")
        .class("hero")
        .bounds(Rect::new(0.0, 0.0, 1280.0, 800.0))
        .append_to(body);

    let history = doc
        .create("section")
        .id("history")
        .bounds(Rect::new(0.0, 800.0, 1280.0, 900.0))
        .append_to(body);
    for (i, year) in ["1950", "1988", "2008"].into_iter().enumerate() {
        doc.create("div")
            .class("timeline-item")
            .attr("data-aos", if i % 2 == 0 { "fade-right" } else { "fade-left" })
            .attr("data-aos-delay", &(i * 100).to_string())
            .text(year)
            .bounds(Rect::new(0.0, 850.0 + i as f32 * 280.0, 1280.0, 240.0))
            .append_to(history);
    }

    let stats = doc
        .create("section")
        .id("stats")
        .class("stats")
        .bounds(Rect::new(0.0, 1700.0, 1280.0, 400.0))
        .append_to(body);
    for (i, (label, count)) in [("races", "1100"), ("wins", "243"), ("titles", "16")]
        .into_iter()
        .enumerate()
    {
        let card = doc
            .create("div")
            .class("stat-card")
            .bounds(Rect::new(i as f32 * 420.0, 1750.0, 400.0, 300.0))
            .append_to(stats);
        doc.create("span")
            .class("stat-number")
            .attr("data-count", count)
            .attr("aria-label", label)
            .text("0")
            .append_to(card);
    }

    let team = doc
        .create("section")
        .id("team")
        .bounds(Rect::new(0.0, 2100.0, 1280.0, 700.0))
        .append_to(body);
    for i in 0..4 {
        doc.create("div")
            .class("team-card")
            .attr("data-aos", "zoom-in")
            .bounds(Rect::new(i as f32 * 320.0, 2200.0, 300.0, 400.0))
            .append_to(team);
    }

    let footer = doc.create("footer").append_to(body);
    let bottom = doc.create("div").class("footer-bottom").append_to(footer);
    doc.create("p")
        .text("&copy; 2024 Pitlane. All rights reserved.")
        .append_to(bottom);

    doc
}
