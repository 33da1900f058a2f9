//! fOS Visibility Demo - Main Entry Point
//!
//! Drives a headless page through a scripted session and logs every
//! visibility transition of one element.
//!
//! Usage: `fos-visibility-demo [settings.json]`

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Context;
use fos_browser::HeadlessPage;
use fos_dom::{DOMRect, NodeId};
use fos_visibility::{ObserverSettings, VisibilityObserver, VisibilityObserverOptions};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {path}"))?;
            ObserverSettings::from_json(&json).with_context(|| format!("Invalid settings in {path}"))?
        }
        None => ObserverSettings { log: true, ..ObserverSettings::default() },
    };
    tracing::info!(?settings, "Starting fOS Visibility demo");

    let page = HeadlessPage::new(1280.0, 720.0);
    let banner = page.create_element("div");
    page.set_rect(banner, DOMRect::from_xywh(0.0, 1500.0, 600.0, 200.0));

    let transitions = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&transitions);
    let options = VisibilityObserverOptions::new(banner)
        .with_settings(settings)
        .callback(move |visible| {
            counter.set(counter.get() + 1);
            println!("banner {}", if visible { "visible" } else { "hidden" });
        });
    let mut observer = VisibilityObserver::new(options, &page.environment())?;

    // Below the fold
    page.update_rendering();

    step("scroll banner into view", || page.scroll_to(0.0, 1200.0), &page);
    step("background the tab", || page.hide(), &page);
    step("foreground the tab", || page.show(), &page);
    step("fade out", || set_style(&page, banner, "opacity: 0"), &page);
    step("fade in", || set_style(&page, banner, "opacity: 0.8"), &page);
    step("unrelated attribute", || page_attr(&page, banner), &page);
    step("blur the window", || page.blur(), &page);
    step("focus the window", || page.focus(), &page);
    step("display none", || set_style(&page, banner, "display: none"), &page);

    observer.stop_observe();
    tracing::info!(
        transitions = transitions.get(),
        listeners = page.listener_count(),
        observers = page.observer_count(),
        "Demo finished"
    );
    Ok(())
}

fn step(label: &str, action: impl FnOnce(), page: &HeadlessPage) {
    tracing::info!("{label}");
    action();
    page.update_rendering();
}

fn set_style(page: &HeadlessPage, node: NodeId, css: &str) {
    if let Err(err) = page.set_style(node, css) {
        tracing::warn!(%err, "Failed to set style");
    }
}

fn page_attr(page: &HeadlessPage, node: NodeId) {
    if let Err(err) = page.set_attribute(node, "data-seen", "1") {
        tracing::warn!(%err, "Failed to set attribute");
    }
}
