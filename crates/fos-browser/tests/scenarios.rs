//! End-to-end visibility scenarios on a headless page

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use fos_browser::{HeadlessPage, VisibilityVendor};
use fos_dom::{DOMRect, NodeId};
use fos_visibility::{
    Lifecycle, ObserverError, ObserverRegistry, ObserverSettings, Signal, VisibilityObserver,
    VisibilityObserverOptions,
};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Page with one 100x100 `<div>` at the top left of the viewport
fn page_with_box() -> (Rc<HeadlessPage>, NodeId) {
    let page = HeadlessPage::new(800.0, 600.0);
    let div = page.create_element("div");
    page.set_rect(div, DOMRect::from_xywh(0.0, 0.0, 100.0, 100.0));
    (page, div)
}

fn observe(
    page: &Rc<HeadlessPage>,
    options: VisibilityObserverOptions,
) -> (VisibilityObserver, Rc<RefCell<Vec<bool>>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    let options = options.callback(move |visible| sink.borrow_mut().push(visible));
    let observer = VisibilityObserver::new(options, &page.environment()).unwrap();
    (observer, calls)
}

#[test]
fn test_fully_visible_element() {
    let (page, div) = page_with_box();
    let (observer, calls) = observe(&page, VisibilityObserverOptions::new(div));

    // Nothing is reported before the first rendering update
    assert!(calls.borrow().is_empty());
    assert_eq!(observer.verdict(), None);

    page.update_rendering();
    assert_eq!(*calls.borrow(), vec![true]);
    assert!(observer.signal_state().all_visible());

    page.update_rendering();
    assert_eq!(*calls.borrow(), vec![true]);
}

#[test]
fn test_display_none_at_start() {
    let (page, div) = page_with_box();
    page.set_style(div, "display: none").unwrap();
    let (observer, calls) = observe(&page, VisibilityObserverOptions::new(div));

    page.update_rendering();
    assert_eq!(*calls.borrow(), vec![false]);
    assert!(!observer.signal_state().get(Signal::CssDisplay));
    assert!(!observer.signal_state().get(Signal::ViewportIntersecting));
}

#[test]
fn test_hidden_ancestor() {
    let (page, div) = page_with_box();
    page.set_attribute(page.body(), "hidden", "").unwrap();
    let (observer, calls) = observe(&page, VisibilityObserverOptions::new(div));

    page.update_rendering();
    assert_eq!(*calls.borrow(), vec![false]);
    // The element's own display is still block
    assert!(observer.signal_state().get(Signal::CssDisplay));
}

#[test]
fn test_tab_background_and_foreground() {
    let (page, div) = page_with_box();
    let (observer, calls) = observe(&page, VisibilityObserverOptions::new(div));
    page.update_rendering();

    page.hide();
    assert_eq!(*calls.borrow(), vec![true, false]);
    assert!(!observer.signal_state().get(Signal::DocumentVisible));

    page.show();
    assert_eq!(*calls.borrow(), vec![true, false, true]);
}

#[test]
fn test_prefixed_visibility_api() {
    let page = HeadlessPage::with_vendor(800.0, 600.0, VisibilityVendor::Moz);
    let div = page.create_element("div");
    page.set_rect(div, DOMRect::from_xywh(0.0, 0.0, 100.0, 100.0));
    let (_observer, calls) = observe(&page, VisibilityObserverOptions::new(div));
    page.update_rendering();

    page.hide();
    assert_eq!(*calls.borrow(), vec![true, false]);
}

#[test]
fn test_unsupported_visibility_api() {
    let page = HeadlessPage::with_vendor(800.0, 600.0, VisibilityVendor::Unsupported);
    let div = page.create_element("div");
    let result = VisibilityObserver::new(VisibilityObserverOptions::new(div), &page.environment());
    assert!(matches!(result, Err(ObserverError::Unsupported(_))));
    assert_eq!(page.listener_count(), 0);
}

#[test]
fn test_window_blur() {
    let (page, div) = page_with_box();
    let (_observer, calls) = observe(&page, VisibilityObserverOptions::new(div));
    page.update_rendering();

    page.blur();
    page.focus();
    assert_eq!(*calls.borrow(), vec![true, false, true]);
}

#[test]
fn test_style_mutations() {
    let (page, div) = page_with_box();
    let (_observer, calls) = observe(&page, VisibilityObserverOptions::new(div));
    page.update_rendering();

    page.set_style(div, "opacity: 0").unwrap();
    // Mutations are delivered at the microtask checkpoint
    assert_eq!(*calls.borrow(), vec![true]);
    page.run_microtasks();
    assert_eq!(*calls.borrow(), vec![true, false]);

    page.set_style(div, "opacity: 0.01; visibility: hidden").unwrap();
    page.run_microtasks();
    assert_eq!(*calls.borrow(), vec![true, false]);

    page.remove_attribute(div, "style").unwrap();
    page.run_microtasks();
    assert_eq!(*calls.borrow(), vec![true, false, true]);
}

#[test]
fn test_unrelated_attribute_mutation() {
    let (page, div) = page_with_box();
    let (observer, calls) = observe(&page, VisibilityObserverOptions::new(div));
    page.update_rendering();
    let before = observer.signal_state();

    page.set_attribute(div, "data-tracking", "42").unwrap();
    page.set_attribute(div, "class", "banner").unwrap();
    page.update_rendering();

    assert_eq!(*calls.borrow(), vec![true]);
    assert_eq!(observer.signal_state(), before);
}

#[test]
fn test_scroll_in_and_out() {
    let (page, div) = page_with_box();
    page.set_rect(div, DOMRect::from_xywh(0.0, 2000.0, 100.0, 100.0));
    let (_observer, calls) = observe(&page, VisibilityObserverOptions::new(div));

    page.update_rendering();
    assert_eq!(*calls.borrow(), vec![false]);

    page.scroll_to(0.0, 1600.0);
    page.update_rendering();
    assert_eq!(*calls.borrow(), vec![false, true]);

    page.scroll_to(0.0, 0.0);
    page.update_rendering();
    assert_eq!(*calls.borrow(), vec![false, true, false]);
}

#[test]
fn test_root_margin_extends_viewport() {
    let (page, div) = page_with_box();
    page.set_rect(div, DOMRect::from_xywh(0.0, 650.0, 100.0, 100.0));
    let (_observer, calls) = observe(&page, VisibilityObserverOptions::new(div).root_margin("100px"));

    page.update_rendering();
    assert_eq!(*calls.borrow(), vec![true]);
}

#[test]
fn test_threshold() {
    let (page, div) = page_with_box();
    // A quarter of the element is inside the viewport
    page.set_rect(div, DOMRect::from_xywh(0.0, 575.0, 100.0, 100.0));
    let (_observer, calls) = observe(&page, VisibilityObserverOptions::new(div).threshold(0.5));

    page.update_rendering();
    // Any overlap still counts as intersecting
    assert_eq!(*calls.borrow(), vec![true]);

    page.set_rect(div, DOMRect::from_xywh(0.0, 700.0, 100.0, 100.0));
    page.update_rendering();
    assert_eq!(*calls.borrow(), vec![true, false]);
}

#[test]
fn test_explicit_root() {
    let (page, div) = page_with_box();
    let scroller = page.create_element("section");
    page.set_rect(scroller, DOMRect::from_xywh(500.0, 0.0, 200.0, 200.0));
    let (_observer, calls) = observe(&page, VisibilityObserverOptions::new(div).root(scroller));

    page.update_rendering();
    assert_eq!(*calls.borrow(), vec![false]);

    page.set_rect(div, DOMRect::from_xywh(550.0, 50.0, 50.0, 50.0));
    page.update_rendering();
    assert_eq!(*calls.borrow(), vec![false, true]);
}

#[test]
fn test_start_stop_releases_everything() {
    let (page, div) = page_with_box();
    let (mut observer, calls) = observe(&page, VisibilityObserverOptions::new(div).observe(false));
    assert_eq!(observer.lifecycle(), Lifecycle::Idle);
    assert_eq!(page.listener_count(), 0);
    assert_eq!(page.observer_count(), 0);

    assert!(observer.start_observe());
    assert!(!observer.start_observe());
    assert_eq!(page.listener_count(), 3);
    assert_eq!(page.observer_count(), 2);

    assert!(observer.stop_observe());
    assert!(!observer.stop_observe());
    assert_eq!(page.listener_count(), 0);
    assert_eq!(page.observer_count(), 0);

    // Nothing evaluates after stop
    page.update_rendering();
    page.hide();
    page.blur();
    page.set_style(div, "display: none").unwrap();
    page.run_microtasks();
    assert!(calls.borrow().is_empty());
    assert_eq!(observer.verdict(), None);
}

#[test]
fn test_restart_reports_only_changes() {
    let (page, div) = page_with_box();
    let (mut observer, calls) = observe(&page, VisibilityObserverOptions::new(div));
    page.update_rendering();

    observer.stop_observe();
    page.hide();
    observer.start_observe();
    page.update_rendering();
    page.show();

    assert_eq!(*calls.borrow(), vec![true, false, true]);
}

#[test]
fn test_drop_releases_subscriptions() {
    let (page, div) = page_with_box();
    let (observer, _calls) = observe(&page, VisibilityObserverOptions::new(div));
    assert!(page.listener_count() > 0);

    drop(observer);
    assert_eq!(page.listener_count(), 0);
    assert_eq!(page.observer_count(), 0);
}

#[test]
fn test_callback_can_stop_observer() {
    let (page, div) = page_with_box();
    let slot: Rc<RefCell<Option<VisibilityObserver>>> = Rc::new(RefCell::new(None));
    let calls = Rc::new(RefCell::new(Vec::new()));

    let options = {
        let slot = Rc::clone(&slot);
        let calls = Rc::clone(&calls);
        VisibilityObserverOptions::new(div).callback(move |visible| {
            calls.borrow_mut().push(visible);
            if !visible {
                if let Some(observer) = slot.borrow_mut().as_mut() {
                    observer.stop_observe();
                }
            }
        })
    };
    *slot.borrow_mut() = Some(VisibilityObserver::new(options, &page.environment()).unwrap());

    page.update_rendering();
    page.hide();
    page.show();
    assert_eq!(*calls.borrow(), vec![true, false]);
    assert_eq!(page.listener_count(), 0);
}

#[test]
fn test_registry_per_element() {
    let page = HeadlessPage::new(800.0, 600.0);
    let top = page.create_element("div");
    let bottom = page.create_element("div");
    page.set_rect(top, DOMRect::from_xywh(0.0, 0.0, 100.0, 100.0));
    page.set_rect(bottom, DOMRect::from_xywh(0.0, 5000.0, 100.0, 100.0));

    let mut registry = ObserverRegistry::new();
    for node in [top, bottom] {
        let observer =
            VisibilityObserver::new(VisibilityObserverOptions::new(node), &page.environment()).unwrap();
        registry.insert(observer);
    }
    page.update_rendering();

    assert_eq!(registry.get(top).and_then(|o| o.verdict()), Some(true));
    assert_eq!(registry.get(bottom).and_then(|o| o.verdict()), Some(false));

    assert_eq!(registry.stop_all(), 2);
    assert_eq!(page.listener_count(), 0);
}

#[test]
fn test_settings_from_json() {
    let (page, div) = page_with_box();
    let settings = ObserverSettings::from_json(r#"{ "observe": false, "intersectionThreshold": 0.25 }"#).unwrap();
    let (observer, _calls) = observe(&page, VisibilityObserverOptions::new(div).with_settings(settings));
    assert!(!observer.is_observing());
}

#[test]
fn test_collection_target_rejected() {
    let (page, div) = page_with_box();
    let other = page.create_element("div");
    let result = VisibilityObserver::new(
        VisibilityObserverOptions::new(vec![div, other]),
        &page.environment(),
    );
    assert!(matches!(result, Err(ObserverError::CollectionTarget(2))));
}

/// Collects the `blocking` field of every "Visibility changed" event
#[derive(Clone, Default)]
struct TransitionLog(Arc<Mutex<Vec<String>>>);

impl TransitionLog {
    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct EventFields {
    message: Option<String>,
    blocking: Option<String>,
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = Some(format!("{value:?}")),
            "blocking" => self.blocking = Some(format!("{value:?}")),
            _ => {}
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for TransitionLog {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != tracing::Level::INFO {
            return;
        }
        let mut fields = EventFields::default();
        event.record(&mut fields);
        if fields.message.as_deref() == Some("Visibility changed") {
            self.0.lock().unwrap().push(fields.blocking.unwrap_or_default());
        }
    }
}

#[test]
fn test_log_once_per_transition() {
    let log = TransitionLog::default();
    let subscriber = tracing_subscriber::registry().with(log.clone());

    tracing::subscriber::with_default(subscriber, || {
        let (page, div) = page_with_box();
        let (_observer, calls) = observe(&page, VisibilityObserverOptions::new(div).log(true));

        page.update_rendering();
        assert_eq!(log.entries().len(), 1);

        // Re-evaluations without a verdict change stay silent
        page.set_attribute(div, "data-tracking", "1").unwrap();
        page.update_rendering();
        page.dispatch_event("focus");
        assert_eq!(log.entries().len(), 1);

        page.blur();
        page.dispatch_event("blur");
        page.focus();
        assert_eq!(*calls.borrow(), vec![true, false, true]);
    });

    assert_eq!(log.entries(), vec!["[]", "[DocumentFocused]", "[]"]);
}

#[test]
fn test_no_log_without_flag() {
    let log = TransitionLog::default();
    let subscriber = tracing_subscriber::registry().with(log.clone());

    tracing::subscriber::with_default(subscriber, || {
        let (page, div) = page_with_box();
        let (_observer, calls) = observe(&page, VisibilityObserverOptions::new(div));
        page.update_rendering();
        page.hide();
        assert_eq!(*calls.borrow(), vec![true, false]);
    });

    assert!(log.entries().is_empty());
}
