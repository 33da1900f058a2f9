//! Headless Page
//!
//! A single-threaded page with a DOM, per-element layout rects, window
//! focus and the page visibility state. Implements every host service
//! a [`VisibilityObserver`](fos_visibility::VisibilityObserver) needs.
//!
//! Nothing runs on its own: DOM changes queue mutation records that
//! [`HeadlessPage::run_microtasks`] delivers, and intersections are
//! computed by [`HeadlessPage::update_rendering`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use fos_css::StyleResolver;
use fos_dom::{
    DOMRect, DomError, DomTree, IntersectionObserverInit, MutationObserverInit, MutationRecord,
    NodeId,
};
use fos_visibility::host::{
    ComputedStyleSource, DocumentHost, EventListener, IntersectionCallback, IntersectionHandle,
    IntersectionService, ListenerId, MutationCallback, MutationHandle, MutationService,
};
use fos_visibility::{resolve_visibility_api_names, Environment, VisibilityCapabilities};

use crate::events::EventRegistry;
use crate::intersection_observer::IntersectionObserverManager;
use crate::mutation_observer::MutationObserverManager;
use crate::page_visibility::{DocumentVisibility, VisibilityState, VisibilityVendor};

/// Milliseconds between two rendering updates
const FRAME_MS: f64 = 16.0;

/// A headless page
pub struct HeadlessPage {
    tree: RefCell<DomTree>,
    body: NodeId,
    styles: StyleResolver,
    /// Layout rects in document coordinates
    layout: RefCell<HashMap<NodeId, DOMRect>>,
    viewport_size: (f64, f64),
    scroll: Cell<(f64, f64)>,
    vendor: VisibilityVendor,
    visibility: RefCell<DocumentVisibility>,
    focused: Cell<bool>,
    events: RefCell<EventRegistry>,
    intersections: Rc<RefCell<IntersectionObserverManager>>,
    mutations: Rc<RefCell<MutationObserverManager>>,
    now: Cell<f64>,
}

impl HeadlessPage {
    /// Focused, visible page with the unprefixed visibility API
    pub fn new(width: f64, height: f64) -> Rc<Self> {
        Self::with_vendor(width, height, VisibilityVendor::Standard)
    }

    /// Page exposing the visibility API of `vendor`
    pub fn with_vendor(width: f64, height: f64, vendor: VisibilityVendor) -> Rc<Self> {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        for (parent, child) in [(tree.root(), html), (html, body)] {
            if let Err(err) = tree.append_child(parent, child) {
                tracing::warn!(%err, "Failed to build page skeleton");
            }
        }

        let mut layout = HashMap::new();
        let page_rect = DOMRect::from_xywh(0.0, 0.0, width, height);
        layout.insert(html, page_rect);
        layout.insert(body, page_rect);

        tracing::debug!(width, height, ?vendor, "Created headless page");

        Rc::new(Self {
            tree: RefCell::new(tree),
            body,
            styles: StyleResolver::new(),
            layout: RefCell::new(layout),
            viewport_size: (width, height),
            scroll: Cell::new((0.0, 0.0)),
            vendor,
            visibility: RefCell::new(DocumentVisibility::new()),
            focused: Cell::new(true),
            events: RefCell::default(),
            intersections: Rc::default(),
            mutations: Rc::default(),
            now: Cell::new(0.0),
        })
    }

    /// Host services backed by this page
    pub fn environment(self: &Rc<Self>) -> Environment {
        Environment::from_host(self)
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create an element and append it to `<body>`
    pub fn create_element(&self, tag: &str) -> NodeId {
        let node = self.tree.borrow_mut().create_element(tag);
        if let Err(err) = self.append_child(self.body, node) {
            tracing::warn!(%err, tag, "Failed to attach new element to body");
        }
        node
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        tree.append_child(parent, child)?;
        let record = MutationRecord::child_list(parent, vec![child], Vec::new());
        self.mutations.borrow_mut().notify(&record, &tree);
        Ok(())
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        let old_value = tree.set_attribute(node, name, value)?;
        let record = MutationRecord::attributes(node, name, old_value);
        self.mutations.borrow_mut().notify(&record, &tree);
        Ok(())
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        // Removing an absent attribute is not a mutation
        if let Some(old_value) = tree.remove_attribute(node, name)? {
            let record = MutationRecord::attributes(node, name, Some(old_value));
            self.mutations.borrow_mut().notify(&record, &tree);
        }
        Ok(())
    }

    /// Replace the inline `style` attribute
    pub fn set_style(&self, node: NodeId, css: &str) -> Result<(), DomError> {
        self.set_attribute(node, "style", css)
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree.borrow().get_attribute(node, name).map(str::to_string)
    }

    /// Place `node` in document coordinates
    pub fn set_rect(&self, node: NodeId, rect: DOMRect) {
        self.layout.borrow_mut().insert(node, rect);
    }

    pub fn scroll_to(&self, x: f64, y: f64) {
        self.scroll.set((x.max(0.0), y.max(0.0)));
    }

    /// Visible area in viewport coordinates
    pub fn viewport(&self) -> DOMRect {
        DOMRect::from_xywh(0.0, 0.0, self.viewport_size.0, self.viewport_size.1)
    }

    /// Give the window input focus. Fires `focus` on change.
    pub fn focus(&self) {
        if !self.focused.replace(true) {
            self.dispatch_event("focus");
        }
    }

    /// Take input focus away. Fires `blur` on change.
    pub fn blur(&self) {
        if self.focused.replace(false) {
            self.dispatch_event("blur");
        }
    }

    /// Background the tab
    pub fn hide(&self) {
        self.set_visibility_state(VisibilityState::Hidden);
    }

    /// Bring the tab to the foreground
    pub fn show(&self) {
        self.set_visibility_state(VisibilityState::Visible);
    }

    fn set_visibility_state(&self, state: VisibilityState) {
        let changed = self.visibility.borrow_mut().set_state(state);
        if !changed {
            return;
        }
        if let Ok(names) = resolve_visibility_api_names(self.vendor.capabilities()) {
            self.dispatch_event(names.event_name);
        }
    }

    /// Invoke every listener registered for `event`
    pub fn dispatch_event(&self, event: &str) {
        let listeners = self.events.borrow().listeners_for(event);
        tracing::trace!(event, listeners = listeners.len(), "Dispatching window event");
        for listener in listeners {
            listener();
        }
    }

    /// Deliver queued mutation records until none are left
    pub fn run_microtasks(&self) {
        loop {
            let batches = self.mutations.borrow_mut().take_batches();
            if batches.is_empty() {
                break;
            }
            for (callback, records) in batches {
                callback(&records);
            }
        }
    }

    /// Run microtasks, then recompute intersections and deliver the
    /// resulting entries
    pub fn update_rendering(&self) {
        self.run_microtasks();

        let time = self.now.get() + FRAME_MS;
        self.now.set(time);

        let rects = self.rendered_rects();
        let results = self.intersections.borrow_mut().process(self.viewport(), &rects, time);
        for (callback, entries) in results {
            callback(&entries);
        }

        self.run_microtasks();
    }

    /// Viewport-relative rects of every rendered element. Elements
    /// under `display: none` produce no box.
    fn rendered_rects(&self) -> HashMap<NodeId, DOMRect> {
        let tree = self.tree.borrow();
        let (scroll_x, scroll_y) = self.scroll.get();

        self.layout
            .borrow()
            .iter()
            .filter(|&(&node, _)| self.is_rendered(&tree, node))
            .map(|(&node, rect)| (node, rect.translate(-scroll_x, -scroll_y)))
            .collect()
    }

    fn is_rendered(&self, tree: &DomTree, node: NodeId) -> bool {
        if !tree.is_connected(node) {
            return false;
        }
        std::iter::once(node)
            .chain(tree.ancestors(node))
            .filter(|&n| n != tree.root())
            .all(|n| self.styles.computed_value(tree, n, "display").as_deref() != Some("none"))
    }

    /// Registered window event listeners
    pub fn listener_count(&self) -> usize {
        self.events.borrow().len()
    }

    /// Intersection and mutation observers currently observing a target
    pub fn observer_count(&self) -> usize {
        self.intersections.borrow().active_count() + self.mutations.borrow().active_count()
    }
}

impl ComputedStyleSource for HeadlessPage {
    fn computed_style(&self, element: NodeId, property: &str) -> Option<String> {
        self.styles.computed_value(&self.tree.borrow(), element, property)
    }
}

impl DocumentHost for HeadlessPage {
    fn has_focus(&self) -> bool {
        self.focused.get()
    }

    fn visibility_capabilities(&self) -> VisibilityCapabilities {
        self.vendor.capabilities()
    }

    fn visibility_property(&self, name: &str) -> Option<String> {
        let names = resolve_visibility_api_names(self.vendor.capabilities()).ok()?;
        let visibility = self.visibility.borrow();
        if name == names.state_property {
            return Some(visibility.visibility_state().as_str().to_string());
        }
        if Some(name) == self.vendor.hidden_property() {
            return Some(visibility.is_hidden().to_string());
        }
        None
    }

    fn add_event_listener(&self, event: &str, listener: EventListener) -> ListenerId {
        self.events.borrow_mut().add(event, listener)
    }

    fn remove_event_listener(&self, event: &str, id: ListenerId) -> bool {
        self.events.borrow_mut().remove(event, id)
    }
}

/// Handle to one observer in the page's intersection manager
struct PageIntersectionObserver {
    manager: Weak<RefCell<IntersectionObserverManager>>,
    id: u64,
}

impl IntersectionHandle for PageIntersectionObserver {
    fn observe(&self, target: NodeId) {
        if let Some(manager) = self.manager.upgrade() {
            manager.borrow_mut().observe(self.id, target);
        }
    }

    fn unobserve(&self, target: NodeId) {
        if let Some(manager) = self.manager.upgrade() {
            manager.borrow_mut().unobserve(self.id, target);
        }
    }

    fn disconnect(&self) {
        if let Some(manager) = self.manager.upgrade() {
            manager.borrow_mut().disconnect(self.id);
        }
    }
}

impl Drop for PageIntersectionObserver {
    fn drop(&mut self) {
        if let Some(manager) = self.manager.upgrade() {
            manager.borrow_mut().remove(self.id);
        }
    }
}

impl IntersectionService for HeadlessPage {
    fn create_intersection_observer(
        &self,
        init: IntersectionObserverInit,
        callback: IntersectionCallback,
    ) -> Result<Box<dyn IntersectionHandle>, DomError> {
        let id = self.intersections.borrow_mut().create(init, callback)?;
        Ok(Box::new(PageIntersectionObserver {
            manager: Rc::downgrade(&self.intersections),
            id,
        }))
    }
}

/// Handle to one observer in the page's mutation manager
struct PageMutationObserver {
    manager: Weak<RefCell<MutationObserverManager>>,
    id: u64,
}

impl MutationHandle for PageMutationObserver {
    fn observe(&self, target: NodeId, init: MutationObserverInit) {
        if let Some(manager) = self.manager.upgrade() {
            manager.borrow_mut().observe(self.id, target, init);
        }
    }

    fn disconnect(&self) {
        if let Some(manager) = self.manager.upgrade() {
            manager.borrow_mut().disconnect(self.id);
        }
    }
}

impl Drop for PageMutationObserver {
    fn drop(&mut self) {
        if let Some(manager) = self.manager.upgrade() {
            manager.borrow_mut().remove(self.id);
        }
    }
}

impl MutationService for HeadlessPage {
    fn create_mutation_observer(&self, callback: MutationCallback) -> Box<dyn MutationHandle> {
        let id = self.mutations.borrow_mut().create(callback);
        Box::new(PageMutationObserver {
            manager: Rc::downgrade(&self.mutations),
            id,
        })
    }
}
