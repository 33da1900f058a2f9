//! In-memory host for unit tests

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use fos_dom::{
    DOMRect, DomError, IntersectionObserverEntry, IntersectionObserverInit, MutationObserverInit,
    MutationRecord, NodeId, RootMargin,
};

use crate::compat::VisibilityCapabilities;
use crate::host::{
    ComputedStyleSource, DocumentHost, Environment, EventListener, IntersectionCallback,
    IntersectionHandle, IntersectionService, ListenerId, MutationCallback, MutationHandle,
    MutationService,
};

const STATE_PROPERTIES: [&str; 4] = [
    "visibilityState",
    "mozVisibilityState",
    "msVisibilityState",
    "webkitVisibilityState",
];

#[derive(Default)]
struct FakeIntersection {
    callback: Option<IntersectionCallback>,
    observed: Vec<NodeId>,
}

#[derive(Default)]
struct FakeMutation {
    callback: Option<MutationCallback>,
    observed: Vec<(NodeId, MutationObserverInit)>,
}

/// Host whose every input is set by hand. Supports one intersection
/// and one mutation observer at a time.
pub(crate) struct FakeHost {
    styles: RefCell<HashMap<(NodeId, String), String>>,
    focused: Cell<bool>,
    capabilities: Cell<VisibilityCapabilities>,
    properties: RefCell<HashMap<String, String>>,
    listeners: RefCell<Vec<(String, ListenerId, EventListener)>>,
    next_listener: Cell<ListenerId>,
    intersection: Rc<RefCell<FakeIntersection>>,
    mutation: Rc<RefCell<FakeMutation>>,
}

impl FakeHost {
    /// Focused, foreground page with the unprefixed visibility API
    pub(crate) fn new() -> Rc<Self> {
        let host = Self {
            styles: RefCell::default(),
            focused: Cell::new(true),
            capabilities: Cell::new(VisibilityCapabilities::standard()),
            properties: RefCell::default(),
            listeners: RefCell::default(),
            next_listener: Cell::new(1),
            intersection: Rc::default(),
            mutation: Rc::default(),
        };
        host.set_page_visible(true);
        Rc::new(host)
    }

    pub(crate) fn environment(self: &Rc<Self>) -> Environment {
        Environment::from_host(self)
    }

    pub(crate) fn set_style(&self, element: NodeId, property: &str, value: &str) {
        self.styles.borrow_mut().insert((element, property.to_string()), value.to_string());
    }

    pub(crate) fn set_visible_style(&self, element: NodeId) {
        self.set_style(element, "visibility", "visible");
        self.set_style(element, "display", "block");
        self.set_style(element, "opacity", "1");
    }

    pub(crate) fn set_focus(&self, focused: bool) {
        self.focused.set(focused);
    }

    pub(crate) fn set_capabilities(&self, capabilities: VisibilityCapabilities) {
        self.capabilities.set(capabilities);
    }

    pub(crate) fn set_property(&self, name: &str, value: &str) {
        self.properties.borrow_mut().insert(name.to_string(), value.to_string());
    }

    pub(crate) fn set_page_visible(&self, visible: bool) {
        let value = if visible { "visible" } else { "hidden" };
        for name in STATE_PROPERTIES {
            self.set_property(name, value);
        }
    }

    pub(crate) fn dispatch(&self, event: &str) {
        let listeners: Vec<EventListener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(name, _, _)| name == event)
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    pub(crate) fn listener_count(&self, event: &str) -> usize {
        self.listeners.borrow().iter().filter(|(name, _, _)| name == event).count()
    }

    pub(crate) fn total_listeners(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub(crate) fn deliver_intersections(&self, entries: &[IntersectionObserverEntry]) {
        let callback = self.intersection.borrow().callback.clone();
        if let Some(callback) = callback {
            callback(entries);
        }
    }

    /// Deliver a single entry for `target`
    pub(crate) fn intersect(&self, target: NodeId, is_intersecting: bool) {
        self.deliver_intersections(&[IntersectionObserverEntry {
            target,
            bounding_client_rect: DOMRect::new(),
            intersection_rect: DOMRect::new(),
            root_bounds: None,
            intersection_ratio: if is_intersecting { 1.0 } else { 0.0 },
            is_intersecting,
            time: 0.0,
        }]);
    }

    pub(crate) fn intersection_observes(&self, target: NodeId) -> bool {
        self.intersection.borrow().observed.contains(&target)
    }

    pub(crate) fn deliver_mutations(&self, records: &[MutationRecord]) {
        let callback = self.mutation.borrow().callback.clone();
        if let Some(callback) = callback {
            callback(records);
        }
    }

    pub(crate) fn mutation_init(&self, target: NodeId) -> Option<MutationObserverInit> {
        self.mutation
            .borrow()
            .observed
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, init)| init.clone())
    }
}

impl ComputedStyleSource for FakeHost {
    fn computed_style(&self, element: NodeId, property: &str) -> Option<String> {
        self.styles.borrow().get(&(element, property.to_string())).cloned()
    }
}

impl DocumentHost for FakeHost {
    fn has_focus(&self) -> bool {
        self.focused.get()
    }

    fn visibility_capabilities(&self) -> VisibilityCapabilities {
        self.capabilities.get()
    }

    fn visibility_property(&self, name: &str) -> Option<String> {
        self.properties.borrow().get(name).cloned()
    }

    fn add_event_listener(&self, event: &str, listener: EventListener) -> ListenerId {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().push((event.to_string(), id, listener));
        id
    }

    fn remove_event_listener(&self, event: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(name, lid, _)| !(name == event && *lid == id));
        listeners.len() != before
    }
}

struct FakeIntersectionHandle(Rc<RefCell<FakeIntersection>>);

impl IntersectionHandle for FakeIntersectionHandle {
    fn observe(&self, target: NodeId) {
        self.0.borrow_mut().observed.push(target);
    }

    fn unobserve(&self, target: NodeId) {
        self.0.borrow_mut().observed.retain(|&t| t != target);
    }

    fn disconnect(&self) {
        self.0.borrow_mut().observed.clear();
    }
}

impl IntersectionService for FakeHost {
    fn create_intersection_observer(
        &self,
        init: IntersectionObserverInit,
        callback: IntersectionCallback,
    ) -> Result<Box<dyn IntersectionHandle>, DomError> {
        RootMargin::parse(&init.root_margin)?;
        self.intersection.borrow_mut().callback = Some(callback);
        Ok(Box::new(FakeIntersectionHandle(Rc::clone(&self.intersection))))
    }
}

struct FakeMutationHandle(Rc<RefCell<FakeMutation>>);

impl MutationHandle for FakeMutationHandle {
    fn observe(&self, target: NodeId, init: MutationObserverInit) {
        self.0.borrow_mut().observed.push((target, init));
    }

    fn disconnect(&self) {
        self.0.borrow_mut().observed.clear();
    }
}

impl MutationService for FakeHost {
    fn create_mutation_observer(&self, callback: MutationCallback) -> Box<dyn MutationHandle> {
        self.mutation.borrow_mut().callback = Some(callback);
        Box::new(FakeMutationHandle(Rc::clone(&self.mutation)))
    }
}
