//! Host environment interfaces
//!
//! Everything the observer needs from the page: computed style, window
//! events, the page visibility API, and intersection/mutation observers.

use std::rc::Rc;

use fos_dom::{
    DomError, IntersectionObserverEntry, IntersectionObserverInit, MutationObserverInit,
    MutationRecord, NodeId,
};

use crate::compat::VisibilityCapabilities;

/// Handle returned by [`DocumentHost::add_event_listener`]
pub type ListenerId = u64;

/// Window event listener
pub type EventListener = Rc<dyn Fn()>;

/// Receives one batch of intersection entries
pub type IntersectionCallback = Rc<dyn Fn(&[IntersectionObserverEntry])>;

/// Receives one batch of mutation records
pub type MutationCallback = Rc<dyn Fn(&[MutationRecord])>;

/// Computed style reader
pub trait ComputedStyleSource {
    /// Computed value of `property` (CSS notation, e.g. `"opacity"`).
    /// None when the element has no style context.
    fn computed_style(&self, element: NodeId, property: &str) -> Option<String>;
}

/// Window-level events, focus and page visibility
pub trait DocumentHost {
    /// Whether the document has input focus
    fn has_focus(&self) -> bool;

    /// Which page visibility properties exist
    fn visibility_capabilities(&self) -> VisibilityCapabilities;

    /// Read a document property such as `visibilityState`
    fn visibility_property(&self, name: &str) -> Option<String>;

    fn add_event_listener(&self, event: &str, listener: EventListener) -> ListenerId;

    /// Returns whether a listener was removed
    fn remove_event_listener(&self, event: &str, id: ListenerId) -> bool;
}

/// Intersection observer instance owned by a signal source
pub trait IntersectionHandle {
    fn observe(&self, target: NodeId);
    fn unobserve(&self, target: NodeId);
    fn disconnect(&self);
}

pub trait IntersectionService {
    fn create_intersection_observer(
        &self,
        init: IntersectionObserverInit,
        callback: IntersectionCallback,
    ) -> Result<Box<dyn IntersectionHandle>, DomError>;
}

/// Mutation observer instance owned by a signal source
pub trait MutationHandle {
    fn observe(&self, target: NodeId, init: MutationObserverInit);
    fn disconnect(&self);
}

pub trait MutationService {
    fn create_mutation_observer(&self, callback: MutationCallback) -> Box<dyn MutationHandle>;
}

/// The host services an observer is wired to
#[derive(Clone)]
pub struct Environment {
    pub(crate) style: Rc<dyn ComputedStyleSource>,
    pub(crate) document: Rc<dyn DocumentHost>,
    pub(crate) intersection: Rc<dyn IntersectionService>,
    pub(crate) mutation: Rc<dyn MutationService>,
}

impl Environment {
    pub fn new(
        style: Rc<dyn ComputedStyleSource>,
        document: Rc<dyn DocumentHost>,
        intersection: Rc<dyn IntersectionService>,
        mutation: Rc<dyn MutationService>,
    ) -> Self {
        Self { style, document, intersection, mutation }
    }

    /// Use one host object for every service
    pub fn from_host<H>(host: &Rc<H>) -> Self
    where
        H: ComputedStyleSource + DocumentHost + IntersectionService + MutationService + 'static,
    {
        Self {
            style: host.clone(),
            document: host.clone(),
            intersection: host.clone(),
            mutation: host.clone(),
        }
    }
}
