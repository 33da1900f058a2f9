//! Observer registry
//!
//! Maps elements to the observer watching them, for callers that need
//! to look an observer up by element.

use std::collections::HashMap;

use fos_dom::NodeId;

use crate::observer::VisibilityObserver;

/// Element -> observer lookup owned by the application
#[derive(Debug, Default)]
pub struct ObserverRegistry {
    observers: HashMap<NodeId, VisibilityObserver>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer under its target. Returns the observer it
    /// replaced, if any.
    pub fn insert(&mut self, observer: VisibilityObserver) -> Option<VisibilityObserver> {
        self.observers.insert(observer.target(), observer)
    }

    pub fn get(&self, element: NodeId) -> Option<&VisibilityObserver> {
        self.observers.get(&element)
    }

    pub fn get_mut(&mut self, element: NodeId) -> Option<&mut VisibilityObserver> {
        self.observers.get_mut(&element)
    }

    /// Unregister. The caller owns the returned observer; dropping it
    /// stops observation.
    pub fn remove(&mut self, element: NodeId) -> Option<VisibilityObserver> {
        self.observers.remove(&element)
    }

    /// Stop every registered observer, keeping them registered.
    /// Returns how many were observing.
    pub fn stop_all(&mut self) -> usize {
        self.observers
            .values_mut()
            .map(VisibilityObserver::stop_observe)
            .filter(|&stopped| stopped)
            .count()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
