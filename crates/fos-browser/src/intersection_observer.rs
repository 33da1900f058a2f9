//! Intersection Observer API
//!
//! Page-side registry of intersection observers. Intersections are
//! recomputed on each rendering update.

use std::collections::HashMap;

use fos_dom::{
    DOMRect, DomError, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    NodeId,
};
use fos_visibility::host::IntersectionCallback;

/// Intersection observer manager
#[derive(Default)]
pub struct IntersectionObserverManager {
    observers: Vec<(IntersectionObserver, IntersectionCallback)>,
}

impl IntersectionObserverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create observer
    pub fn create(
        &mut self,
        init: IntersectionObserverInit,
        callback: IntersectionCallback,
    ) -> Result<u64, DomError> {
        let observer = IntersectionObserver::new(init)?;
        let id = observer.id();
        self.observers.push((observer, callback));
        Ok(id)
    }

    fn get(&mut self, id: u64) -> Option<&mut IntersectionObserver> {
        self.observers.iter_mut().find(|(o, _)| o.id() == id).map(|(o, _)| o)
    }

    pub fn observe(&mut self, id: u64, target: NodeId) {
        if let Some(observer) = self.get(id) {
            observer.observe(target);
        }
    }

    pub fn unobserve(&mut self, id: u64, target: NodeId) {
        if let Some(observer) = self.get(id) {
            observer.unobserve(target);
        }
    }

    pub fn disconnect(&mut self, id: u64) {
        if let Some(observer) = self.get(id) {
            observer.disconnect();
        }
    }

    /// Remove observer
    pub fn remove(&mut self, id: u64) {
        self.observers.retain(|(o, _)| o.id() != id);
    }

    /// Process all observers. An observer with an explicit root uses
    /// that element's rect; a root that is not rendered intersects nothing.
    pub fn process(
        &mut self,
        viewport: DOMRect,
        element_rects: &HashMap<NodeId, DOMRect>,
        time: f64,
    ) -> Vec<(IntersectionCallback, Vec<IntersectionObserverEntry>)> {
        let mut results = Vec::new();
        for (observer, callback) in &mut self.observers {
            let root_bounds = match observer.root() {
                Some(root) => element_rects.get(&root).copied(),
                None => Some(viewport),
            };
            observer.check_intersections(root_bounds, element_rects, time);
            if observer.has_pending() {
                results.push((callback.clone(), observer.take_entries()));
            }
        }
        results
    }

    /// Observers watching at least one target
    pub fn active_count(&self) -> usize {
        self.observers.iter().filter(|(o, _)| o.observed_count() > 0).count()
    }
}
