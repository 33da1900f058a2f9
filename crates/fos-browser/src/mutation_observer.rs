//! Mutation Observer API
//!
//! Page-side registry of mutation observers and their callbacks.
//! Records are queued on DOM changes and delivered as one batch per
//! observer at the next microtask checkpoint.

use fos_dom::{DomTree, MutationObserver, MutationObserverInit, MutationRecord, NodeId};
use fos_visibility::host::MutationCallback;

/// Mutation observer manager
#[derive(Default)]
pub struct MutationObserverManager {
    observers: Vec<(MutationObserver, MutationCallback)>,
}

impl MutationObserverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create observer
    pub fn create(&mut self, callback: MutationCallback) -> u64 {
        let observer = MutationObserver::new();
        let id = observer.id();
        self.observers.push((observer, callback));
        id
    }

    fn get(&mut self, id: u64) -> Option<&mut MutationObserver> {
        self.observers.iter_mut().find(|(o, _)| o.id() == id).map(|(o, _)| o)
    }

    pub fn observe(&mut self, id: u64, target: NodeId, init: MutationObserverInit) {
        if let Some(observer) = self.get(id) {
            observer.observe(target, init);
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

    /// Notify all observers of a mutation
    pub fn notify(&mut self, mutation: &MutationRecord, tree: &DomTree) {
        for (observer, _) in &mut self.observers {
            observer.record(mutation, tree);
        }
    }

    /// Drain queued records, one batch per observer
    pub fn take_batches(&mut self) -> Vec<(MutationCallback, Vec<MutationRecord>)> {
        self.observers
            .iter_mut()
            .filter(|(o, _)| o.has_pending())
            .map(|(o, callback)| (callback.clone(), o.take_records()))
            .collect()
    }

    /// Observers with at least one observed target
    pub fn active_count(&self) -> usize {
        self.observers.iter().filter(|(o, _)| o.is_active()).count()
    }
}
