//! Window event listeners

use std::rc::Rc;

use fos_visibility::host::{EventListener, ListenerId};

/// Listeners keyed by event name, in registration order
#[derive(Default)]
pub struct EventRegistry {
    next_id: ListenerId,
    listeners: Vec<(String, ListenerId, EventListener)>,
}

impl EventRegistry {
    pub fn add(&mut self, event: &str, listener: EventListener) -> ListenerId {
        self.next_id += 1;
        self.listeners.push((event.to_string(), self.next_id, listener));
        self.next_id
    }

    pub fn remove(&mut self, event: &str, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(name, lid, _)| !(name == event && *lid == id));
        self.listeners.len() != before
    }

    /// Snapshot of the listeners for `event`; dispatch runs on the
    /// snapshot so listeners may add or remove listeners.
    pub fn listeners_for(&self, event: &str) -> Vec<EventListener> {
        self.listeners
            .iter()
            .filter(|(name, _, _)| name == event)
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}
