//! Window focus signal

use std::rc::Rc;

use crate::engine::SignalSink;
use crate::host::{DocumentHost, EventListener, ListenerId};
use crate::state::Signal;

const FOCUS_EVENTS: [&str; 2] = ["focus", "blur"];

/// Tracks `document.hasFocus()` through window focus/blur events
pub(crate) struct FocusSignal {
    document: Rc<dyn DocumentHost>,
    listeners: Vec<(&'static str, ListenerId)>,
}

impl FocusSignal {
    pub(crate) fn new(document: Rc<dyn DocumentHost>) -> Self {
        Self { document, listeners: Vec::new() }
    }

    pub(crate) fn probe(&self) -> bool {
        self.document.has_focus()
    }

    /// Listen for focus changes, then record the current focus
    pub(crate) fn subscribe(&mut self, sink: &SignalSink) {
        if self.is_subscribed() {
            return;
        }

        let listener: EventListener = {
            let document = Rc::clone(&self.document);
            let sink = sink.clone();
            Rc::new(move || {
                sink.record(Signal::DocumentFocused, document.has_focus());
                sink.evaluate();
            })
        };

        for event in FOCUS_EVENTS {
            let id = self.document.add_event_listener(event, Rc::clone(&listener));
            self.listeners.push((event, id));
        }
        sink.record(Signal::DocumentFocused, self.probe());
    }

    pub(crate) fn unsubscribe(&mut self) {
        for (event, id) in self.listeners.drain(..) {
            if !self.document.remove_event_listener(event, id) {
                tracing::debug!(event, id, "Focus listener was already gone");
            }
        }
    }

    pub(crate) fn is_subscribed(&self) -> bool {
        !self.listeners.is_empty()
    }
}
