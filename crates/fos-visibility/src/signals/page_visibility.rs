//! Page (tab) visibility signal

use std::rc::Rc;

use crate::compat::VisibilityApiNames;
use crate::engine::SignalSink;
use crate::host::{DocumentHost, EventListener, ListenerId};
use crate::state::Signal;

/// Tracks whether the page is in the foreground
pub(crate) struct TabVisibilitySignal {
    document: Rc<dyn DocumentHost>,
    names: VisibilityApiNames,
    listener: Option<ListenerId>,
}

impl TabVisibilitySignal {
    pub(crate) fn new(document: Rc<dyn DocumentHost>, names: VisibilityApiNames) -> Self {
        Self { document, names, listener: None }
    }

    pub(crate) fn probe(&self) -> bool {
        is_visible(self.document.as_ref(), self.names)
    }

    /// Listen for visibility changes, then record the current state
    pub(crate) fn subscribe(&mut self, sink: &SignalSink) {
        if self.listener.is_some() {
            return;
        }

        let listener: EventListener = {
            let document = Rc::clone(&self.document);
            let names = self.names;
            let sink = sink.clone();
            Rc::new(move || {
                sink.record(Signal::DocumentVisible, is_visible(document.as_ref(), names));
                sink.evaluate();
            })
        };

        self.listener = Some(self.document.add_event_listener(self.names.event_name, listener));
        sink.record(Signal::DocumentVisible, self.probe());
    }

    pub(crate) fn unsubscribe(&mut self) {
        if let Some(id) = self.listener.take() {
            self.document.remove_event_listener(self.names.event_name, id);
        }
    }
}

fn is_visible(document: &dyn DocumentHost, names: VisibilityApiNames) -> bool {
    document.visibility_property(names.state_property).as_deref() == Some("visible")
}
