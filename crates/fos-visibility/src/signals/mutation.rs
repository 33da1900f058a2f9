//! Attribute mutation signal

use std::rc::Rc;

use fos_dom::{MutationObserverInit, MutationRecord, MutationType, NodeId};

use super::StyleVisibilityChecker;
use crate::engine::SignalSink;
use crate::host::{MutationCallback, MutationHandle, MutationService};

/// Re-reads the CSS signals whenever the target's attributes change
pub(crate) struct MutationSignal {
    target: NodeId,
    handle: Box<dyn MutationHandle>,
    observing: bool,
}

impl MutationSignal {
    pub(crate) fn new(
        target: NodeId,
        service: &dyn MutationService,
        checker: Rc<StyleVisibilityChecker>,
        sink: &SignalSink,
    ) -> Self {
        let callback: MutationCallback = {
            let sink = sink.clone();
            Rc::new(move |records: &[MutationRecord]| {
                // Any attribute may affect any of the three CSS signals;
                // refresh them together, once per batch
                if records.iter().any(|r| r.mutation_type == MutationType::Attributes) {
                    checker.refresh(&sink);
                }
                sink.evaluate();
            })
        };

        Self {
            target,
            handle: service.create_mutation_observer(callback),
            observing: false,
        }
    }

    pub(crate) fn start(&mut self) {
        if self.observing {
            return;
        }
        self.handle.observe(self.target, MutationObserverInit::attributes_only());
        self.observing = true;
    }

    pub(crate) fn stop(&mut self) {
        if !self.observing {
            return;
        }
        self.handle.disconnect();
        self.observing = false;
    }
}

impl Drop for MutationSignal {
    fn drop(&mut self) {
        self.handle.disconnect();
    }
}
