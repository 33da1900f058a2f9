//! Viewport intersection signal

use std::rc::Rc;

use fos_dom::{DomError, IntersectionObserverEntry, IntersectionObserverInit, NodeId};

use crate::engine::SignalSink;
use crate::host::{IntersectionCallback, IntersectionHandle, IntersectionService};
use crate::state::Signal;

/// Tracks whether the target intersects the configured root
pub(crate) struct IntersectionSignal {
    target: NodeId,
    handle: Box<dyn IntersectionHandle>,
    observing: bool,
}

impl IntersectionSignal {
    pub(crate) fn new(
        target: NodeId,
        service: &dyn IntersectionService,
        init: IntersectionObserverInit,
        sink: &SignalSink,
    ) -> Result<Self, DomError> {
        let callback: IntersectionCallback = {
            let sink = sink.clone();
            Rc::new(move |entries: &[IntersectionObserverEntry]| {
                // Only the newest entry for the target matters
                match entries.iter().rev().find(|e| e.target == target) {
                    Some(latest) => sink.record(Signal::ViewportIntersecting, latest.is_intersecting),
                    None => tracing::trace!(element = %target, "Intersection batch without target entry"),
                }
                sink.evaluate();
            })
        };

        let handle = service.create_intersection_observer(init, callback)?;
        Ok(Self { target, handle, observing: false })
    }

    /// Reset to not intersecting and observe; the host reports the
    /// real value on its next intersection pass.
    pub(crate) fn start(&mut self, sink: &SignalSink) {
        if self.observing {
            return;
        }
        sink.record(Signal::ViewportIntersecting, false);
        self.handle.observe(self.target);
        self.observing = true;
    }

    pub(crate) fn stop(&mut self) {
        if !self.observing {
            return;
        }
        self.handle.unobserve(self.target);
        self.observing = false;
    }
}

impl Drop for IntersectionSignal {
    fn drop(&mut self) {
        self.handle.disconnect();
    }
}
