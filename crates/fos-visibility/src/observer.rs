//! Visibility observer
//!
//! Owns the signal sources of one element and starts/stops them
//! together. All state lives in the [`AggregationEngine`] behind a
//! [`SignalSink`].

use std::fmt;
use std::rc::Rc;

use fos_dom::NodeId;

use crate::compat::resolve_visibility_api_names;
use crate::config::VisibilityObserverOptions;
use crate::engine::{AggregationEngine, SignalSink};
use crate::error::ObserverError;
use crate::host::Environment;
use crate::signals::{
    FocusSignal, IntersectionSignal, MutationSignal, StyleVisibilityChecker, TabVisibilitySignal,
};
use crate::state::SignalState;

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Observing,
}

/// Observes whether one element is visible to the user
///
/// Dropping the observer stops observation.
pub struct VisibilityObserver {
    target: NodeId,
    sink: SignalSink,
    style: Rc<StyleVisibilityChecker>,
    focus: FocusSignal,
    tab: TabVisibilitySignal,
    intersection: IntersectionSignal,
    mutation: MutationSignal,
    lifecycle: Lifecycle,
}

impl VisibilityObserver {
    /// Build an observer for `options.element`. Starts observing right
    /// away unless `settings.observe` is false.
    pub fn new(options: VisibilityObserverOptions, env: &Environment) -> Result<Self, ObserverError> {
        let target = options.element.clone().ok_or(ObserverError::MissingTarget)?.single()?;
        options.settings.validate()?;
        let names = resolve_visibility_api_names(env.document.visibility_capabilities())?;

        let sink = SignalSink::new(
            AggregationEngine::new(target, options.settings.log),
            options.callback.clone(),
        );
        let style = Rc::new(StyleVisibilityChecker::new(target, Rc::clone(&env.style)));
        let intersection = IntersectionSignal::new(
            target,
            &*env.intersection,
            options.intersection_init(),
            &sink,
        )?;
        let mutation = MutationSignal::new(target, &*env.mutation, Rc::clone(&style), &sink);

        let mut observer = Self {
            target,
            sink,
            style,
            focus: FocusSignal::new(Rc::clone(&env.document)),
            tab: TabVisibilitySignal::new(Rc::clone(&env.document), names),
            intersection,
            mutation,
            lifecycle: Lifecycle::Idle,
        };

        if options.settings.observe {
            observer.start_observe();
        }
        Ok(observer)
    }

    /// Start all signal sources. Returns false if already observing.
    pub fn start_observe(&mut self) -> bool {
        if self.lifecycle == Lifecycle::Observing {
            return false;
        }

        self.sink.open();
        self.style.refresh(&self.sink);
        self.focus.subscribe(&self.sink);
        self.tab.subscribe(&self.sink);
        self.intersection.start(&self.sink);
        self.mutation.start();

        self.lifecycle = Lifecycle::Observing;
        tracing::debug!(element = %self.target, "Started visibility observation");
        true
    }

    /// Stop all signal sources, including mutation observation.
    /// Returns false if already idle.
    pub fn stop_observe(&mut self) -> bool {
        if self.lifecycle == Lifecycle::Idle {
            return false;
        }

        self.focus.unsubscribe();
        self.tab.unsubscribe();
        self.intersection.stop();
        self.mutation.stop();
        self.sink.close();

        self.lifecycle = Lifecycle::Idle;
        tracing::debug!(element = %self.target, "Stopped visibility observation");
        true
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_observing(&self) -> bool {
        self.lifecycle == Lifecycle::Observing
    }

    /// Last emitted verdict; None before the first evaluation
    pub fn verdict(&self) -> Option<bool> {
        self.sink.verdict()
    }

    pub fn signal_state(&self) -> SignalState {
        self.sink.state()
    }
}

impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        self.stop_observe();
    }
}

impl fmt::Debug for VisibilityObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityObserver")
            .field("target", &self.target)
            .field("lifecycle", &self.lifecycle)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}
