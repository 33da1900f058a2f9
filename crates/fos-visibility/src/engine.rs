//! Aggregation engine
//!
//! Combines the signal state into one verdict and reports transitions.
//! Signal sources write through a [`SignalSink`], which also dispatches
//! the consumer callback once the engine is no longer borrowed.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use fos_dom::NodeId;

use crate::state::{Signal, SignalState};

/// Consumer callback, receives the new verdict on each transition
pub type VisibilityCallback = Rc<dyn Fn(bool)>;

/// Signal state plus the last emitted verdict
#[derive(Debug)]
pub struct AggregationEngine {
    target: NodeId,
    state: SignalState,
    /// None until the first evaluation, so the first verdict is always emitted
    verdict: Option<bool>,
    log: bool,
}

impl AggregationEngine {
    pub fn new(target: NodeId, log: bool) -> Self {
        Self {
            target,
            state: SignalState::default(),
            verdict: None,
            log,
        }
    }

    /// Write one signal. Never evaluates.
    pub fn record_update(&mut self, signal: Signal, value: bool) {
        self.state.set(signal, value);
    }

    /// Recompute the verdict. Returns it only when it differs from the
    /// previously emitted one.
    pub fn evaluate(&mut self) -> Option<bool> {
        let verdict = self.state.all_visible();
        if self.verdict == Some(verdict) {
            return None;
        }

        self.verdict = Some(verdict);
        if self.log {
            tracing::info!(
                element = %self.target,
                verdict,
                blocking = ?self.state.blocking().collect::<Vec<_>>(),
                state = ?self.state,
                "Visibility changed"
            );
        }
        Some(verdict)
    }

    pub fn state(&self) -> &SignalState {
        &self.state
    }

    /// Last emitted verdict
    pub fn verdict(&self) -> Option<bool> {
        self.verdict
    }
}

/// Shared write handle into an [`AggregationEngine`]
///
/// Cloned into every signal source. A closed sink drops writes and
/// evaluations, which freezes the state while observation is stopped.
#[derive(Clone)]
pub struct SignalSink {
    engine: Rc<RefCell<AggregationEngine>>,
    callback: Option<VisibilityCallback>,
    open: Rc<Cell<bool>>,
}

impl SignalSink {
    pub fn new(engine: AggregationEngine, callback: Option<VisibilityCallback>) -> Self {
        Self {
            engine: Rc::new(RefCell::new(engine)),
            callback,
            open: Rc::new(Cell::new(false)),
        }
    }

    pub fn record(&self, signal: Signal, value: bool) {
        if !self.is_open() {
            tracing::trace!(%signal, value, "Sink closed, dropping update");
            return;
        }
        self.engine.borrow_mut().record_update(signal, value);
    }

    /// Evaluate and, on a transition, invoke the callback
    pub fn evaluate(&self) -> Option<bool> {
        if !self.is_open() {
            return None;
        }

        let transition = self.engine.borrow_mut().evaluate();
        if let (Some(verdict), Some(callback)) = (transition, &self.callback) {
            callback(verdict);
        }
        transition
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub(crate) fn open(&self) {
        self.open.set(true);
    }

    pub(crate) fn close(&self) {
        self.open.set(false);
    }

    pub fn state(&self) -> SignalState {
        *self.engine.borrow().state()
    }

    pub fn verdict(&self) -> Option<bool> {
        self.engine.borrow().verdict()
    }
}

impl fmt::Debug for SignalSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalSink")
            .field("engine", &self.engine)
            .field("has_callback", &self.callback.is_some())
            .field("open", &self.open.get())
            .finish()
    }
}
