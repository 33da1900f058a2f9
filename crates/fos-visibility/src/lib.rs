//! fOS Visibility - Element Visibility Observation
//!
//! Decides whether one element is actually visible to the user by
//! combining six independent signals:
//! - computed `visibility`, `display` and `opacity`
//! - intersection with the viewport (or a configured root)
//! - window focus
//! - page (tab) visibility
//!
//! The element counts as visible only when every signal agrees. The
//! consumer callback runs on transitions of that verdict only.
//!
//! The host environment is reached through the traits in [`host`]; a
//! [`VisibilityObserver`] never talks to a concrete browser directly.

pub mod host;
mod compat;
mod config;
mod engine;
mod error;
mod observer;
mod registry;
mod signals;
mod state;

#[cfg(test)]
mod testing;

pub use compat::{resolve_visibility_api_names, UnsupportedEnvironment, VisibilityApiNames, VisibilityCapabilities};
pub use config::{ObserverSettings, TargetRef, VisibilityObserverOptions};
pub use engine::{AggregationEngine, SignalSink, VisibilityCallback};
pub use error::ObserverError;
pub use host::Environment;
pub use observer::{Lifecycle, VisibilityObserver};
pub use registry::ObserverRegistry;
pub use signals::{CssVisibility, StyleVisibilityChecker};
pub use state::{Signal, SignalState};
