//! Signal sources
//!
//! Each source owns the signals it writes and is wired to the engine
//! through a [`crate::SignalSink`].

mod focus;
mod intersection;
mod mutation;
mod page_visibility;
mod style;

pub(crate) use focus::FocusSignal;
pub(crate) use intersection::IntersectionSignal;
pub(crate) use mutation::MutationSignal;
pub(crate) use page_visibility::TabVisibilitySignal;
pub use style::{CssVisibility, StyleVisibilityChecker};
