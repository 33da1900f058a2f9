//! fOS DOM - Document Object Model
//!
//! Arena-backed element tree plus the observer primitives a host
//! builds its mutation and intersection services from.

mod node;
mod tree;
mod geometry;
mod observer;

use std::fmt;

pub use node::Node;
pub use tree::DomTree;
pub use geometry::{DOMRect, MarginValue, RootMargin};
pub use observer::{
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MutationObserver, MutationObserverInit, MutationRecord, MutationType,
};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Build an ID from its raw arena index
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// DOM error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomError {
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),
    #[error("Cannot append {child} to itself or one of its descendants")]
    HierarchyRequest { child: NodeId },
    #[error("Invalid root margin '{0}': expected 1-4 lengths in px or %")]
    InvalidRootMargin(String),
    #[error("Threshold {0} is outside the range [0, 1]")]
    InvalidThreshold(f64),
}
