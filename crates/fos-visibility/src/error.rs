//! Observer errors

use crate::compat::UnsupportedEnvironment;
use fos_dom::DomError;

/// Errors raised while constructing a [`crate::VisibilityObserver`]
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    #[error("No target element supplied")]
    MissingTarget,
    #[error("Target resolves to a collection of {0} elements, expected a single element")]
    CollectionTarget(usize),
    #[error("Intersection threshold {0} is outside the range [0, 1]")]
    InvalidThreshold(f64),
    #[error(transparent)]
    Unsupported(#[from] UnsupportedEnvironment),
    #[error("Host rejected observer configuration: {0}")]
    Host(#[from] DomError),
    #[error("Invalid observer settings: {0}")]
    Settings(#[from] serde_json::Error),
}
