//! Observer configuration

use std::fmt;
use std::rc::Rc;

use fos_dom::{IntersectionObserverInit, NodeId};
use serde::{Deserialize, Serialize};

use crate::engine::VisibilityCallback;
use crate::error::ObserverError;

/// What the caller asked to observe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    Element(NodeId),
    /// Result of a multi-element query; never accepted
    Collection(Vec<NodeId>),
}

impl TargetRef {
    /// The single element, or a configuration error for collections
    pub fn single(self) -> Result<NodeId, ObserverError> {
        match self {
            TargetRef::Element(node) => Ok(node),
            TargetRef::Collection(nodes) => Err(ObserverError::CollectionTarget(nodes.len())),
        }
    }
}

impl From<NodeId> for TargetRef {
    fn from(node: NodeId) -> Self {
        TargetRef::Element(node)
    }
}

impl From<Vec<NodeId>> for TargetRef {
    fn from(nodes: Vec<NodeId>) -> Self {
        TargetRef::Collection(nodes)
    }
}

impl From<&[NodeId]> for TargetRef {
    fn from(nodes: &[NodeId]) -> Self {
        TargetRef::Collection(nodes.to_vec())
    }
}

/// Serializable observer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObserverSettings {
    /// Start observing on construction
    pub observe: bool,
    /// Log every transition with the full signal state
    pub log: bool,
    pub intersection_root_margin: String,
    /// 0 means any overlap counts
    pub intersection_threshold: f64,
}

impl Default for ObserverSettings {
    fn default() -> Self {
        Self {
            observe: true,
            log: false,
            intersection_root_margin: "0px".to_string(),
            intersection_threshold: 0.0,
        }
    }
}

impl ObserverSettings {
    /// Load settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ObserverError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ObserverError> {
        if !(0.0..=1.0).contains(&self.intersection_threshold) {
            return Err(ObserverError::InvalidThreshold(self.intersection_threshold));
        }
        Ok(())
    }
}

/// Everything needed to construct a [`crate::VisibilityObserver`]
#[derive(Clone, Default)]
pub struct VisibilityObserverOptions {
    pub element: Option<TargetRef>,
    pub settings: ObserverSettings,
    /// None observes against the viewport
    pub intersection_root: Option<NodeId>,
    pub callback: Option<VisibilityCallback>,
}

impl VisibilityObserverOptions {
    pub fn new(element: impl Into<TargetRef>) -> Self {
        Self {
            element: Some(element.into()),
            ..Self::default()
        }
    }

    pub fn with_settings(mut self, settings: ObserverSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn observe(mut self, observe: bool) -> Self {
        self.settings.observe = observe;
        self
    }

    pub fn log(mut self, log: bool) -> Self {
        self.settings.log = log;
        self
    }

    pub fn root(mut self, root: NodeId) -> Self {
        self.intersection_root = Some(root);
        self
    }

    pub fn root_margin(mut self, margin: impl Into<String>) -> Self {
        self.settings.intersection_root_margin = margin.into();
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.settings.intersection_threshold = threshold;
        self
    }

    pub fn callback(mut self, callback: impl Fn(bool) + 'static) -> Self {
        self.callback = Some(Rc::new(callback));
        self
    }

    pub(crate) fn intersection_init(&self) -> IntersectionObserverInit {
        IntersectionObserverInit {
            root: self.intersection_root,
            root_margin: self.settings.intersection_root_margin.clone(),
            threshold: vec![self.settings.intersection_threshold],
        }
    }
}

impl fmt::Debug for VisibilityObserverOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityObserverOptions")
            .field("element", &self.element)
            .field("settings", &self.settings)
            .field("intersection_root", &self.intersection_root)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
