//! DOM Node
//!
//! Element and document nodes with an inline attribute list.

use crate::NodeId;

/// Tag used for the document node
pub(crate) const DOCUMENT_TAG: &str = "#document";

/// DOM Node
#[derive(Debug, Clone)]
pub struct Node {
    /// Lowercase tag name
    tag: String,
    /// Parent node (None for the document and detached nodes)
    pub(crate) parent: Option<NodeId>,
    /// Children in document order
    pub(crate) children: Vec<NodeId>,
    /// Attributes in insertion order, names lowercased
    attrs: Vec<(String, String)>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            parent: None,
            children: Vec::new(),
            attrs: Vec::new(),
        }
    }

    /// Create the document node
    pub fn document() -> Self {
        Self::element(DOCUMENT_TAG)
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    pub fn is_document(&self) -> bool {
        self.tag == DOCUMENT_TAG
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Check for a (possibly valueless) attribute
    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    /// Set an attribute, returning the previous value
    pub fn set_attr(&mut self, name: &str, value: &str) -> Option<String> {
        if let Some((_, v)) = self.attrs.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            return Some(std::mem::replace(v, value.to_string()));
        }
        self.attrs.push((name.to_ascii_lowercase(), value.to_string()));
        None
    }

    /// Remove an attribute, returning its value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.attrs.remove(pos).1)
    }

    /// Iterate attributes as (name, value)
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}
