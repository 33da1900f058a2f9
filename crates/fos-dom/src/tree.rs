//! DOM Tree (arena-based allocation)

use crate::{DomError, Node, NodeId};

/// Arena-based DOM tree
///
/// Slot 0 always holds the document node. Nodes are never freed; a
/// detached node simply has no parent.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (only the document node)
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::element(tag));
        id
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.node(parent)?;
        self.node(child)?;
        if child == parent || self.ancestors(parent).any(|a| a == child) {
            tracing::debug!(%parent, %child, "Rejected append that would create a cycle");
            return Err(DomError::HierarchyRequest { child });
        }

        self.detach(child);
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Remove `node` from its parent
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.get(node).and_then(Node::parent) else {
            return;
        };
        self.nodes[parent.index()].children.retain(|&c| c != node);
        self.nodes[node.index()].parent = None;
    }

    /// Parent of a node
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent()
    }

    /// Walk up from the parent of `node` to the document
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |&n| self.parent(n))
    }

    /// Whether `node` is reachable from the document node
    pub fn is_connected(&self, node: NodeId) -> bool {
        node == NodeId::ROOT || self.ancestors(node).any(|a| a == NodeId::ROOT)
    }

    /// Read an attribute
    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)?.get_attr(name)
    }

    /// Set an attribute, returning the previous value
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<Option<String>, DomError> {
        Ok(self.node_mut(node)?.set_attr(name, value))
    }

    /// Remove an attribute, returning its value
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.node_mut(node)?.remove_attr(name))
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.get(id).ok_or(DomError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.get_mut(id).ok_or(DomError::UnknownNode(id))
    }
}
