//! Style Cascade & Resolver
//!
//! Computes values for a single element from, in order of precedence:
//! 1. Important inline declarations
//! 2. Normal inline declarations
//! 3. Inheritance (inherited properties only)
//! 4. User agent defaults

use crate::{parse_inline_style, Declaration};
use fos_dom::{DomTree, Node, NodeId};

/// Elements the UA stylesheet lays out as blocks
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "details", "dialog",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html",
    "main", "nav", "ol", "p", "pre", "section", "summary", "ul",
];

/// Elements the UA stylesheet never renders
const NON_RENDERED_ELEMENTS: &[&str] = &[
    "head", "link", "meta", "script", "style", "template", "title",
];

/// Style resolver - computes styles for DOM elements
#[derive(Debug, Default)]
pub struct StyleResolver;

impl StyleResolver {
    pub fn new() -> Self {
        Self
    }

    /// Computed value of `property` on `node`
    ///
    /// Returns None when the node has no style context (unknown, the
    /// document itself, or detached), or when an unsupported property
    /// is not declared inline.
    pub fn computed_value(&self, tree: &DomTree, node: NodeId, property: &str) -> Option<String> {
        let element = tree.get(node)?;
        if element.is_document() || !tree.is_connected(node) {
            return None;
        }

        let property = property.trim().to_ascii_lowercase();
        match property.as_str() {
            "display" | "visibility" | "opacity" => Some(self.resolve(tree, node, &property)),
            other => self.specified(element, other).map(|d| d.value),
        }
    }

    fn resolve(&self, tree: &DomTree, node: NodeId, property: &str) -> String {
        let Some(element) = tree.get(node) else {
            return initial_value(property).to_string();
        };
        let inherited = is_inherited(property);

        match self.specified(element, property).map(|d| d.value).as_deref() {
            Some("inherit") => self.parent_value(tree, node, property),
            Some("unset") if inherited => self.parent_value(tree, node, property),
            Some("initial") | Some("unset") => initial_value(property).to_string(),
            Some(value) => value.to_string(),
            None if inherited => self.parent_value(tree, node, property),
            None => ua_value(element, property).to_string(),
        }
    }

    fn parent_value(&self, tree: &DomTree, node: NodeId, property: &str) -> String {
        match tree.parent(node) {
            Some(parent) if parent != tree.root() => self.resolve(tree, parent, property),
            _ => initial_value(property).to_string(),
        }
    }

    /// Winning inline declaration for `property`
    fn specified(&self, element: &Node, property: &str) -> Option<Declaration> {
        let style = element.get_attr("style")?;
        let declarations = match parse_inline_style(style) {
            Ok(declarations) => declarations,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unparsable style attribute");
                return None;
            }
        };

        let mut candidates: Vec<Declaration> = declarations
            .into_iter()
            .filter(|d| d.property == property)
            .collect();
        // Important beats normal, later beats earlier
        candidates.sort_by_key(|d| d.important);
        candidates.pop()
    }
}

fn is_inherited(property: &str) -> bool {
    property == "visibility"
}

fn initial_value(property: &str) -> &'static str {
    match property {
        "display" => "inline",
        "visibility" => "visible",
        "opacity" => "1",
        _ => "",
    }
}

fn ua_value(element: &Node, property: &str) -> &'static str {
    if property != "display" {
        return initial_value(property);
    }
    // [hidden] { display: none }
    if element.has_attr("hidden") || NON_RENDERED_ELEMENTS.contains(&element.tag()) {
        "none"
    } else if BLOCK_ELEMENTS.contains(&element.tag()) {
        "block"
    } else {
        "inline"
    }
}
