//! Immutable text trees for block content
//!
//! A block's rendered markup is captured once as an arena of element and
//! text nodes. Offsets are computed against this snapshot rather than
//! against live UI state.

use serde::{Deserialize, Serialize};

use crate::document::char_len;
use crate::error::Result;

/// Handle to a node inside a [`TextTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element { tag: String },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// Arena tree of element and text nodes
#[derive(Debug, Clone)]
pub struct TextTree {
    nodes: Vec<Node>,
}

/// Tag of the synthetic element wrapping parsed fragments
const FRAGMENT_ROOT: &str = "block";

impl TextTree {
    /// Create a tree holding a single root element
    pub fn new(root_tag: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Element {
                    tag: root_tag.into(),
                },
                children: Vec::new(),
                parent: None,
            }],
        }
    }

    /// Parse an XHTML fragment (e.g. `Hello <em>brave</em> world`) into a
    /// tree whose root wraps the fragment's top-level nodes.
    ///
    /// Comments and processing instructions carry no text and are skipped.
    pub fn parse_xhtml(fragment: &str) -> Result<Self> {
        let wrapped = format!("<{0}>{1}</{0}>", FRAGMENT_ROOT, fragment);
        let doc = roxmltree::Document::parse(&wrapped)?;

        let mut tree = TextTree::new(FRAGMENT_ROOT);
        let root = tree.root();
        tree.copy_children(&doc.root_element(), root);

        Ok(tree)
    }

    fn copy_children(&mut self, source: &roxmltree::Node, parent: NodeId) {
        for child in source.children() {
            if child.is_element() {
                let id = self.append_element(parent, child.tag_name().name());
                self.copy_children(&child, id);
            } else if child.is_text() {
                if let Some(text) = child.text() {
                    self.append_text(parent, text);
                }
            }
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append an element under `parent` and return its id
    pub fn append_element(&mut self, parent: NodeId, tag: impl Into<String>) -> NodeId {
        self.push(parent, NodeKind::Element { tag: tag.into() })
    }

    /// Append a text leaf under `parent` and return its id
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.push(parent, NodeKind::Text(text.into()))
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            children: Vec::new(),
            parent: Some(parent),
        });
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(id);
        }
        id
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.0).map(|n| &n.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Text of a text leaf, `None` for elements
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    /// Text leaves under `root` in document order
    pub fn text_leaves(&self, root: NodeId) -> TextLeaves<'_> {
        let stack = if root.0 < self.nodes.len() {
            vec![root]
        } else {
            Vec::new()
        };
        TextLeaves { tree: self, stack }
    }

    /// Concatenated text under `root`; the block text offsets refer to
    pub fn text_content(&self, root: NodeId) -> String {
        self.text_leaves(root)
            .filter_map(|id| self.text(id))
            .collect()
    }

    /// Character length of [`TextTree::text_content`]
    pub fn text_len(&self, root: NodeId) -> usize {
        self.text_leaves(root)
            .filter_map(|id| self.text(id))
            .map(char_len)
            .sum()
    }

    /// First text leaf whose text contains `needle`, in document order
    pub fn find_text(&self, root: NodeId, needle: &str) -> Option<NodeId> {
        self.text_leaves(root)
            .find(|&id| self.text(id).is_some_and(|t| t.contains(needle)))
    }
}

/// Depth-first iterator over text leaves
pub struct TextLeaves<'a> {
    tree: &'a TextTree,
    stack: Vec<NodeId>,
}

impl Iterator for TextLeaves<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(id) = self.stack.pop() {
            match self.tree.kind(id)? {
                NodeKind::Text(_) => return Some(id),
                NodeKind::Element { .. } => {
                    self.stack
                        .extend(self.tree.children(id).iter().rev().copied());
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_in_document_order() {
        let mut tree = TextTree::new("p");
        let root = tree.root();
        tree.append_text(root, "the ");
        let em = tree.append_element(root, "em");
        tree.append_text(em, "quick");
        tree.append_text(root, " brown fox");

        assert_eq!(tree.text_content(root), "the quick brown fox");
        assert_eq!(tree.text_len(root), 19);
        assert_eq!(tree.text_leaves(root).count(), 3);
    }

    #[test]
    fn test_parse_xhtml_fragment() {
        let tree = TextTree::parse_xhtml("In the <b>beginning <i>God</i></b> created").unwrap();
        let root = tree.root();

        assert_eq!(tree.text_content(root), "In the beginning God created");

        let god = tree.find_text(root, "God").unwrap();
        let italic = tree.parent(god).unwrap();
        assert_eq!(
            tree.kind(italic),
            Some(&NodeKind::Element {
                tag: "i".to_string()
            })
        );
    }

    #[test]
    fn test_parse_xhtml_resolves_entities() {
        let tree = TextTree::parse_xhtml("salt &amp; light").unwrap();
        assert_eq!(tree.text_content(tree.root()), "salt & light");
    }

    #[test]
    fn test_parse_xhtml_rejects_unbalanced_markup() {
        let err = TextTree::parse_xhtml("<em>unclosed").unwrap_err();
        assert!(matches!(err, crate::error::HighlightError::Markup(_)));
    }

    #[test]
    fn test_element_has_no_text() {
        let mut tree = TextTree::new("p");
        let span = tree.append_element(tree.root(), "span");
        assert!(tree.text(span).is_none());
        assert_eq!(tree.text_content(span), "");
    }
}
