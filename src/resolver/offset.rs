//! Selection endpoint to block offset resolution

use serde::{Deserialize, Serialize};

use super::tree::{NodeId, TextTree};
use crate::document::char_len;

/// A host selection endpoint: a text node and a character offset into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEndpoint {
    pub node: NodeId,
    pub offset: usize,
}

impl SelectionEndpoint {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// One endpoint of a user selection, resolved to a block offset or not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionAnchor {
    pub block_index: usize,
    /// `None` when the endpoint could not be mapped to text
    pub offset: Option<usize>,
}

impl SelectionAnchor {
    pub fn resolved(block_index: usize, offset: usize) -> Self {
        Self {
            block_index,
            offset: Some(offset),
        }
    }

    pub fn unresolved(block_index: usize) -> Self {
        Self {
            block_index,
            offset: None,
        }
    }

    /// Build an anchor from the integer form hosts exchange, where any
    /// negative offset (conventionally `-1`) means unresolved
    pub fn from_raw(block_index: usize, raw_offset: i64) -> Self {
        Self {
            block_index,
            offset: usize::try_from(raw_offset).ok(),
        }
    }

    /// Integer form of the offset, `-1` when unresolved
    pub fn raw_offset(&self) -> i64 {
        self.offset
            .and_then(|o| i64::try_from(o).ok())
            .unwrap_or(-1)
    }

    pub fn is_resolved(&self) -> bool {
        self.offset.is_some()
    }
}

/// Map `(target, offset)` to an offset into the text content of `root`.
///
/// Walks the text leaves under `root` in document order, summing their
/// lengths until `target` is reached. Returns `None` when `target` is not a
/// text leaf under `root`. An offset past the end of the leaf is clamped to
/// its length, so a resolved value never exceeds `tree.text_len(root)`.
pub fn resolve_offset(
    tree: &TextTree,
    root: NodeId,
    target: NodeId,
    offset: usize,
) -> Option<usize> {
    let mut running = 0;

    for leaf in tree.text_leaves(root) {
        let len = tree.text(leaf).map(char_len).unwrap_or(0);
        if leaf == target {
            return Some(running + offset.min(len));
        }
        running += len;
    }

    None
}

/// Resolve a host endpoint inside block `block_index` into an anchor
pub fn resolve_anchor(
    block_index: usize,
    tree: &TextTree,
    root: NodeId,
    endpoint: SelectionEndpoint,
) -> SelectionAnchor {
    match resolve_offset(tree, root, endpoint.node, endpoint.offset) {
        Some(offset) => SelectionAnchor::resolved(block_index, offset),
        None => {
            tracing::debug!(
                "Selection endpoint {:?} not found in block {}",
                endpoint.node,
                block_index
            );
            SelectionAnchor::unresolved(block_index)
        }
    }
}
