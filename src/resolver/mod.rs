//! Offset resolution
//!
//! Maps a selection endpoint inside a block's markup (a text node plus an
//! offset into it) to a character offset within the block's flattened text.
//!
//! Nested inline markup is flattened by walking text leaves only, so the
//! resolved offset is valid against the block text as long as that text is
//! the same concatenation [`TextTree::text_content`] produces.

mod offset;
mod tree;

pub use offset::{resolve_anchor, resolve_offset, SelectionAnchor, SelectionEndpoint};
pub use tree::{NodeId, NodeKind, TextLeaves, TextTree};
