//! Los Libros Highlights
//!
//! Text range and annotation engine for the reader. A user selection inside
//! rendered block markup becomes `(block, start, end)` character ranges that
//! survive re-rendering, and stored ranges are overlaid back onto raw block
//! text for display.
//!
//! # Modules
//!
//! - `resolver`: selection endpoints to block character offsets
//! - `highlights`: range merging, the highlight store, segment rendering
//! - `storage`: the key-value persistence interface and bundled stores
//! - `document`: read-only document content
//!
//! # Example
//!
//! ```
//! use libros_highlights::{HighlightStore, MemoryStore, SelectionAnchor};
//!
//! let text = "the quick brown fox";
//! let mut store = HighlightStore::new(MemoryStore::new());
//! store.load("book-1").unwrap();
//!
//! let start = SelectionAnchor::resolved(0, 4);
//! let end = SelectionAnchor::resolved(0, 9);
//! store.add_selection(start, end, &[text.chars().count()]).unwrap();
//!
//! let segments = store.render_segments(0, text);
//! assert_eq!(segments[1].text, "quick");
//! assert!(segments[1].highlighted);
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod highlights;
pub mod resolver;
pub mod storage;

pub use config::HighlightsConfig;
pub use document::{Block, Document};
pub use error::{HighlightError, Result};
pub use highlights::{
    merge_ranges, render_segments, Excerpt, HighlightSet, HighlightStore, LoadStatus, Range,
    Segment,
};
pub use resolver::{
    resolve_anchor, resolve_offset, NodeId, SelectionAnchor, SelectionEndpoint, TextTree,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
