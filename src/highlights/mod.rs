//! Highlight module
//!
//! Turns user selections into stored character ranges and stored ranges
//! back into renderable segments.
//!
//! # Pieces
//!
//! - `merge`: canonical form of one block's ranges
//! - `selection`: two selection anchors to per-block ranges
//! - `render`: ranges over text to plain/highlighted segments
//! - `store`: the per-document owner of the highlight set, with
//!   write-through persistence

mod merge;
mod render;
mod selection;
mod store;
mod types;

pub use merge::{is_merged, merge_ranges};
pub use render::render_segments;
pub use selection::selection_to_ranges;
pub use store::{HighlightStore, LoadStatus};
pub use types::{Excerpt, HighlightSet, Range, Segment};
