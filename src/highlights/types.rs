//! Highlight types
//!
//! The persisted layout of a [`HighlightSet`] is a JSON object keyed by the
//! string form of the block index:
//!
//! ```json
//! { "0": [{"start": 4, "end": 9}], "3": [{"start": 0, "end": 12}] }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::merge::merge_ranges;
use crate::error::{HighlightError, Result};

/// Half-open character interval `[start, end)` within one block's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    /// Checked constructor; `start` must be strictly less than `end`
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start >= end {
            return Err(HighlightError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if this range covers the given offset
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Intersect with `[0, len)`; `None` if nothing is left
    pub fn clamp_to(&self, len: usize) -> Option<Range> {
        let start = self.start.min(len);
        let end = self.end.min(len);
        (start < end).then_some(Range { start, end })
    }
}

/// Per-document mapping of block index to merged, sorted ranges.
///
/// Every stored list is non-empty, sorted by `start`, and pairwise
/// separated (`a.end < b.start`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighlightSet {
    blocks: BTreeMap<usize, Vec<Range>>,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from arbitrary `(block, range)` pairs, merging per block
    pub fn from_ranges(ranges: impl IntoIterator<Item = (usize, Range)>) -> Self {
        let mut grouped: BTreeMap<usize, Vec<Range>> = BTreeMap::new();
        for (block, range) in ranges {
            grouped.entry(block).or_default().push(range);
        }

        let mut set = HighlightSet::new();
        for (block, ranges) in grouped {
            set.extend_block(block, ranges);
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Merged ranges for a block (empty if none)
    pub fn ranges(&self, block_index: usize) -> &[Range] {
        self.blocks
            .get(&block_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Blocks carrying at least one range, ascending
    pub fn blocks(&self) -> impl Iterator<Item = usize> + '_ {
        self.blocks.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Range])> + '_ {
        self.blocks
            .iter()
            .map(|(block, ranges)| (*block, ranges.as_slice()))
    }

    /// Total number of stored ranges across all blocks
    pub fn range_count(&self) -> usize {
        self.blocks.values().map(Vec::len).sum()
    }

    /// Check if `offset` in `block_index` is highlighted
    pub fn contains(&self, block_index: usize, offset: usize) -> bool {
        let ranges = self.ranges(block_index);
        // Ranges are sorted and disjoint: the candidate is the last one
        // starting at or before `offset`.
        let idx = ranges.partition_point(|r| r.start <= offset);
        idx > 0 && ranges[idx - 1].contains(offset)
    }

    /// Add one range to a block and re-merge it
    pub fn insert(&mut self, block_index: usize, range: Range) {
        self.extend_block(block_index, [range]);
    }

    /// Append ranges to a block's list and re-merge it once
    pub fn extend_block(&mut self, block_index: usize, ranges: impl IntoIterator<Item = Range>) {
        let mut list = self.blocks.remove(&block_index).unwrap_or_default();
        list.extend(ranges);

        let merged = merge_ranges(&list);
        if !merged.is_empty() {
            self.blocks.insert(block_index, merged);
        }
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// Re-establish the set invariants on data of unknown quality.
    ///
    /// Returns the number of ranges dropped for having `start >= end`.
    pub(crate) fn normalize(&mut self) -> usize {
        let mut dropped = 0;
        let blocks = std::mem::take(&mut self.blocks);

        for (block, ranges) in blocks {
            let before = ranges.len();
            let valid: Vec<Range> = ranges.into_iter().filter(|r| !r.is_empty()).collect();
            dropped += before - valid.len();
            self.extend_block(block, valid);
        }

        dropped
    }

    /// Serialize to the persisted JSON layout
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the persisted JSON layout. The result is not normalized.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A run of block text with its highlight state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

impl<'a> Segment<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self {
            text,
            highlighted: false,
        }
    }

    pub fn highlighted(text: &'a str) -> Self {
        Self {
            text,
            highlighted: true,
        }
    }
}

/// The text covered by one stored range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Excerpt {
    pub block_index: usize,
    pub range: Range,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(start: usize, end: usize) -> Range {
        Range::new(start, end).unwrap()
    }

    #[test]
    fn test_range_rejects_empty_and_reversed() {
        assert!(matches!(
            Range::new(5, 5),
            Err(HighlightError::InvalidRange { start: 5, end: 5 })
        ));
        assert!(Range::new(9, 4).is_err());
        assert!(Range::new(4, 9).is_ok());
    }

    #[test]
    fn test_range_clamp() {
        assert_eq!(r(4, 20).clamp_to(10), Some(r(4, 10)));
        assert_eq!(r(12, 20).clamp_to(10), None);
        assert_eq!(r(0, 3).clamp_to(10), Some(r(0, 3)));
    }

    #[test]
    fn test_insert_merges() {
        let mut set = HighlightSet::new();
        set.insert(0, r(4, 9));
        set.insert(0, r(9, 15));
        set.insert(2, r(0, 3));

        assert_eq!(set.ranges(0), &[r(4, 15)]);
        assert_eq!(set.ranges(2), &[r(0, 3)]);
        assert!(set.ranges(1).is_empty());
        assert_eq!(set.blocks().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(set.range_count(), 2);
    }

    #[test]
    fn test_contains() {
        let set = HighlightSet::from_ranges([(1, r(4, 9)), (1, r(12, 15))]);

        assert!(set.contains(1, 4));
        assert!(set.contains(1, 8));
        assert!(!set.contains(1, 9));
        assert!(!set.contains(1, 10));
        assert!(set.contains(1, 12));
        assert!(!set.contains(1, 0));
        assert!(!set.contains(0, 5));
    }

    #[test]
    fn test_json_layout() {
        let set = HighlightSet::from_ranges([(0, r(4, 9)), (0, r(10, 15)), (3, r(0, 12))]);
        let json = set.to_json().unwrap();

        assert_eq!(
            json,
            r#"{"0":[{"start":4,"end":9},{"start":10,"end":15}],"3":[{"start":0,"end":12}]}"#
        );
        assert_eq!(HighlightSet::from_json(&json).unwrap(), set);
    }

    #[test]
    fn test_json_accepts_empty_arrays() {
        let mut set = HighlightSet::from_json(r#"{"0":[],"2":[{"start":1,"end":3}]}"#).unwrap();
        assert_eq!(set.normalize(), 0);

        assert_eq!(set.blocks().collect::<Vec<_>>(), vec![2]);
        assert_eq!(set.ranges(2), &[r(1, 3)]);
    }

    #[test]
    fn test_normalize_drops_invalid_ranges() {
        let mut set = HighlightSet::from_json(
            r#"{"1":[{"start":7,"end":3},{"start":0,"end":4},{"start":2,"end":6}]}"#,
        )
        .unwrap();

        assert_eq!(set.normalize(), 1);
        assert_eq!(set.ranges(1), &[r(0, 6)]);
    }

    #[test]
    fn test_empty_set_json() {
        let set = HighlightSet::new();
        assert_eq!(set.to_json().unwrap(), "{}");
        assert!(HighlightSet::from_json("{}").unwrap().is_empty());
    }
}
