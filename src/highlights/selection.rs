//! Selection to range translation

use super::types::Range;
use crate::resolver::SelectionAnchor;

/// Translate a two-anchor selection into per-block ranges.
///
/// `lengths[i]` is the character length of block `i`. Blocks strictly
/// between the anchors are covered entirely. An unresolved anchor falls
/// back to the block boundary (start of its block for the start anchor, end
/// of its block for the end anchor), except that a selection whose two
/// anchors are both unresolved inside the same block adds nothing.
///
/// The result is ordered by block and holds at most one range per block.
pub fn selection_to_ranges(
    start: SelectionAnchor,
    end: SelectionAnchor,
    lengths: &[usize],
) -> Vec<(usize, Range)> {
    // A selection dragged backwards across blocks
    let (start, end) = if start.block_index > end.block_index {
        (end, start)
    } else {
        (start, end)
    };

    let lo = start.block_index;
    let hi = end.block_index;

    if lo == hi && !start.is_resolved() && !end.is_resolved() {
        tracing::debug!("Neither selection endpoint resolved in block {}", lo);
        return Vec::new();
    }

    let Some(last) = lengths.len().checked_sub(1).filter(|&last| lo <= last) else {
        tracing::warn!(
            "Selection starts at block {} but only {} block lengths are known",
            lo,
            lengths.len()
        );
        return Vec::new();
    };
    if hi > last {
        tracing::warn!("No text length for blocks {}..={}, skipping", last + 1, hi);
    }

    let mut ranges = Vec::new();

    for (block, &len) in lengths.iter().enumerate().take(last.min(hi) + 1).skip(lo) {
        let mut from = match start.offset {
            Some(offset) if block == lo => offset,
            _ => 0,
        };
        let mut to = match end.offset {
            Some(offset) if block == hi => offset,
            _ => len,
        };

        if lo == hi && from > to {
            std::mem::swap(&mut from, &mut to);
        }

        let from = from.min(len);
        let to = to.min(len);

        if from < to {
            ranges.push((block, Range { start: from, end: to }));
        }
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(start: usize, end: usize) -> Range {
        Range { start, end }
    }

    fn at(block: usize, offset: usize) -> SelectionAnchor {
        SelectionAnchor::resolved(block, offset)
    }

    #[test]
    fn test_single_block() {
        assert_eq!(selection_to_ranges(at(0, 4), at(0, 9), &[19]), vec![(0, r(4, 9))]);
    }

    #[test]
    fn test_reversed_single_block() {
        assert_eq!(selection_to_ranges(at(0, 15), at(0, 4), &[19]), vec![(0, r(4, 15))]);
    }

    #[test]
    fn test_collapsed_selection_adds_nothing() {
        assert!(selection_to_ranges(at(0, 7), at(0, 7), &[19]).is_empty());
    }

    #[test]
    fn test_spanning_blocks() {
        let lengths = [10, 10, 20, 30, 40];
        assert_eq!(
            selection_to_ranges(at(2, 5), at(4, 12), &lengths),
            vec![(2, r(5, 20)), (3, r(0, 30)), (4, r(0, 12))]
        );
    }

    #[test]
    fn test_spanning_blocks_backwards() {
        let lengths = [10, 10, 20, 30, 40];
        assert_eq!(
            selection_to_ranges(at(4, 12), at(2, 5), &lengths),
            vec![(2, r(5, 20)), (3, r(0, 30)), (4, r(0, 12))]
        );
    }

    #[test]
    fn test_end_at_block_start_adds_nothing_there() {
        let lengths = [10, 10];
        assert_eq!(
            selection_to_ranges(at(0, 6), at(1, 0), &lengths),
            vec![(0, r(6, 10))]
        );
    }

    #[test]
    fn test_offsets_clamped() {
        assert_eq!(selection_to_ranges(at(0, 3), at(0, 99), &[8]), vec![(0, r(3, 8))]);
        assert!(selection_to_ranges(at(0, 20), at(0, 30), &[8]).is_empty());
    }

    #[test]
    fn test_unresolved_start_falls_back_to_block_start() {
        let start = SelectionAnchor::unresolved(1);
        assert_eq!(
            selection_to_ranges(start, at(2, 4), &[5, 6, 7]),
            vec![(1, r(0, 6)), (2, r(0, 4))]
        );
    }

    #[test]
    fn test_unresolved_end_falls_back_to_block_end() {
        let end = SelectionAnchor::unresolved(0);
        assert_eq!(selection_to_ranges(at(0, 2), end, &[5]), vec![(0, r(2, 5))]);
    }

    #[test]
    fn test_both_unresolved_in_one_block() {
        let anchor = SelectionAnchor::unresolved(0);
        assert!(selection_to_ranges(anchor, anchor, &[5]).is_empty());
    }

    #[test]
    fn test_end_far_past_document() {
        assert_eq!(
            selection_to_ranges(at(0, 1), at(usize::MAX, 0), &[5]),
            vec![(0, r(1, 5))]
        );
        assert_eq!(
            selection_to_ranges(at(0, 1), at(1 << 61, 0), &[5]),
            vec![(0, r(1, 5))]
        );
    }

    #[test]
    fn test_start_past_document_adds_nothing() {
        assert!(selection_to_ranges(at(7, 1), at(usize::MAX, 0), &[5, 5]).is_empty());
        assert!(selection_to_ranges(at(0, 1), at(0, 3), &[]).is_empty());
    }

    #[test]
    fn test_missing_length_skips_block() {
        assert_eq!(
            selection_to_ranges(at(0, 1), at(2, 2), &[4, 4]),
            vec![(0, r(1, 4)), (1, r(0, 4))]
        );
    }
}
