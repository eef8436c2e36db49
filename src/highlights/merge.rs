//! Range normalization

use super::types::Range;

/// Merge one block's ranges into canonical form.
///
/// Output is sorted by `start`, every range has `start < end`, and
/// neighbours are strictly separated (`a.end < b.start`): overlapping and
/// touching ranges are combined. Degenerate input ranges are dropped.
pub fn merge_ranges(ranges: &[Range]) -> Vec<Range> {
    let mut sorted: Vec<Range> = ranges.iter().copied().filter(|r| !r.is_empty()).collect();
    sorted.sort_unstable();

    let mut merged: Vec<Range> = Vec::with_capacity(sorted.len());
    let mut iter = sorted.into_iter();

    let Some(mut current) = iter.next() else {
        return merged;
    };

    for next in iter {
        if next.start <= current.end {
            current.end = current.end.max(next.end);
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);

    merged
}

/// Check the canonical-form invariant
pub fn is_merged(ranges: &[Range]) -> bool {
    ranges.iter().all(|r| r.start < r.end)
        && ranges.windows(2).all(|w| w[0].end < w[1].start)
}
