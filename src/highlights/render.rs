//! Segment rendering
//!
//! Splits a block's text into alternating plain and highlighted runs for the
//! presentation layer.

use std::iter;

use super::types::{Range, Segment};

/// Split `text` into segments according to `ranges`.
///
/// `ranges` are expected in ascending order, as stored lists are. The
/// segment texts concatenate back to `text`. Ranges are clamped to the
/// text length, since stored offsets may have drifted from the live
/// content; empty segments are never emitted and two highlighted segments
/// are never adjacent.
pub fn render_segments<'a>(text: &'a str, ranges: &[Range]) -> Vec<Segment<'a>> {
    // Byte position of every character boundary, including the end.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(idx, _)| idx)
        .chain(iter::once(text.len()))
        .collect();
    let len = bounds.len() - 1;
    let slice = |start: usize, end: usize| &text[bounds[start]..bounds[end]];

    let mut segments = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut cursor = 0;

    for range in ranges {
        let Some(clamped) = range.clamp_to(len) else {
            continue;
        };
        let start = clamped.start.max(cursor);
        let end = clamped.end;
        if start >= end {
            continue;
        }

        if start > cursor {
            segments.push(Segment::plain(slice(cursor, start)));
        } else if let Some(last) = segments.last_mut().filter(|s| s.highlighted) {
            // Touching the previous highlight: widen it instead.
            let from = bounds[cursor] - last.text.len();
            last.text = &text[from..bounds[end]];
            cursor = end;
            continue;
        }

        segments.push(Segment::highlighted(slice(start, end)));
        cursor = end;
    }

    if cursor < len {
        segments.push(Segment::plain(slice(cursor, len)));
    }

    segments
}
