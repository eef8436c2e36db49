//! Read-only document content
//!
//! The engine never mutates a document. Blocks are addressed by their index
//! and all offsets count characters of the block text.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A loaded document: an ordered sequence of blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub blocks: Vec<Block>,
}

/// One contiguous unit of content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Content-type tag (paragraph, heading, verse...), only meaningful to
    /// the presentation layer
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl Block {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
        }
    }

    /// Length of the text in characters
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl Document {
    pub fn new(id: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            id: id.into(),
            blocks,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Per-block text lengths, indexed by block
    pub fn text_lengths(&self) -> Vec<usize> {
        self.blocks.iter().map(Block::len).collect()
    }
}

/// Number of characters in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the `offset`-th character, clamped to the end of `text`
pub(crate) fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Substring between two character offsets, both clamped to the text
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start = byte_index(text, start);
    let end = byte_index(text, end).max(start);
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_from_json() {
        let json = r#"{
            "id": "psalms",
            "blocks": [
                {"type": "heading", "text": "Psalm 23"},
                {"type": "verse", "text": "The Lord is my shepherd"}
            ]
        }"#;

        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.id, "psalms");
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[1].kind, "verse");
        assert_eq!(doc.text_lengths(), vec![8, 23]);
    }

    #[test]
    fn test_lengths_count_chars() {
        let block = Block::new("paragraph", "café crème");
        assert_eq!(block.len(), 10);
        assert_eq!(char_slice(&block.text, 0, 4), "café");
        assert_eq!(char_slice(&block.text, 5, 99), "crème");
    }

    #[test]
    fn test_char_slice_reversed_bounds_is_empty() {
        assert_eq!(char_slice("hello", 4, 2), "");
    }
}
