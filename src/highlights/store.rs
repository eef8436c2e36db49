//! Highlight store
//!
//! Owns the highlight set of the currently open document and writes every
//! change through to the persistence collaborator.

use super::merge::is_merged;
use super::render::render_segments;
use super::selection::selection_to_ranges;
use super::types::{Excerpt, HighlightSet, Range, Segment};
use crate::config::HighlightsConfig;
use crate::document::{char_slice, Document};
use crate::error::{HighlightError, Result};
use crate::resolver::SelectionAnchor;
use crate::storage::KeyValueStore;

/// Outcome of [`HighlightStore::load`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Persisted highlights were restored as-is
    Restored,
    /// Nothing was persisted for the document; starting empty
    Missing,
    /// Persisted data was unusable in whole or part and was repaired or
    /// discarded. Not an error: the document opens regardless.
    Recovered { reason: String },
}

impl LoadStatus {
    pub fn is_recovered(&self) -> bool {
        matches!(self, LoadStatus::Recovered { .. })
    }
}

#[derive(Debug)]
struct ActiveDocument {
    id: String,
    highlights: HighlightSet,
}

/// Highlight state for one open document at a time
pub struct HighlightStore<S> {
    storage: S,
    config: HighlightsConfig,
    active: Option<ActiveDocument>,
}

impl<S: KeyValueStore> HighlightStore<S> {
    /// Create an unloaded store with the default configuration
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, HighlightsConfig::default())
    }

    pub fn with_config(storage: S, config: HighlightsConfig) -> Self {
        Self {
            storage,
            config,
            active: None,
        }
    }

    /// Make `document_id` the active document, reading its highlights.
    ///
    /// Any previously loaded document is discarded first; its last write
    /// is authoritative. Missing or malformed data yields an empty set.
    /// Only a failing read is an error, in which case the store stays
    /// unloaded.
    pub fn load(&mut self, document_id: &str) -> Result<LoadStatus> {
        if let Some(previous) = self.active.take() {
            tracing::debug!("Unloading highlights for {}", previous.id);
        }

        let key = self.config.storage_key(document_id);
        let raw = self
            .storage
            .get(&key)
            .map_err(|source| HighlightError::PersistenceRead {
                document_id: document_id.to_string(),
                source,
            })?;

        let (highlights, status) = match raw {
            None => (HighlightSet::new(), LoadStatus::Missing),
            Some(json) => parse_persisted(document_id, &json),
        };

        tracing::info!(
            "Loaded {} highlights in {} blocks for {}",
            highlights.range_count(),
            highlights.blocks().count(),
            document_id
        );

        self.active = Some(ActiveDocument {
            id: document_id.to_string(),
            highlights,
        });

        Ok(status)
    }

    /// Drop the in-memory set without writing
    pub fn unload(&mut self) {
        self.active = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.active.is_some()
    }

    pub fn document_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.id.as_str())
    }

    pub fn highlights(&self) -> Option<&HighlightSet> {
        self.active.as_ref().map(|a| &a.highlights)
    }

    /// Stored ranges of a block; empty when unloaded
    pub fn ranges(&self, block_index: usize) -> &[Range] {
        self.highlights()
            .map(|h| h.ranges(block_index))
            .unwrap_or(&[])
    }

    pub fn is_highlighted(&self, block_index: usize, offset: usize) -> bool {
        self.highlights()
            .is_some_and(|h| h.contains(block_index, offset))
    }

    /// Highlight the text between two selection anchors.
    ///
    /// `lengths[i]` is the character length of block `i`. Returns the blocks
    /// that received a range. The set is saved immediately; if that fails
    /// the in-memory set still holds the new ranges and
    /// [`HighlightError::PersistenceWrite`] is returned.
    pub fn add_selection(
        &mut self,
        start: SelectionAnchor,
        end: SelectionAnchor,
        lengths: &[usize],
    ) -> Result<Vec<usize>> {
        let active = self.active.as_mut().ok_or(HighlightError::NotLoaded)?;

        let ranges = selection_to_ranges(start, end, lengths);
        if ranges.is_empty() {
            tracing::debug!("Selection in {} covers no text", active.id);
            return Ok(Vec::new());
        }

        let touched: Vec<usize> = ranges.iter().map(|(block, _)| *block).collect();
        for (block, range) in ranges {
            active.highlights.extend_block(block, [range]);
        }

        tracing::debug!("Highlighted blocks {:?} in {}", touched, active.id);

        self.save()?;
        Ok(touched)
    }

    /// Highlight `[start, end)` of one block directly.
    ///
    /// Unlike selections, a reversed or empty range here is a caller bug and
    /// is rejected with [`HighlightError::InvalidRange`].
    pub fn add_range(&mut self, block_index: usize, start: usize, end: usize) -> Result<()> {
        let range = Range::new(start, end)?;
        let active = self.active.as_mut().ok_or(HighlightError::NotLoaded)?;

        active.highlights.insert(block_index, range);

        self.save()
    }

    /// Remove every highlight of `document_id` and persist the empty set.
    ///
    /// Irreversible; confirming intent is the caller's job. Clearing a
    /// document other than the active one leaves the active one untouched.
    pub fn clear(&mut self, document_id: &str) -> Result<()> {
        match self.active.as_mut() {
            Some(active) if active.id == document_id => {
                active.highlights.clear();
                self.save()?;
            }
            _ => self.write(document_id, &HighlightSet::new())?,
        }

        tracing::info!("Cleared highlights for {}", document_id);
        Ok(())
    }

    /// Write the active set to storage
    pub fn save(&mut self) -> Result<()> {
        let active = self.active.as_ref().ok_or(HighlightError::NotLoaded)?;
        let json = active.highlights.to_json()?;
        let key = self.config.storage_key(&active.id);

        write_json(&mut self.storage, &key, &active.id, &json)
    }

    fn write(&mut self, document_id: &str, highlights: &HighlightSet) -> Result<()> {
        let json = highlights.to_json()?;
        let key = self.config.storage_key(document_id);

        write_json(&mut self.storage, &key, document_id, &json)
    }

    /// Split a block's text into plain and highlighted segments using the
    /// stored ranges. With nothing loaded the text comes back as one plain
    /// segment.
    pub fn render_segments<'a>(&self, block_index: usize, text: &'a str) -> Vec<Segment<'a>> {
        render_segments(text, self.ranges(block_index))
    }

    /// Highlighted text of every stored range, in document order
    pub fn excerpts(&self, document: &Document) -> Vec<Excerpt> {
        let Some(highlights) = self.highlights() else {
            return Vec::new();
        };

        highlights
            .iter()
            .filter_map(|(block_index, ranges)| {
                document.block(block_index).map(|block| (block_index, block, ranges))
            })
            .flat_map(|(block_index, block, ranges)| {
                ranges.iter().filter_map(move |range| {
                    let range = range.clamp_to(block.len())?;
                    Some(Excerpt {
                        block_index,
                        range,
                        text: char_slice(&block.text, range.start, range.end).to_string(),
                    })
                })
            })
            .collect()
    }

    pub fn config(&self) -> &HighlightsConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

fn write_json<S: KeyValueStore>(
    storage: &mut S,
    key: &str,
    document_id: &str,
    json: &str,
) -> Result<()> {
    match storage.set(key, json) {
        Ok(()) => {
            tracing::debug!("Saved highlights for {} ({} bytes)", document_id, json.len());
            Ok(())
        }
        Err(source) => {
            tracing::warn!("Failed to save highlights for {}: {:#}", document_id, source);
            Err(HighlightError::PersistenceWrite {
                document_id: document_id.to_string(),
                source,
            })
        }
    }
}

/// Parse persisted JSON, repairing what can be repaired
fn parse_persisted(document_id: &str, json: &str) -> (HighlightSet, LoadStatus) {
    let mut highlights = match HighlightSet::from_json(json) {
        Ok(highlights) => highlights,
        Err(e) => {
            tracing::warn!(
                "Malformed highlights for {}: {}. Starting empty",
                document_id,
                e
            );
            return (
                HighlightSet::new(),
                LoadStatus::Recovered {
                    reason: e.to_string(),
                },
            );
        }
    };

    let canonical = highlights.iter().all(|(_, ranges)| is_merged(ranges));
    let dropped = highlights.normalize();

    if dropped > 0 {
        tracing::warn!("Dropped {} invalid ranges for {}", dropped, document_id);
        let reason = format!("dropped {} invalid ranges", dropped);
        (highlights, LoadStatus::Recovered { reason })
    } else if !canonical {
        tracing::warn!("Re-merged unnormalized highlights for {}", document_id);
        let reason = "ranges were not merged".to_string();
        (highlights, LoadStatus::Recovered { reason })
    } else {
        (highlights, LoadStatus::Restored)
    }
}
