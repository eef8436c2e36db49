//! Error types for the highlight engine

use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Highlight engine error type
#[derive(Error, Debug)]
pub enum HighlightError {
    /// A range was built with `start >= end` outside the selection path
    #[error("Invalid range: start {start} must be less than end {end}")]
    InvalidRange { start: usize, end: usize },

    /// A mutation was attempted with no document loaded
    #[error("No document loaded")]
    NotLoaded,

    /// The persistence collaborator failed to store the highlight set.
    /// The in-memory set already reflects the change.
    #[error("Failed to save highlights for {document_id}: {source}")]
    PersistenceWrite {
        document_id: String,
        #[source]
        source: anyhow::Error,
    },

    /// The persistence collaborator failed to read the highlight set
    #[error("Failed to load highlights for {document_id}: {source}")]
    PersistenceRead {
        document_id: String,
        #[source]
        source: anyhow::Error,
    },

    /// Block markup could not be parsed into a text tree
    #[error("Markup error: {0}")]
    Markup(#[from] roxmltree::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
