//! Configuration for the highlight engine and its bundled stores

use std::env;
use std::path::PathBuf;

use crate::error::{HighlightError, Result};

#[derive(Debug, Clone)]
pub struct HighlightsConfig {
    /// Prepended to the document id to form the persistence key
    pub key_prefix: String,
    /// Directory used by the file-backed store
    pub data_dir: PathBuf,
}

impl Default for HighlightsConfig {
    fn default() -> Self {
        HighlightsConfig {
            key_prefix: String::new(),
            data_dir: PathBuf::from("./highlights"),
        }
    }
}

impl HighlightsConfig {
    /// Load configuration from the environment, reading a `.env` file first
    /// when one is present. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = HighlightsConfig::default();

        let key_prefix = env::var("HIGHLIGHTS_KEY_PREFIX").unwrap_or(defaults.key_prefix);
        let data_dir = match env::var("HIGHLIGHTS_DATA_DIR") {
            Ok(dir) if dir.trim().is_empty() => {
                return Err(HighlightError::Config(
                    "HIGHLIGHTS_DATA_DIR must not be empty".to_string(),
                ))
            }
            Ok(dir) => PathBuf::from(dir),
            Err(_) => defaults.data_dir,
        };

        Ok(HighlightsConfig {
            key_prefix,
            data_dir,
        })
    }

    /// Persistence key for a document
    pub fn storage_key(&self, document_id: &str) -> String {
        format!("{}{}", self.key_prefix, document_id)
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}
