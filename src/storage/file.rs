//! File-backed key-value store
//!
//! Each key maps to one JSON file in the data directory. Keys are
//! percent-encoded so any document id yields a flat, safe file name.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::config::HighlightsConfig;

/// Directory of JSON files, one per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        tracing::debug!("Highlight file store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn from_config(config: &HighlightsConfig) -> Result<Self> {
        Self::open(&config.data_dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the value for `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        // Write beside the target and rename so readers never see a torn file
        fs::write(&tmp, value).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.get("book-1").unwrap(), None);
    }

    #[test]
    fn test_set_get_across_instances() {
        let dir = TempDir::new().unwrap();

        let mut store = FileStore::open(dir.path()).unwrap();
        store.set("book-1", r#"{"0":[{"start":1,"end":2}]}"#).unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get("book-1").unwrap().as_deref(),
            Some(r#"{"0":[{"start":1,"end":2}]}"#)
        );
    }

    #[test]
    fn test_keys_are_encoded() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        store.set("books/../../etc", "{}").unwrap();

        let path = store.path_for("books/../../etc");
        assert_eq!(path.parent(), Some(dir.path()));
        assert!(path.exists());
        assert_eq!(store.get("books/../../etc").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_creates_nested_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data").join("highlights");

        let store = FileStore::open(&nested).unwrap();
        assert!(store.dir().is_dir());
    }
}
