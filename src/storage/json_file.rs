//! JSON file storage implementation
//!
//! This module provides a single-file JSON implementation of the
//! DocumentStore trait.

use crate::storage::traits::{DocumentStore, StorageResult};
use crate::storage::{atomic_write, MetadataDocument};
use std::io::ErrorKind;
use std::path::PathBuf;

/// JSON file storage backend
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> StorageResult<Option<MetadataDocument>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let document = serde_json::from_str(&content)?;
        Ok(Some(document))
    }

    fn save(&self, document: &MetadataDocument) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(document)?;
        atomic_write(&self.path, &bytes)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
