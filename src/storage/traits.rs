//! Storage traits and error types
//!
//! This module defines the trait interface for metadata persistence backends
//! and associated error types.

use crate::storage::MetadataDocument;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Whole-document persistence for crawl metadata
///
/// Implementations read and write the entire document at once; there are
/// no partial or append writes.
pub trait DocumentStore: Send {
    /// Reads the stored document
    ///
    /// # Returns
    ///
    /// * `Ok(Some(doc))` - A document was found and parsed
    /// * `Ok(None)` - Nothing has been stored yet
    /// * `Err(StorageError)` - The document exists but could not be read or parsed
    fn load(&self) -> StorageResult<Option<MetadataDocument>>;

    /// Replaces the stored document atomically
    fn save(&self, document: &MetadataDocument) -> StorageResult<()>;

    /// Human-readable location for log messages
    fn location(&self) -> String;
}
