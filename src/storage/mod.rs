//! Storage module for persisting crawl data
//!
//! This module handles everything the crawler writes to disk:
//! - The metadata document (fingerprints, statistics, session checkpoint)
//! - Atomic whole-file writes shared by metadata saves and page artifacts

mod json_file;
mod metadata;
mod schema;
mod traits;

pub use json_file::JsonFileStore;
pub use metadata::MetadataStore;
pub use schema::MetadataDocument;
pub use traits::{DocumentStore, StorageError, StorageResult};

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replaces `path` with `contents` in one rename
///
/// The data is written to a temporary file in the destination directory and
/// then persisted over the target, so readers see either the old file or
/// the new one. Missing parent directories are created.
pub fn atomic_write(path: &Path, contents: &[u8]) -> StorageResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| StorageError::Io(e.error))?;

    Ok(())
}
