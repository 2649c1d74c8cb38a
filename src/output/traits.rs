//! Content converter trait
//!
//! Turns rendered page text into the artifact persisted on disk. Conversion
//! is expected to be pure; an error is treated as a failure of that page.

use crate::HarvestError;

/// Converts rendered page text into an artifact
pub trait ContentConverter: Send + Sync {
    /// Produces the artifact text for `url`
    ///
    /// # Arguments
    ///
    /// * `raw` - The rendered page text
    /// * `url` - Canonical URL of the page
    fn to_artifact(&self, raw: &str, url: &str) -> Result<String, HarvestError>;
}

/// Writes the rendered text unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct RawConverter;

impl ContentConverter for RawConverter {
    fn to_artifact(&self, raw: &str, _url: &str) -> Result<String, HarvestError> {
        Ok(raw.to_string())
    }
}
