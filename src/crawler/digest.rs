//! Content digests for change detection
//!
//! Rendered text passes through a `ContentNormalizer` before hashing. The
//! default normalizer is a pass-through, so any volatile markup in the page
//! (session ids, build timestamps) changes the digest. Configured volatile
//! patterns switch to a regex-stripping normalizer.

use crate::config::HashingConfig;
use crate::ConfigError;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::borrow::Cow;

/// Pre-hash stabilization step
pub trait ContentNormalizer: Send + Sync {
    fn normalize<'a>(&self, raw: &'a str) -> Cow<'a, str>;
}

/// Hashes the rendered text as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl ContentNormalizer for PassThrough {
    fn normalize<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(raw)
    }
}

/// Removes every match of the configured patterns before hashing
#[derive(Debug, Clone)]
pub struct VolatilePatternStripper {
    patterns: Vec<Regex>,
}

impl VolatilePatternStripper {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidPattern(format!("{}: {}", p, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }
}

impl ContentNormalizer for VolatilePatternStripper {
    fn normalize<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        let mut text = Cow::Borrowed(raw);
        for pattern in &self.patterns {
            if pattern.is_match(&text) {
                let stripped = pattern.replace_all(&text, "").into_owned();
                text = Cow::Owned(stripped);
            }
        }
        text
    }
}

/// Picks the normalizer for a hashing configuration
pub fn normalizer_for(config: &HashingConfig) -> Result<Box<dyn ContentNormalizer>, ConfigError> {
    if config.volatile_patterns.is_empty() {
        Ok(Box::new(PassThrough))
    } else {
        Ok(Box::new(VolatilePatternStripper::new(
            &config.volatile_patterns,
        )?))
    }
}

/// Hex-encoded SHA-256 of the normalized text
pub fn content_hash(normalizer: &dyn ContentNormalizer, raw: &str) -> String {
    let normalized = normalizer.normalize(raw);
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}
