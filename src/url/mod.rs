//! URL handling module for Doc-Ripple
//!
//! This module provides URL normalization, allow-list prefix matching, and
//! category/slug derivation for artifact storage.

mod category;
mod matcher;
mod normalize;

// Re-export main functions
pub use category::{ArtifactLocation, CategoryResolver};
pub use matcher::{matches_prefix, AllowList};
pub use normalize::normalize_url;
