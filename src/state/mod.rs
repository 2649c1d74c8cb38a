//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: where a single page is in the fetch pipeline
//! - `PageFingerprint`: what was stored the last time a page was crawled
//! - `SessionCheckpoint`: the resumable snapshot of an in-flight crawl

mod fingerprint;
mod page_state;
mod session;

// Re-export main types
pub use fingerprint::PageFingerprint;
pub use page_state::{PageState, PageTracker};
pub use session::{QueuedUrl, SessionCheckpoint};
