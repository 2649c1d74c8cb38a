/// Per-page processing states
///
/// Every dequeued URL walks this machine to exactly one terminal state.
use crate::HarvestError;
use std::fmt;

/// Represents where a page is in the fetch pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Pulled from the frontier
    Dequeued,

    /// URL reduced to its canonical key
    Normalized,

    /// Render race in flight
    Rendering,

    /// Render produced page text
    Rendered,

    /// Content digest computed
    Hashed,

    /// Change detector asked for a rewrite
    Changed,

    /// Change detector found nothing new
    Unchanged,

    /// Artifact and fingerprint written
    Persisted,

    /// Outbound links collected
    LinksExtracted,

    /// Eligible children pushed to the frontier
    ChildrenEnqueued,

    /// Timer won the render race
    TimedOut,

    /// Render, conversion or persistence failed
    Failed,

    // ===== Terminal States =====
    /// Canonical URL was already visited; discarded
    AlreadySeen,

    /// Counted as new or updated
    StatsUpdated,

    /// Counted as skipped
    SkippedRecorded,

    /// Counted as an error
    ErrorRecorded,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::AlreadySeen | Self::StatsUpdated | Self::SkippedRecorded | Self::ErrorRecorded
        )
    }

    /// Returns true if moving from `self` to `next` is a legal step
    pub fn can_transition_to(&self, next: PageState) -> bool {
        use PageState::*;

        matches!(
            (self, next),
            (Dequeued, Normalized)
                | (Dequeued, Failed)
                | (Normalized, AlreadySeen)
                | (Normalized, Rendering)
                | (Rendering, Rendered)
                | (Rendering, TimedOut)
                | (Rendering, Failed)
                | (Rendered, Hashed)
                | (Hashed, Changed)
                | (Hashed, Unchanged)
                | (Unchanged, SkippedRecorded)
                | (Unchanged, LinksExtracted)
                | (Changed, Persisted)
                | (Changed, Failed)
                | (Persisted, LinksExtracted)
                | (Persisted, StatsUpdated)
                | (LinksExtracted, ChildrenEnqueued)
                | (ChildrenEnqueued, StatsUpdated)
                | (ChildrenEnqueued, SkippedRecorded)
                | (TimedOut, ErrorRecorded)
                | (Failed, ErrorRecorded)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dequeued => "dequeued",
            Self::Normalized => "normalized",
            Self::Rendering => "rendering",
            Self::Rendered => "rendered",
            Self::Hashed => "hashed",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
            Self::Persisted => "persisted",
            Self::LinksExtracted => "links_extracted",
            Self::ChildrenEnqueued => "children_enqueued",
            Self::TimedOut => "timed_out",
            Self::Failed => "failed",
            Self::AlreadySeen => "already_seen",
            Self::StatsUpdated => "stats_updated",
            Self::SkippedRecorded => "skipped_recorded",
            Self::ErrorRecorded => "error_recorded",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks one page through the state machine
#[derive(Debug)]
pub struct PageTracker {
    url: String,
    state: PageState,
}

impl PageTracker {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: PageState::Dequeued,
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// Moves to `next`, rejecting transitions the machine does not allow
    pub fn advance(&mut self, next: PageState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("{}: {} -> {}", self.url, self.state, next);
        self.state = next;
        Ok(())
    }
}
