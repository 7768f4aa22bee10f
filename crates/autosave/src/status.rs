//! Status values, save outcomes, and events published by the engine.

use serde::Serialize;

use quill_core::types::{ArticleId, Timestamp};

// ---------------------------------------------------------------------------
// SaveStatus
// ---------------------------------------------------------------------------

/// What the autosave indicator should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    /// Nothing has been saved in this session, or the last evaluation was
    /// a no-op.
    #[default]
    Idle,
    /// One persistence call is in flight.
    Saving,
    /// The last persistence call succeeded.
    Saved,
    /// The last persistence call failed.
    Error,
}

impl SaveStatus {
    /// Indicator text for the editor status bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Draft",
            Self::Saving => "Saving...",
            Self::Saved => "Saved",
            Self::Error => "Save failed",
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Why a save attempt did not reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another persistence call was already running.
    InFlight,
    /// Neither title nor body carries text.
    Empty,
    /// Content matches the last persisted snapshot.
    Unchanged,
}

/// Result of a save attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The store accepted the content.
    Saved,
    /// No call was made.
    Skipped(SkipReason),
}

// ---------------------------------------------------------------------------
// AutosaveEvent
// ---------------------------------------------------------------------------

/// Change notifications for the UI, delivered over a broadcast channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AutosaveEvent {
    StatusChanged {
        status: SaveStatus,
        at: Timestamp,
    },
    /// The first successful create assigned the draft's identity.
    IdentityAssigned {
        article_id: ArticleId,
    },
}
