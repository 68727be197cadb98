//! Results of write operations that may or may not change stored state.

use serde::{Deserialize, Serialize};

/// Whether an upsert inserted a new record or modified an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl UpsertOutcome {
    #[must_use]
    pub fn is_created(self) -> bool {
        matches!(self, Self::Created)
    }
}

/// Counts reported by a targeted update.
///
/// `matched` is the number of records selected by the update; `modified` is
/// how many of them actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

impl UpdateOutcome {
    /// Whether the update selected any record at all.
    #[must_use]
    pub fn found(self) -> bool {
        self.matched > 0
    }

    /// A single record was selected and changed.
    #[must_use]
    pub fn modified_one() -> Self {
        Self {
            matched: 1,
            modified: 1,
        }
    }

    /// A single record was selected but already had the target value.
    #[must_use]
    pub fn unchanged_one() -> Self {
        Self {
            matched: 1,
            modified: 0,
        }
    }
}
