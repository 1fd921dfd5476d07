use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Where a revision is in its lifecycle.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionState {
    /// Being written, not yet submitted.
    Created,
    /// Waiting for peer review.
    Submitted,
    /// The published version.
    Current,
    /// A published version that has been superseded.
    Approved,
    /// Sent back to the author.
    Returned,
    /// Purged after a while.
    Rejected,
    /// In the trash.
    Deleted,
}

impl VersionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionState::Created => "created",
            VersionState::Submitted => "submitted",
            VersionState::Current => "current",
            VersionState::Approved => "approved",
            VersionState::Returned => "returned",
            VersionState::Rejected => "rejected",
            VersionState::Deleted => "deleted",
        }
    }
}

impl Display for VersionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
