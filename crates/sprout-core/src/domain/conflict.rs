//! Conflict decisions for write targets that already exist.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do about exactly one target path that already exists.
///
/// `Merge` only has directory semantics (union, incoming wins on name
/// collision); on a file it is equivalent to `Overwrite`. `Cancel` is
/// terminal for the whole in-flight multi-file operation, not just the
/// current path — callers must stop issuing writes once they see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictDecision {
    Overwrite,
    Skip,
    Merge,
    Cancel,
}

impl ConflictDecision {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::Skip => "skip",
            Self::Merge => "merge",
            Self::Cancel => "cancel",
        }
    }

    pub const fn is_cancel(&self) -> bool {
        matches!(self, Self::Cancel)
    }
}

impl fmt::Display for ConflictDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
