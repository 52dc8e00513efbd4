//! Collection requests produced by the periodic trigger (or an operator).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::index::LogIndex;

/// Which collection pass to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GcKind {
    /// Reclaim old terminal non-batch evaluations and their allocations.
    EvalGc,
    /// Reclaim old down nodes.
    NodeGc,
    /// Reclaim old dead jobs with their whole evaluation/allocation tree.
    JobGc,
    /// Run all three passes with no age restriction.
    ForceGc,
}

impl GcKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GcKind::EvalGc => "eval-gc",
            GcKind::NodeGc => "node-gc",
            GcKind::JobGc => "job-gc",
            GcKind::ForceGc => "force-gc",
        }
    }
}

impl fmt::Display for GcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gc kind: {0}")]
pub struct UnknownGcKind(String);

impl FromStr for GcKind {
    type Err = UnknownGcKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eval" | "eval-gc" => Ok(GcKind::EvalGc),
            "node" | "node-gc" => Ok(GcKind::NodeGc),
            "job" | "job-gc" => Ok(GcKind::JobGc),
            "force" | "force-gc" => Ok(GcKind::ForceGc),
            other => Err(UnknownGcKind(other.to_string())),
        }
    }
}

/// One collection request.
///
/// `reference_index` selects the snapshot the run reads, and is the cutoff
/// itself for a forced run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcRequest {
    pub kind: GcKind,
    pub reference_index: LogIndex,
}

impl GcRequest {
    pub fn new(kind: GcKind, reference_index: impl Into<LogIndex>) -> Self {
        Self {
            kind,
            reference_index: reference_index.into(),
        }
    }

    pub fn is_forced(&self) -> bool {
        self.kind == GcKind::ForceGc
    }
}
