//! Run reports.

use serde::{Deserialize, Serialize};

use crate::domain::{GcKind, GcRequest, LogIndex};
use crate::ports::DeleteTransaction;

use super::candidates::GcCandidates;

/// What a dry run would do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcPlan {
    pub request: GcRequest,
    pub cutoff: LogIndex,
    pub candidates: GcCandidates,
    pub transactions: Vec<DeleteTransaction>,
}

impl GcPlan {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// What a completed run removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcSummary {
    pub kind: GcKind,
    pub reference_index: LogIndex,
    pub cutoff: LogIndex,
    pub evals: usize,
    pub allocs: usize,
    pub nodes: usize,
    pub jobs: usize,
    pub transactions: usize,
}

impl GcSummary {
    pub fn from_plan(plan: &GcPlan) -> Self {
        Self {
            kind: plan.request.kind,
            reference_index: plan.request.reference_index,
            cutoff: plan.cutoff,
            evals: plan.candidates.evals.len(),
            allocs: plan.candidates.allocs.len(),
            nodes: plan.candidates.nodes.len(),
            jobs: plan.candidates.jobs.len(),
            transactions: plan.transactions.len(),
        }
    }

    pub fn reclaimed(&self) -> usize {
        self.evals + self.allocs + self.nodes + self.jobs
    }
}
