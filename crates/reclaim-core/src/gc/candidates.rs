//! Removal sets produced by the eligibility passes.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::domain::{AllocId, EvalId, JobId, NodeId};

/// Keys one or more passes decided to remove, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcCandidates {
    pub jobs: Vec<JobId>,
    pub evals: Vec<EvalId>,
    pub allocs: Vec<AllocId>,
    pub nodes: Vec<NodeId>,
}

impl GcCandidates {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty() && self.evals.is_empty() && self.allocs.is_empty() && self.nodes.is_empty()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.jobs.len() + self.evals.len() + self.allocs.len() + self.nodes.len()
    }

    /// Append `other`, skipping keys already present.
    ///
    /// A forced run evaluates several passes over the same snapshot; an
    /// evaluation reclaimed by the evaluation pass may show up again under
    /// its dead job.
    pub fn merge(&mut self, other: GcCandidates) {
        extend_unique(&mut self.jobs, other.jobs);
        extend_unique(&mut self.evals, other.evals);
        extend_unique(&mut self.allocs, other.allocs);
        extend_unique(&mut self.nodes, other.nodes);
    }
}

fn extend_unique<T: Copy + Eq + Hash>(into: &mut Vec<T>, from: Vec<T>) {
    let mut seen: HashSet<T> = into.iter().copied().collect();
    into.extend(from.into_iter().filter(|id| seen.insert(*id)));
}
