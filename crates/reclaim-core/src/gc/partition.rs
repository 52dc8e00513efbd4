//! Reap partitioner: splits a removal set into bounded delete transactions.

use crate::domain::{AllocId, EvalId};
use crate::ports::{DeleteTransaction, ReapRequest};

use super::candidates::GcCandidates;

/// Split evaluation and allocation keys into batches of at most
/// `max_ids_per_reap` combined identifiers.
///
/// Allocations are placed first, then evaluations, each in input order, so
/// a batch holds both types only where the allocations run out. A limit of
/// zero is treated as one.
pub fn partition_reap(
    evals: &[EvalId],
    allocs: &[AllocId],
    max_ids_per_reap: usize,
) -> Vec<ReapRequest> {
    let max = max_ids_per_reap.max(1);
    let mut requests = Vec::with_capacity((evals.len() + allocs.len()).div_ceil(max));
    let mut current = ReapRequest::default();

    for &alloc in allocs {
        if current.len() == max {
            requests.push(std::mem::take(&mut current));
        }
        current.allocs.push(alloc);
    }
    for &eval in evals {
        if current.len() == max {
            requests.push(std::mem::take(&mut current));
        }
        current.evals.push(eval);
    }
    if !current.is_empty() {
        requests.push(current);
    }

    requests
}

/// Every transaction needed to remove `candidates`, in submission order:
/// evaluation/allocation reaps, then nodes, then jobs. A job record is
/// therefore never removed before its children.
pub fn build_transactions(candidates: &GcCandidates, max_ids_per_reap: usize) -> Vec<DeleteTransaction> {
    let max = max_ids_per_reap.max(1);

    let reaps = partition_reap(&candidates.evals, &candidates.allocs, max)
        .into_iter()
        .map(DeleteTransaction::Reap);
    let nodes = candidates
        .nodes
        .chunks(max)
        .map(|chunk| DeleteTransaction::DeregisterNodes {
            nodes: chunk.to_vec(),
        });
    let jobs = candidates
        .jobs
        .chunks(max)
        .map(|chunk| DeleteTransaction::DeregisterJobs {
            jobs: chunk.to_vec(),
        });

    reaps.chain(nodes).chain(jobs).collect()
}
