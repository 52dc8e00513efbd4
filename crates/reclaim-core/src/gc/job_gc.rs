//! Job eligibility (one-shot reclamation).
//!
//! A job goes away together with every evaluation and allocation it owns,
//! or not at all. This is the only pass that reclaims batch work.

use tracing::debug;

use crate::domain::{Job, JobStatus};
use crate::ports::StateSnapshot;

use super::candidates::GcCandidates;
use super::pass::GcPass;

/// Why a job was kept. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retained {
    TooYoung,
    EvalNotTerminal,
    AllocNotTerminal,
}

/// Jobs that are dead (any status when forced), old enough and whose whole
/// evaluation/allocation tree is terminal; the output holds each job's
/// key, all its evaluation keys and all its allocation keys.
///
/// Allocation terminality is judged on desired status alone, across the
/// whole job rather than per evaluation: any allocation the scheduler still
/// wants running keeps everything.
pub fn job_candidates(snap: &dyn StateSnapshot, pass: GcPass) -> GcCandidates {
    let jobs = if pass.force {
        snap.jobs()
    } else {
        snap.jobs_by_status(JobStatus::Dead)
    };

    let mut out = GcCandidates::default();
    for job in jobs {
        if let Err(reason) = collect_job(snap, job, pass, &mut out) {
            debug!(job = %job.id, ?reason, "job retained");
        }
    }
    out
}

fn collect_job(
    snap: &dyn StateSnapshot,
    job: &Job,
    pass: GcPass,
    out: &mut GcCandidates,
) -> Result<(), Retained> {
    if !pass.is_old_enough(job.modify_index) {
        return Err(Retained::TooYoung);
    }

    let evals = snap.evals_by_job(job.id);
    if evals.iter().any(|eval| !eval.is_terminal()) {
        return Err(Retained::EvalNotTerminal);
    }

    let allocs = snap.allocs_by_job(job.id);
    if allocs.iter().any(|alloc| !alloc.is_terminal()) {
        return Err(Retained::AllocNotTerminal);
    }

    out.jobs.push(job.id);
    out.evals.extend(evals.iter().map(|eval| eval.id));
    out.allocs.extend(allocs.iter().map(|alloc| alloc.id));
    Ok(())
}
