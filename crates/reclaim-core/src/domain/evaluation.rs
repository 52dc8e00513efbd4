//! Evaluation record.

use serde::{Deserialize, Serialize};

use super::ids::{EvalId, JobId};
use super::index::LogIndex;
use super::state::{EvalStatus, JobType};

/// One scheduling decision made for a job.
///
/// `job_type` is copied from the owning job when the evaluation is created.
/// Evaluation GC uses it to skip batch work without looking the job up, so
/// the decision never depends on a parent that a concurrent job GC may have
/// already removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvalId,
    pub job_id: JobId,
    pub job_type: JobType,
    pub status: EvalStatus,

    #[serde(default)]
    pub modify_index: LogIndex,
}

impl Evaluation {
    /// New pending evaluation for `job_id`.
    pub fn new(job_id: JobId, job_type: JobType) -> Self {
        Self {
            id: EvalId::generate(),
            job_id,
            job_type,
            status: EvalStatus::Pending,
            modify_index: LogIndex::ZERO,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_batch(&self) -> bool {
        self.job_type.is_batch()
    }
}
