//! Job record.

use serde::{Deserialize, Serialize};

use super::ids::JobId;
use super::index::LogIndex;
use super::state::{JobStatus, JobType};

/// A job as stored in the cluster state.
///
/// The job owns its evaluations (and, through them, its allocations). Only
/// the scheduling subsystem moves a job between statuses; the collector
/// reads `status` and `modify_index` and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub job_type: JobType,
    pub status: JobStatus,

    /// Index of the last write to this record (stamped by the state store).
    #[serde(default)]
    pub modify_index: LogIndex,
}

impl Job {
    /// New pending job with a fresh id.
    pub fn new(job_type: JobType) -> Self {
        Self {
            id: JobId::generate(),
            job_type,
            status: JobStatus::Pending,
            modify_index: LogIndex::ZERO,
        }
    }

    /// Dead jobs are the normal candidates for job GC.
    pub fn is_dead(&self) -> bool {
        self.status == JobStatus::Dead
    }
}
