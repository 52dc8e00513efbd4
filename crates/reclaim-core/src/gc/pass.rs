//! Age filter shared by the eligibility passes.

use crate::domain::LogIndex;

/// How old a record must be to be considered by one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GcPass {
    /// Records modified after this index are too young.
    pub cutoff: LogIndex,

    /// Skip the age test (and the job status test). Liveness checks still
    /// apply.
    pub force: bool,
}

impl GcPass {
    pub fn aged(cutoff: LogIndex) -> Self {
        Self {
            cutoff,
            force: false,
        }
    }

    pub fn forced(reference_index: LogIndex) -> Self {
        Self {
            cutoff: reference_index,
            force: true,
        }
    }

    pub fn is_old_enough(&self, modify_index: LogIndex) -> bool {
        self.force || modify_index.is_at_or_before(self.cutoff)
    }
}
