use crate::{JobId, RowOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RefreshStatus {
        job_id: JobId,
    },
    ScheduleJob {
        url: String,
        previous_job_id: Option<JobId>,
    },
    /// Nothing left to do for this row in this pass.
    Done(RowOutcome),
}
