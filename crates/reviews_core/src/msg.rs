use chrono::NaiveDate;

use crate::{JobStatus, ScheduleResponse};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Start reconciling a row as of `today`.
    Begin { today: NaiveDate },
    /// Fresh status for the row's latest job.
    StatusRefreshed(JobStatus),
    /// The schedule request issued for the row was answered.
    Scheduled {
        response: ScheduleResponse,
        today: NaiveDate,
    },
}
