use crate::{CrawlStatus, Effect, Msg, ReconcilePolicy, RowOutcome, TrackedSource};

/// Pure update function: applies a message to a tracked-source row and
/// returns the next effect the driver has to perform for it.
///
/// A row walks `Begin -> [RefreshStatus] -> [ScheduleJob] -> Done`; the driver
/// feeds each effect's answer back in as the next message.
pub fn update(
    mut row: TrackedSource,
    msg: Msg,
    policy: &ReconcilePolicy,
) -> (TrackedSource, Effect) {
    let effect = match msg {
        Msg::Begin { today } => {
            let Some(url) = row.url().map(ToOwned::to_owned) else {
                return (row, Effect::Done(RowOutcome::Untracked));
            };
            match &row.latest_job_id {
                // Never scheduled: the cooldown does not apply.
                None => Effect::ScheduleJob {
                    url,
                    previous_job_id: None,
                },
                Some(_) if policy.in_cooldown(&row, today) => {
                    Effect::Done(RowOutcome::SkippedCooldown)
                }
                Some(job_id) => Effect::RefreshStatus {
                    job_id: job_id.clone(),
                },
            }
        }
        Msg::StatusRefreshed(status) => {
            row.apply_status(&status);
            match (&row.status, row.url()) {
                (Some(CrawlStatus::Pending), _) => Effect::Done(RowOutcome::SkippedPending),
                (_, None) => Effect::Done(RowOutcome::Refreshed),
                (_, Some(url)) => Effect::ScheduleJob {
                    url: url.to_owned(),
                    previous_job_id: row.latest_job_id.clone(),
                },
            }
        }
        Msg::Scheduled { response, today } => {
            row.latest_schedule_message = Some(response.summary());
            match response.job_id {
                Some(job_id) if response.success => {
                    row.latest_job_id = Some(job_id.clone());
                    row.status = Some(CrawlStatus::Pending);
                    row.last_crawl = Some(today);
                    Effect::Done(RowOutcome::Scheduled { job_id })
                }
                _ => Effect::Done(RowOutcome::ScheduleRejected),
            }
        }
    };

    (row, effect)
}
