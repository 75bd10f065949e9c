use crate::JobId;

/// What one reconciliation pass did with a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Scheduled { job_id: JobId },
    ScheduleRejected,
    SkippedCooldown,
    SkippedPending,
    Refreshed,
    Untracked,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    pub rows: Vec<(String, RowOutcome)>,
}

impl ReconcileReport {
    pub fn push(&mut self, url: impl Into<String>, outcome: RowOutcome) {
        self.rows.push((url.into(), outcome));
    }

    pub fn scheduled(&self) -> usize {
        self.count(|outcome| matches!(outcome, RowOutcome::Scheduled { .. }))
    }

    pub fn rejected(&self) -> usize {
        self.count(|outcome| matches!(outcome, RowOutcome::ScheduleRejected))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| {
            matches!(
                outcome,
                RowOutcome::SkippedCooldown | RowOutcome::SkippedPending
            )
        })
    }

    fn count(&self, predicate: impl Fn(&RowOutcome) -> bool) -> usize {
        self.rows
            .iter()
            .filter(|(_, outcome)| predicate(outcome))
            .count()
    }
}
