use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{CrawlStatus, JobId, JobStatus};

pub const DEFAULT_MIN_DAYS_SINCE_LAST_CRAWL: i64 = 3;

/// One row of the tracked-source table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackedSource {
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub latest_job_id: Option<JobId>,
    #[serde(default)]
    pub status: Option<CrawlStatus>,
    #[serde(default)]
    pub last_crawl: Option<NaiveDate>,
    #[serde(default)]
    pub latest_schedule_message: Option<String>,
}

/// Coarse lifecycle of a row, derived from its job id and last known status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPhase {
    Untracked,
    Pending,
    Complete,
    Error,
}

impl TrackedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// The row's URL, if it has a non-blank one.
    pub fn url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn has_url(&self) -> bool {
        self.url().is_some()
    }

    pub fn phase(&self) -> RowPhase {
        if self.latest_job_id.is_none() {
            return RowPhase::Untracked;
        }
        match &self.status {
            None | Some(CrawlStatus::Pending) | Some(CrawlStatus::InProgress) => RowPhase::Pending,
            Some(CrawlStatus::Complete) => RowPhase::Complete,
            Some(CrawlStatus::Other(_)) => RowPhase::Error,
        }
    }

    /// Copy the service's view of the latest job onto the row.
    ///
    /// Fields the service left empty keep their previous value.
    pub fn apply_status(&mut self, status: &JobStatus) {
        if let Some(source_name) = &status.source_name {
            self.website = Some(source_name.clone());
        }
        if let Some(source_url) = &status.source_url {
            self.url = Some(source_url.clone());
        }
        if let Some(crawl_status) = &status.crawl_status {
            self.status = Some(crawl_status.clone());
        }
        if let Some(last_crawl) = status.last_crawl {
            self.last_crawl = Some(last_crawl);
        }
    }

    /// Whole days between the last crawl and `today`, if the row was ever crawled.
    pub fn days_since_last_crawl(&self, today: NaiveDate) -> Option<i64> {
        self.last_crawl
            .map(|last_crawl| (today - last_crawl).num_days())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilePolicy {
    pub min_days_since_last_crawl: i64,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            min_days_since_last_crawl: DEFAULT_MIN_DAYS_SINCE_LAST_CRAWL,
        }
    }
}

impl ReconcilePolicy {
    pub(crate) fn in_cooldown(&self, row: &TrackedSource, today: NaiveDate) -> bool {
        row.days_since_last_crawl(today)
            .is_some_and(|days| days < self.min_days_since_last_crawl)
    }
}
