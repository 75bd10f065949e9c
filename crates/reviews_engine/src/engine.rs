use std::sync::Arc;

use chrono::{Local, NaiveDate};
use reviews_core::{
    normalize_optional_date, update, DateInput, Effect, JobId, JobStatus, Msg, ReconcilePolicy,
    ReconcileReport, Review, ReviewSet, RowOutcome, TrackedSource, DEFAULT_REVIEWS_PER_PAGE,
};
use reviews_logging::{reviews_debug, reviews_info};

use crate::{ApiError, ApiSettings, ReviewPager, ReviewsApi, ScheduleRequest};

/// Source of "today" for cooldown checks and crawl dates.
pub type TodayFn = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Clone)]
pub struct EngineConfig {
    pub policy: ReconcilePolicy,
    pub reviews_per_page: u32,
    pub today: TodayFn,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: ReconcilePolicy::default(),
            reviews_per_page: DEFAULT_REVIEWS_PER_PAGE,
            today: Arc::new(|| Local::now().date_naive()),
        }
    }
}

impl EngineConfig {
    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self {
            policy: settings.policy(),
            reviews_per_page: settings.reviews_per_page,
            ..Self::default()
        }
    }
}

/// Drives reconciliation passes over a tracked-source table.
///
/// Every remote call is awaited before the next one is issued and rows are
/// handled strictly in table order. The first error aborts the whole pass.
pub struct ReviewsEngine<A> {
    api: A,
    config: EngineConfig,
}

impl<A: ReviewsApi> ReviewsEngine<A> {
    pub fn new(api: A, config: EngineConfig) -> Self {
        Self { api, config }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    /// Status of `job_id` plus all its reviews once the job is complete.
    ///
    /// A job that is not complete, or has no reviews, yields an empty list
    /// without any page request.
    pub async fn get_job_reviews(
        &mut self,
        job_id: &JobId,
        from_date: Option<DateInput>,
    ) -> Result<(JobStatus, Vec<Review>), ApiError> {
        let from_date = normalize_optional_date(from_date)?;
        let status = self.api.get_job_status(job_id).await?;
        let reviews = self.reviews_for(job_id, &status, from_date).await?;
        Ok((status, reviews))
    }

    /// Refresh one row from the status of its latest job.
    pub async fn refresh_row(&mut self, row: &TrackedSource) -> Result<TrackedSource, ApiError> {
        let mut row = row.clone();
        if let Some(job_id) = row.latest_job_id.clone() {
            let status = self.api.get_job_status(&job_id).await?;
            row.apply_status(&status);
        }
        Ok(row)
    }

    /// Schedule or refresh every row; returns the updated table and what
    /// happened to each row. Rows without a URL are dropped.
    pub async fn schedule_job_list(
        &mut self,
        rows: &[TrackedSource],
    ) -> Result<(Vec<TrackedSource>, ReconcileReport), ApiError> {
        let today = (self.config.today)();
        let policy = self.config.policy;
        let mut table: Vec<TrackedSource> =
            rows.iter().filter(|row| row.has_url()).cloned().collect();
        let mut report = ReconcileReport::default();

        for row in table.iter_mut() {
            let label = row.url().unwrap_or_default().to_string();
            let (mut current, mut effect) = update(row.clone(), Msg::Begin { today }, &policy);
            let outcome = loop {
                match effect {
                    Effect::RefreshStatus { job_id } => {
                        let status = self.api.get_job_status(&job_id).await?;
                        (current, effect) = update(current, Msg::StatusRefreshed(status), &policy);
                    }
                    Effect::ScheduleJob {
                        url,
                        previous_job_id,
                    } => {
                        let request = ScheduleRequest::new(url).previous_job(previous_job_id);
                        let response = self.api.schedule_job(&request).await?;
                        (current, effect) =
                            update(current, Msg::Scheduled { response, today }, &policy);
                    }
                    Effect::Done(outcome) => break outcome,
                }
            };
            reviews_debug!("Row {} -> {:?}", label, outcome);
            *row = current;
            report.push(label, outcome);
        }

        reviews_info!(
            "Schedule pass over {} rows: {} scheduled, {} rejected, {} skipped",
            table.len(),
            report.scheduled(),
            report.rejected(),
            report.skipped()
        );
        Ok((table, report))
    }

    /// Refresh every row and merge the reviews of complete jobs into `history`.
    ///
    /// Fresh reviews from all rows are gathered first and merged once at the
    /// end; ids already in `history` are never replaced.
    pub async fn get_job_list_reviews(
        &mut self,
        rows: &[TrackedSource],
        history: &ReviewSet,
    ) -> Result<(Vec<TrackedSource>, ReviewSet, ReconcileReport), ApiError> {
        let mut table = rows.to_vec();
        let mut report = ReconcileReport::default();
        if table.is_empty() {
            reviews_info!("No jobs in the list");
            return Ok((table, history.clone(), report));
        }

        let mut fresh = Vec::new();
        for row in table.iter_mut() {
            let label = row.url().unwrap_or_default().to_string();
            let Some(job_id) = row.latest_job_id.clone() else {
                report.push(label, RowOutcome::Untracked);
                continue;
            };
            let status = self.api.get_job_status(&job_id).await?;
            row.apply_status(&status);
            fresh.extend(self.reviews_for(&job_id, &status, None).await?);
            report.push(label, RowOutcome::Refreshed);
        }

        if fresh.is_empty() {
            reviews_info!("No new reviews found");
            return Ok((table, history.clone(), report));
        }

        let mut merged = history.clone();
        let added = merged.merge(fresh);
        reviews_info!(
            "Merged {} new reviews, {} reviews in total",
            added,
            merged.len()
        );
        Ok((table, merged, report))
    }

    async fn reviews_for(
        &mut self,
        job_id: &JobId,
        status: &JobStatus,
        from_date: Option<String>,
    ) -> Result<Vec<Review>, ApiError> {
        if !status.has_reviews_ready() {
            reviews_debug!(
                "Job {} not ready (crawl_status={:?}, review_count={})",
                job_id,
                status.crawl_status,
                status.review_count()
            );
            return Ok(Vec::new());
        }
        ReviewPager::new(self.config.reviews_per_page)
            .with_from_date(from_date)
            .fetch(&mut self.api, job_id, status.review_count())
            .await
    }
}
