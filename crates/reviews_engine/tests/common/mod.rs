#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Once;

use reviews_core::{CrawlStatus, JobId, JobStatus, ScheduleResponse};
use reviews_engine::{ApiError, PageEntry, PageRequest, ReviewPage, ReviewsApi, ScheduleRequest};
use serde_json::{json, Map, Value};

pub const API_KEY: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(reviews_logging::initialize_for_tests);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Schedule(ScheduleRequest),
    Status(JobId),
    Page { job_id: JobId, page: u64 },
}

/// In-memory stand-in for the remote service that records every call.
#[derive(Default)]
pub struct FakeApi {
    pub calls: Vec<Call>,
    pub statuses: HashMap<JobId, JobStatus>,
    pub pages: HashMap<(JobId, u64), Vec<Map<String, Value>>>,
    pub next_job_id: u64,
    pub reject_schedules: bool,
    pub failing_status: Option<JobId>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            next_job_id: 100,
            ..Self::default()
        }
    }

    pub fn with_status(mut self, job_id: &str, crawl_status: CrawlStatus, review_count: u64) -> Self {
        self.statuses
            .insert(JobId::new(job_id), job_status(job_id, crawl_status, review_count));
        self
    }

    /// Register `count` reviews for `page`, ids `{prefix}-{n}`.
    pub fn with_page(mut self, job_id: &str, page: u64, prefix: &str, count: usize) -> Self {
        let records = (0..count)
            .map(|n| {
                json!({ "unique_id": format!("{prefix}-{n}"), "rating_value": 5 })
                    .as_object()
                    .cloned()
                    .unwrap()
            })
            .collect();
        self.pages.insert((JobId::new(job_id), page), records);
        self
    }

    pub fn page_calls(&self) -> Vec<u64> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Page { page, .. } => Some(*page),
                _ => None,
            })
            .collect()
    }

    pub fn schedule_calls(&self) -> Vec<ScheduleRequest> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Schedule(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }
}

pub fn job_status(job_id: &str, crawl_status: CrawlStatus, review_count: u64) -> JobStatus {
    serde_json::from_value(json!({
        "success": true,
        "status": 200,
        "job_id": job_id,
        "source_url": "https://example.com/reviews",
        "source_name": "trustpilot",
        "review_count": review_count,
        "last_crawl": "2021-10-01",
        "crawl_status": crawl_status,
    }))
    .unwrap()
}

#[async_trait::async_trait]
impl ReviewsApi for FakeApi {
    async fn schedule_job(
        &mut self,
        request: &ScheduleRequest,
    ) -> Result<ScheduleResponse, ApiError> {
        self.calls.push(Call::Schedule(request.clone()));
        if self.reject_schedules {
            return Ok(ScheduleResponse {
                success: false,
                job_id: None,
                status: Some(400),
                message: Some("rejected".into()),
            });
        }
        self.next_job_id += 1;
        Ok(ScheduleResponse {
            success: true,
            job_id: Some(JobId::from(self.next_job_id)),
            status: Some(200),
            message: Some("Added this profile to the queue...".into()),
        })
    }

    async fn get_job_status(&mut self, job_id: &JobId) -> Result<JobStatus, ApiError> {
        self.calls.push(Call::Status(job_id.clone()));
        if self.failing_status.as_ref() == Some(job_id) {
            return Err(ApiError::Connection {
                status: Some(500),
                reason: "Internal Server Error".into(),
                url: "fake://profiles/info".into(),
            });
        }
        self.statuses
            .get(job_id)
            .cloned()
            .ok_or_else(|| ApiError::Response {
                body: r#"{"success":false}"#.into(),
                job_id: Some(job_id.clone()),
                url: "fake://profiles/info".into(),
            })
    }

    async fn get_review_page(&mut self, request: &PageRequest) -> Result<ReviewPage, ApiError> {
        self.calls.push(Call::Page {
            job_id: request.job_id.clone(),
            page: request.page,
        });
        let reviews = self
            .pages
            .get(&(request.job_id.clone(), request.page))
            .cloned()
            .unwrap_or_default();
        Ok(ReviewPage {
            entries: vec![PageEntry {
                job_id: Some(request.job_id.clone()),
                source_name: Some("trustpilot".into()),
                reviews,
            }],
            url: "fake://profiles/reviews".into(),
        })
    }
}
