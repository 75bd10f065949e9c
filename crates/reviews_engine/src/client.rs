use reqwest::{Method, Url};
use reviews_core::{JobId, JobStatus, ScheduleResponse};
use reviews_logging::{reviews_debug, reviews_info};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{ApiError, ApiSettings, PageRequest, RateLimiter, ReviewPage, ScheduleRequest};

/// Header carrying the API key on every request.
pub const AUTH_HEADER: &str = "spiderman-token";

const SCHEDULE_PATH: &str = "/profiles/add";
const STATUS_PATH: &str = "/profiles/info";
const REVIEWS_PATH: &str = "/profiles/reviews";

/// The three remote operations the reconciler and pager rely on.
#[async_trait::async_trait]
pub trait ReviewsApi: Send {
    async fn schedule_job(&mut self, request: &ScheduleRequest)
        -> Result<ScheduleResponse, ApiError>;

    async fn get_job_status(&mut self, job_id: &JobId) -> Result<JobStatus, ApiError>;

    async fn get_review_page(&mut self, request: &PageRequest) -> Result<ReviewPage, ApiError>;
}

/// `reqwest`-backed client for the Datashake reviews API.
pub struct DatashakeClient {
    http: reqwest::Client,
    settings: ApiSettings,
    limiter: RateLimiter,
}

impl DatashakeClient {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        settings.validate()?;
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Connection {
                status: None,
                reason: err.to_string(),
                url: settings.base_url.clone(),
            })?;
        let limiter = RateLimiter::new(settings.max_requests_per_second);
        Ok(Self {
            http,
            settings,
            limiter,
        })
    }

    /// Throttle, send, and return the body of a 2xx answer.
    async fn send(
        &mut self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(String, String), ApiError> {
        let endpoint = self.settings.endpoint(path);
        let url = Url::parse_with_params(&endpoint, params).map_err(|err| {
            ApiError::InvalidArgument(format!("invalid endpoint {endpoint}: {err}"))
        })?;

        self.limiter.throttle().await;
        let response = self
            .http
            .request(method, url)
            .header(AUTH_HEADER, &self.settings.api_key)
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, &endpoint))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Connection {
                status: Some(status.as_u16()),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                url: endpoint,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| map_reqwest_error(err, &endpoint))?;
        Ok((endpoint, body))
    }
}

#[async_trait::async_trait]
impl ReviewsApi for DatashakeClient {
    async fn schedule_job(
        &mut self,
        request: &ScheduleRequest,
    ) -> Result<ScheduleResponse, ApiError> {
        let mut params = vec![("url", request.url.clone())];
        if let Some(from_date) = &request.from_date {
            params.push(("from_date", from_date.clone()));
        }
        if let Some(previous) = &request.previous_job_id {
            params.push(("diff", previous.to_string()));
        }

        let (endpoint, body) = self.send(Method::POST, SCHEDULE_PATH, &params).await?;
        let response: ScheduleResponse = decode(&body, None, &endpoint)?;
        reviews_info!(
            "Scheduled {} success={} job_id={:?} message={:?}",
            request.url,
            response.success,
            response.job_id,
            response.message
        );
        Ok(response)
    }

    async fn get_job_status(&mut self, job_id: &JobId) -> Result<JobStatus, ApiError> {
        let params = [("job_id", job_id.to_string())];
        let (endpoint, body) = self.send(Method::GET, STATUS_PATH, &params).await?;

        let raw: Value = decode(&body, Some(job_id), &endpoint)?;
        if raw.get("success") == Some(&Value::Bool(false)) {
            return Err(ApiError::Response {
                body,
                job_id: Some(job_id.clone()),
                url: endpoint,
            });
        }
        let status: JobStatus = serde_json::from_value(raw).map_err(|err| ApiError::Response {
            body: format!("{body} ({err})"),
            job_id: Some(job_id.clone()),
            url: endpoint.clone(),
        })?;
        reviews_debug!(
            "Job {} status={:?} review_count={}",
            job_id,
            status.crawl_status,
            status.review_count()
        );
        Ok(status)
    }

    async fn get_review_page(&mut self, request: &PageRequest) -> Result<ReviewPage, ApiError> {
        let mut params = vec![
            ("job_id", request.job_id.to_string()),
            ("language_code", self.settings.language_code.clone()),
            ("page", request.page.to_string()),
            ("per_page", request.per_page.to_string()),
            (
                "allow_response",
                python_bool(self.settings.allow_response).to_string(),
            ),
        ];
        if let Some(from_date) = &request.from_date {
            params.push(("from_date", from_date.clone()));
        }

        let (endpoint, body) = self.send(Method::GET, REVIEWS_PATH, &params).await?;
        let mut page: ReviewPage = decode(&body, Some(&request.job_id), &endpoint)?;
        page.url = endpoint;
        Ok(page)
    }
}

fn decode<T: DeserializeOwned>(
    body: &str,
    job_id: Option<&JobId>,
    url: &str,
) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::Response {
        body: format!("{body} ({err})"),
        job_id: job_id.cloned(),
        url: url.to_string(),
    })
}

// The service expects the capitalised spelling.
fn python_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn map_reqwest_error(err: reqwest::Error, url: &str) -> ApiError {
    let reason = if err.is_timeout() {
        format!("timeout: {err}")
    } else {
        err.to_string()
    };
    ApiError::Connection {
        status: err.status().map(|status| status.as_u16()),
        reason,
        url: url.to_string(),
    }
}
