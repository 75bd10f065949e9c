use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::date::deserialize_lenient_date;

/// Opaque job identifier assigned by the remote service.
///
/// The service sends ids as integers; tables written by hand often carry them
/// as text. Both deserialize here, and the id always serializes as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for JobId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u64),
            Float(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(value) => Ok(JobId::from(value)),
            // Spreadsheet round-trips turn `1234` into `1234.0`.
            Raw::Float(value) if value.fract() == 0.0 && value >= 0.0 => {
                Ok(JobId::from(value as u64))
            }
            Raw::Float(value) => Err(serde::de::Error::custom(format!(
                "job id must be an integer, got {value}"
            ))),
            Raw::Text(value) => Ok(JobId(value.trim().to_string())),
        }
    }
}

/// Provider-reported lifecycle stage of a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CrawlStatus {
    Pending,
    InProgress,
    Complete,
    Other(String),
}

impl CrawlStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CrawlStatus::Pending => "pending",
            CrawlStatus::InProgress => "in_progress",
            CrawlStatus::Complete => "complete",
            CrawlStatus::Other(other) => other,
        }
    }
}

impl From<String> for CrawlStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => CrawlStatus::Pending,
            "in_progress" => CrawlStatus::InProgress,
            "complete" => CrawlStatus::Complete,
            _ => CrawlStatus::Other(value),
        }
    }
}

impl From<&str> for CrawlStatus {
    fn from(value: &str) -> Self {
        CrawlStatus::from(value.to_string())
    }
}

impl From<CrawlStatus> for String {
    fn from(value: CrawlStatus) -> Self {
        match value {
            CrawlStatus::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status and metadata of one job, as returned by `/profiles/info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub success: bool,
    #[serde(default)]
    pub status: Option<u16>,
    pub job_id: JobId,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub review_count: Option<u64>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub last_crawl: Option<NaiveDate>,
    #[serde(default)]
    pub crawl_status: Option<CrawlStatus>,
    #[serde(default)]
    pub percentage_complete: Option<f64>,
    #[serde(default)]
    pub result_count: Option<u64>,
    #[serde(default)]
    pub credits_used: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub from_date: Option<NaiveDate>,
    #[serde(default)]
    pub place_id: Option<Value>,
    #[serde(default)]
    pub external_identifier: Option<Value>,
    #[serde(default)]
    pub meta_data: Option<Value>,
    #[serde(default)]
    pub unique_id: Option<Value>,
    #[serde(default)]
    pub blocks: Option<Value>,
}

impl JobStatus {
    pub fn review_count(&self) -> u64 {
        self.review_count.unwrap_or(0)
    }

    /// True when the job finished and has something to page through.
    pub fn has_reviews_ready(&self) -> bool {
        self.success
            && self.crawl_status == Some(CrawlStatus::Complete)
            && self.review_count() > 0
    }
}

/// Answer to a `/profiles/add` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub success: bool,
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ScheduleResponse {
    /// One-line rendition stored in the tracked-source table.
    pub fn summary(&self) -> String {
        let job = self
            .job_id
            .as_ref()
            .map(JobId::to_string)
            .unwrap_or_else(|| "-".to_string());
        let status = self
            .status
            .map(|code| code.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "success={} job_id={} status={} message={}",
            self.success,
            job,
            status,
            self.message.as_deref().unwrap_or("")
        )
    }
}

/// One review, keyed by the service-assigned `unique_id`.
///
/// Everything except the identity and the job echo is provider-specific and
/// kept verbatim in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub unique_id: String,
    pub job_id: JobId,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Review {
    /// Build a review from a raw record of a review page.
    ///
    /// Returns `None` when the record has no usable `unique_id`.
    pub fn from_record(
        job_id: JobId,
        source_name: Option<String>,
        mut record: Map<String, Value>,
    ) -> Option<Self> {
        let unique_id = match record.remove("unique_id")? {
            Value::String(text) if !text.is_empty() => text,
            Value::Number(number) => number.to_string(),
            _ => return None,
        };
        // The page-level echo wins over any per-record copy.
        record.remove("job_id");
        record.remove("source_name");
        Some(Self {
            unique_id,
            job_id,
            source_name,
            fields: record,
        })
    }
}
