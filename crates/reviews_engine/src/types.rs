use reviews_core::{normalize_optional_date, DateError, DateInput, JobId, Review};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("API Connection Error. Error code: {} - {reason}. URL: {url}", display_status(.status))]
    Connection {
        status: Option<u16>,
        reason: String,
        url: String,
    },
    #[error("API Response Error. {body}. Job ID: {}. URL: {url}", display_job(.job_id))]
    Response {
        body: String,
        job_id: Option<JobId>,
        url: String,
    },
}

fn display_status(status: &Option<u16>) -> String {
    status
        .map(|code| code.to_string())
        .unwrap_or_else(|| "none".to_string())
}

fn display_job(job_id: &Option<JobId>) -> String {
    job_id
        .as_ref()
        .map(JobId::to_string)
        .unwrap_or_else(|| "none".to_string())
}

impl From<DateError> for ApiError {
    fn from(err: DateError) -> Self {
        ApiError::InvalidArgument(err.to_string())
    }
}

/// Parameters of a `/profiles/add` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub url: String,
    pub from_date: Option<String>,
    pub previous_job_id: Option<JobId>,
}

impl ScheduleRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            from_date: None,
            previous_job_id: None,
        }
    }

    /// Only collect reviews on or after `from_date`.
    pub fn from_date(mut self, from_date: impl Into<DateInput>) -> Result<Self, ApiError> {
        self.from_date = normalize_optional_date(Some(from_date))?;
        Ok(self)
    }

    /// Crawl only the delta since `previous_job_id`.
    pub fn previous_job(mut self, previous_job_id: Option<JobId>) -> Self {
        self.previous_job_id = previous_job_id;
        self
    }
}

/// Parameters of a `/profiles/reviews` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub job_id: JobId,
    pub page: u64,
    pub per_page: u32,
    pub from_date: Option<String>,
}

/// One object of a review page body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageEntry {
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default, deserialize_with = "nullable_records")]
    pub reviews: Vec<Map<String, Value>>,
}

fn nullable_records<'de, D>(deserializer: D) -> Result<Vec<Map<String, Value>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// A decoded review page.
///
/// The live service answers with a single object; a list of such objects is
/// accepted as well.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReviewPage {
    pub entries: Vec<PageEntry>,
    /// Endpoint the page was read from; not part of the body.
    pub url: String,
}

impl<'de> Deserialize<'de> for ReviewPage {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Body {
            Many(Vec<PageEntry>),
            One(PageEntry),
        }

        let entries = match Body::deserialize(deserializer)? {
            Body::Many(entries) => entries,
            Body::One(entry) => vec![entry],
        };
        Ok(Self {
            entries,
            url: String::new(),
        })
    }
}

impl ReviewPage {
    pub fn review_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.reviews.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.review_count() == 0
    }

    /// Flatten the page into reviews, tagging each with the job echo.
    ///
    /// Returns the offending record when one has no `unique_id`.
    pub fn into_reviews(self, requested: &JobId) -> Result<Vec<Review>, Map<String, Value>> {
        let mut reviews = Vec::with_capacity(self.review_count());
        for entry in self.entries {
            let job_id = entry.job_id.unwrap_or_else(|| requested.clone());
            for record in entry.reviews {
                match Review::from_record(job_id.clone(), entry.source_name.clone(), record.clone()) {
                    Some(review) => reviews.push(review),
                    None => return Err(record),
                }
            }
        }
        Ok(reviews)
    }
}
