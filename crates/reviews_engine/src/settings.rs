use std::fmt;
use std::time::Duration;

use reviews_core::{ReconcilePolicy, DEFAULT_MIN_DAYS_SINCE_LAST_CRAWL, DEFAULT_REVIEWS_PER_PAGE};

use crate::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://app.datashake.com/api/v2";
pub const API_KEY_LEN: usize = 40;

/// Construction-time configuration of a [`crate::DatashakeClient`].
#[derive(Clone)]
pub struct ApiSettings {
    pub api_key: String,
    pub max_requests_per_second: u32,
    pub language_code: String,
    pub allow_response: bool,
    pub min_days_since_last_crawl: i64,
    pub reviews_per_page: u32,
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ApiSettings {
    /// Settings with every default filled in. Fails unless `api_key` is
    /// exactly [`API_KEY_LEN`] characters long.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ApiError> {
        let settings = Self {
            api_key: api_key.into(),
            max_requests_per_second: 10,
            language_code: "en".to_string(),
            allow_response: true,
            min_days_since_last_crawl: DEFAULT_MIN_DAYS_SINCE_LAST_CRAWL,
            reviews_per_page: DEFAULT_REVIEWS_PER_PAGE,
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let key_len = self.api_key.chars().count();
        if key_len != API_KEY_LEN {
            return Err(ApiError::InvalidArgument(format!(
                "api_key must be {API_KEY_LEN} symbols long, the key provided was {key_len} symbols long"
            )));
        }
        if self.max_requests_per_second == 0 {
            return Err(ApiError::InvalidArgument(
                "max_requests_per_second must be at least 1".to_string(),
            ));
        }
        if self.reviews_per_page == 0 {
            return Err(ApiError::InvalidArgument(
                "reviews_per_page must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn policy(&self) -> ReconcilePolicy {
        ReconcilePolicy {
            min_days_since_last_crawl: self.min_days_since_last_crawl,
        }
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSettings")
            .field("api_key", &"<redacted>")
            .field("max_requests_per_second", &self.max_requests_per_second)
            .field("language_code", &self.language_code)
            .field("allow_response", &self.allow_response)
            .field("min_days_since_last_crawl", &self.min_days_since_last_crawl)
            .field("reviews_per_page", &self.reviews_per_page)
            .field("base_url", &self.base_url)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
