use reviews_core::{page_plan, JobId, Review, DEFAULT_REVIEWS_PER_PAGE};
use reviews_logging::reviews_debug;

use crate::{ApiError, PageRequest, ReviewsApi};

/// Pulls every page of a finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPager {
    per_page: u32,
    from_date: Option<String>,
}

impl Default for ReviewPager {
    fn default() -> Self {
        Self::new(DEFAULT_REVIEWS_PER_PAGE)
    }
}

impl ReviewPager {
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page: per_page.max(1),
            from_date: None,
        }
    }

    /// Restrict every page request to reviews on or after an already
    /// normalized `YYYY-MM-DD` date.
    pub fn with_from_date(mut self, from_date: Option<String>) -> Self {
        self.from_date = from_date;
        self
    }

    /// Fetch pages `1..=last + 1` for `job_id`, stopping at the first empty one.
    ///
    /// Reviews come back in page order; ids are not deduplicated here.
    pub async fn fetch<A: ReviewsApi + ?Sized>(
        &self,
        api: &mut A,
        job_id: &JobId,
        review_count: u64,
    ) -> Result<Vec<Review>, ApiError> {
        let mut reviews = Vec::new();
        for page in page_plan(review_count, self.per_page) {
            let request = PageRequest {
                job_id: job_id.clone(),
                page,
                per_page: self.per_page,
                from_date: self.from_date.clone(),
            };
            let body = api.get_review_page(&request).await?;
            if body.is_empty() {
                reviews_debug!("Job {} page {} is empty, stopping", job_id, page);
                break;
            }
            reviews_debug!(
                "Job {} page {} returned {} reviews",
                job_id,
                page,
                body.review_count()
            );
            let url = body.url.clone();
            let page_reviews = body.into_reviews(job_id).map_err(|record| ApiError::Response {
                body: format!(
                    "review without unique_id on page {page}: {}",
                    serde_json::Value::Object(record)
                ),
                job_id: Some(job_id.clone()),
                url,
            })?;
            reviews.extend(page_reviews);
        }
        Ok(reviews)
    }
}
