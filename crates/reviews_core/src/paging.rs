use std::ops::RangeInclusive;

pub const DEFAULT_REVIEWS_PER_PAGE: u32 = 500;

/// Last page that holds reviews according to the reported count.
pub fn last_page(review_count: u64, per_page: u32) -> u64 {
    review_count.div_ceil(u64::from(per_page.max(1)))
}

/// Pages to request for a job: every counted page plus one more, since the
/// reported count can lag behind the real result set.
pub fn page_plan(review_count: u64, per_page: u32) -> RangeInclusive<u64> {
    1..=last_page(review_count, per_page) + 1
}
