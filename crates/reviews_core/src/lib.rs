//! Reviews core: data model, per-row reconciliation state machine and review merging.
mod date;
mod effect;
mod merge;
mod model;
mod msg;
mod paging;
mod report;
mod state;
mod update;

pub use date::{normalize_date, normalize_optional_date, DateError, DateInput};
pub use effect::Effect;
pub use merge::ReviewSet;
pub use model::{CrawlStatus, JobId, JobStatus, Review, ScheduleResponse};
pub use msg::Msg;
pub use paging::{last_page, page_plan, DEFAULT_REVIEWS_PER_PAGE};
pub use report::{ReconcileReport, RowOutcome};
pub use state::{ReconcilePolicy, RowPhase, TrackedSource, DEFAULT_MIN_DAYS_SINCE_LAST_CRAWL};
pub use update::update;
