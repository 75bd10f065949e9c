//! Reviews engine: Datashake API client, rate limiting, paging and the
//! reconciliation driver.
mod client;
mod engine;
mod limiter;
mod pager;
mod persist;
mod settings;
mod types;

pub use client::{DatashakeClient, ReviewsApi, AUTH_HEADER};
pub use engine::{EngineConfig, ReviewsEngine, TodayFn};
pub use limiter::RateLimiter;
pub use pager::ReviewPager;
pub use persist::{AtomicFileWriter, PersistError, TableStore};
pub use settings::{ApiSettings, API_KEY_LEN, DEFAULT_BASE_URL};
pub use types::{ApiError, PageEntry, PageRequest, ReviewPage, ScheduleRequest};
