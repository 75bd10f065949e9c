use std::time::Duration;

use reviews_logging::{reviews_trace, reviews_warn};
use tokio::time::{sleep, Instant};

const WINDOW: Duration = Duration::from_secs(1);
const SAFETY_MARGIN: Duration = Duration::from_millis(100);

/// Caps outbound requests at `max_per_window` per one-second window.
///
/// Single-owner by construction: [`RateLimiter::throttle`] takes `&mut self`.
#[derive(Debug)]
pub struct RateLimiter {
    max_per_window: u32,
    window_start: Option<Instant>,
    issued: u32,
}

impl RateLimiter {
    pub fn new(max_per_second: u32) -> Self {
        Self {
            max_per_window: max_per_second.max(1),
            window_start: None,
            issued: 0,
        }
    }

    /// Requests counted in the current window.
    pub fn issued(&self) -> u32 {
        self.issued
    }

    /// Call right before each request. Returns how long the caller was held back.
    pub async fn throttle(&mut self) -> Duration {
        let now = Instant::now();
        let Some(window_start) = self.window_start else {
            self.start_window(now);
            return Duration::ZERO;
        };

        let elapsed = now.saturating_duration_since(window_start);
        if elapsed > WINDOW {
            self.start_window(now);
            return Duration::ZERO;
        }
        if self.issued < self.max_per_window {
            self.issued += 1;
            reviews_trace!("Request {}/{} in window", self.issued, self.max_per_window);
            return Duration::ZERO;
        }

        let wait = WINDOW.saturating_sub(elapsed) + SAFETY_MARGIN;
        reviews_warn!(
            "API overload risk, waiting for {:.3} seconds",
            wait.as_secs_f64()
        );
        sleep(wait).await;
        self.start_window(Instant::now());
        wait
    }

    fn start_window(&mut self, now: Instant) {
        self.window_start = Some(now);
        self.issued = 1;
    }
}
