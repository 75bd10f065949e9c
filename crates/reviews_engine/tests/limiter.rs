use std::time::Duration;

use reviews_engine::RateLimiter;
use tokio::time::{advance, Instant};

#[tokio::test(start_paused = true)]
async fn ceiling_within_one_window_never_waits() {
    let mut limiter = RateLimiter::new(10);
    let start = Instant::now();

    for _ in 0..10 {
        assert_eq!(limiter.throttle().await, Duration::ZERO);
    }

    assert_eq!(limiter.issued(), 10);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn request_past_the_ceiling_waits_for_window_plus_margin() {
    let mut limiter = RateLimiter::new(10);
    let start = Instant::now();
    for _ in 0..10 {
        limiter.throttle().await;
    }
    advance(Duration::from_millis(300)).await;

    let waited = limiter.throttle().await;

    assert_eq!(waited, Duration::from_millis(800));
    assert_eq!(start.elapsed(), Duration::from_millis(1100));
    // The delayed request opens a fresh window.
    assert_eq!(limiter.issued(), 1);
}

#[tokio::test(start_paused = true)]
async fn window_resets_after_one_second() {
    let mut limiter = RateLimiter::new(2);
    limiter.throttle().await;
    limiter.throttle().await;
    advance(Duration::from_millis(1001)).await;

    assert_eq!(limiter.throttle().await, Duration::ZERO);
    assert_eq!(limiter.issued(), 1);
    assert_eq!(limiter.throttle().await, Duration::ZERO);
    assert_eq!(limiter.issued(), 2);
}

#[tokio::test(start_paused = true)]
async fn zero_ceiling_is_clamped_to_one() {
    let mut limiter = RateLimiter::new(0);
    assert_eq!(limiter.throttle().await, Duration::ZERO);
    assert_eq!(limiter.throttle().await, Duration::from_millis(1100));
}
