//! Tests for the sliding-window rate limiter

use super::RateLimiter;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_admits_up_to_quota_immediately() {
    let limiter = RateLimiter::new(3, Duration::from_secs(60));

    for _ in 0..3 {
        assert!(limiter.try_admit().await);
    }

    // Fourth admission within the window is refused without waiting
    assert!(!limiter.try_admit().await);
    assert!(limiter.is_limited().await);
}

#[tokio::test]
async fn test_window_frees_slots() {
    let limiter = RateLimiter::new(2, Duration::from_millis(100));

    assert!(limiter.try_admit().await);
    assert!(limiter.try_admit().await);
    assert!(!limiter.try_admit().await);

    tokio::time::sleep(Duration::from_millis(120)).await;

    assert!(limiter.try_admit().await);
}

#[tokio::test]
async fn test_third_admit_blocks_for_remaining_window() {
    let window = Duration::from_millis(200);
    let limiter = RateLimiter::new(2, window);

    let start = Instant::now();
    limiter.admit().await;
    limiter.admit().await;
    // The first two are immediate.
    assert!(start.elapsed() < Duration::from_millis(50));

    // The third must wait until the oldest admission leaves the window.
    limiter.admit().await;
    assert!(start.elapsed() >= window);
}

#[tokio::test]
async fn test_no_window_exceeds_quota_under_concurrency() {
    let window = Duration::from_millis(100);
    let max_calls = 3u32;
    let limiter = RateLimiter::new(max_calls, window);

    let mut handles = Vec::new();
    for _ in 0..9 {
        let limiter = limiter.clone();
        handles.push(tokio::spawn(async move {
            limiter.admit().await;
            Instant::now()
        }));
    }

    let mut admissions = Vec::new();
    for handle in handles {
        admissions.push(handle.await.unwrap());
    }
    admissions.sort();

    // Any run of max_calls + 1 consecutive admissions must span more than
    // the window, otherwise some window held too many. A small tolerance
    // absorbs scheduler skew between the admit and the timestamp capture.
    let tolerance = Duration::from_millis(10);
    for pair in admissions.windows(max_calls as usize + 1) {
        let span = pair[max_calls as usize].duration_since(pair[0]);
        assert!(
            span + tolerance >= window,
            "quota exceeded: {} admissions within {:?}",
            max_calls + 1,
            span
        );
    }
}

#[tokio::test]
async fn test_cancellation_during_wait() {
    let limiter = RateLimiter::new(1, Duration::from_secs(60));
    limiter.admit().await;

    let token = CancellationToken::new();
    let waiting = {
        let limiter = limiter.clone();
        let token = token.clone();
        tokio::spawn(async move { limiter.admit_cancellable(&token).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    token.cancel();

    let result = waiting.await.unwrap();
    assert!(matches!(
        result,
        Err(crate::error::CourierError::Cancelled)
    ));
}

#[tokio::test]
async fn test_pre_cancelled_token_skips_waiting() {
    let limiter = RateLimiter::new(1, Duration::from_secs(60));
    limiter.admit().await;

    let token = CancellationToken::new();
    token.cancel();

    let start = Instant::now();
    let result = limiter.admit_cancellable(&token).await;
    assert!(result.is_err());
    assert!(start.elapsed() < Duration::from_millis(50));
}

#[tokio::test]
async fn test_independent_instances_do_not_interfere() {
    let a = RateLimiter::new(1, Duration::from_secs(60));
    let b = RateLimiter::new(1, Duration::from_secs(60));

    assert!(a.try_admit().await);
    assert!(!a.try_admit().await);

    // b has its own window
    assert!(b.try_admit().await);
}

#[tokio::test]
async fn test_clone_shares_window() {
    let a = RateLimiter::new(2, Duration::from_secs(60));
    let b = a.clone();

    assert!(a.try_admit().await);
    assert!(b.try_admit().await);
    assert!(!a.try_admit().await);
    assert_eq!(a.current_count().await, 2);
    assert_eq!(b.current_count().await, 2);
}

#[tokio::test]
async fn test_accessors() {
    let limiter = RateLimiter::per_minute(42);
    assert_eq!(limiter.max_calls(), 42);
    assert_eq!(limiter.window(), Duration::from_secs(60));
    assert_eq!(limiter.current_count().await, 0);
}
