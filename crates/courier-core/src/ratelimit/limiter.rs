//! Sliding-window rate limiter
//!
//! Admission control over a trailing window: at most `max_calls` admissions
//! are recorded within any window-sized span. Callers over the quota are
//! delayed until the oldest admission ages out.

use crate::error::{CourierError, CourierResult};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Sliding-window rate limiter
///
/// Cloning shares the underlying window, so clones coordinate admission
/// together. Independent instances never interfere.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Window size
    window: Duration,
    /// Maximum admissions per window
    max_calls: u32,
    /// Admission timestamps, oldest first
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(max_calls: u32, window: Duration) -> Self {
        Self {
            window,
            max_calls,
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Create with admissions per minute
    pub fn per_minute(max_calls: u32) -> Self {
        Self::new(max_calls, Duration::from_secs(60))
    }

    /// Record an admission, waiting as long as necessary
    ///
    /// Blocks the calling task only when admitting now would exceed the
    /// quota; the wait is the precise deficit until the oldest admission
    /// leaves the window, not the full window.
    pub async fn admit(&self) {
        // Infallible without a token.
        let _ = self.admit_inner(None).await;
    }

    /// Record an admission, waiting as long as necessary or until cancelled
    pub async fn admit_cancellable(&self, cancel: &CancellationToken) -> CourierResult<()> {
        self.admit_inner(Some(cancel)).await
    }

    /// Try to record an admission without waiting
    pub async fn try_admit(&self) -> bool {
        let mut timestamps = self.timestamps.lock().await;
        Self::prune(&mut timestamps, self.window);

        if timestamps.len() < self.max_calls as usize {
            timestamps.push_back(Instant::now());
            true
        } else {
            false
        }
    }

    async fn admit_inner(&self, cancel: Option<&CancellationToken>) -> CourierResult<()> {
        loop {
            if let Some(token) = cancel {
                if token.is_cancelled() {
                    return Err(CourierError::Cancelled);
                }
            }

            let wait = {
                let mut timestamps = self.timestamps.lock().await;
                Self::prune(&mut timestamps, self.window);

                if timestamps.len() < self.max_calls as usize {
                    timestamps.push_back(Instant::now());
                    return Ok(());
                }

                // Deficit until the oldest admission ages out. The lock is
                // released before sleeping and the quota re-checked after,
                // so concurrent callers cannot over-admit.
                match timestamps.front() {
                    Some(oldest) => self.window.saturating_sub(oldest.elapsed()),
                    None => Duration::ZERO,
                }
            };

            if wait.is_zero() {
                continue;
            }

            debug!(wait_ms = wait.as_millis() as u64, "rate limit reached, waiting");

            match cancel {
                Some(token) => {
                    tokio::select! {
                        _ = token.cancelled() => return Err(CourierError::Cancelled),
                        _ = sleep(wait) => {}
                    }
                }
                None => sleep(wait).await,
            }
        }
    }

    fn prune(timestamps: &mut VecDeque<Instant>, window: Duration) {
        let now = Instant::now();
        while let Some(front) = timestamps.front() {
            if now.duration_since(*front) >= window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Current admission count in the window
    pub async fn current_count(&self) -> usize {
        let mut timestamps = self.timestamps.lock().await;
        Self::prune(&mut timestamps, self.window);
        timestamps.len()
    }

    /// Check if the next admission would have to wait
    pub async fn is_limited(&self) -> bool {
        self.current_count().await >= self.max_calls as usize
    }

    /// Maximum admissions per window
    pub fn max_calls(&self) -> u32 {
        self.max_calls
    }

    /// Window size
    pub fn window(&self) -> Duration {
        self.window
    }
}
