//! Backoff strategies for the retry loop

use std::time::Duration;

/// Backoff strategy trait
pub trait BackoffStrategy: Send + Sync {
    /// Get the delay for the given attempt number (0-indexed)
    fn delay_for_attempt(&self, attempt: u32) -> Duration;
}

/// Exponential backoff: `base * 2^attempt`, capped at `max_delay`
///
/// Jitter is off by default so that delays are exactly reproducible;
/// enable it when many clients share an upstream to avoid thundering
/// herds.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    base_delay: Duration,
    max_delay: Duration,
    jitter: bool,
    jitter_ratio: f64,
}

impl ExponentialBackoff {
    /// Create a new exponential backoff
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            base_delay,
            max_delay,
            jitter: false,
            jitter_ratio: 0.2,
        }
    }

    /// Enable jitter
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    fn add_jitter(&self, delay: Duration) -> Duration {
        if !self.jitter {
            return delay;
        }

        let range = delay.as_secs_f64() * self.jitter_ratio;
        Duration::from_secs_f64(delay.as_secs_f64() + rand_jitter(range))
    }
}

impl BackoffStrategy for ExponentialBackoff {
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(63);
        let raw = self.base_delay.as_secs_f64() * 2f64.powi(exponent as i32);
        let capped = Duration::from_secs_f64(raw.min(self.max_delay.as_secs_f64()));
        self.add_jitter(capped)
    }
}

/// Constant backoff: the same delay for all attempts
#[derive(Debug, Clone)]
pub struct ConstantBackoff {
    delay: Duration,
}

impl ConstantBackoff {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl BackoffStrategy for ConstantBackoff {
    fn delay_for_attempt(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

/// Simple time-seeded pseudo-random jitter generator
fn rand_jitter(range: f64) -> f64 {
    use std::time::SystemTime;

    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);

    let hash = nanos.wrapping_mul(2654435761);
    let normalized = (hash as f64) / (u32::MAX as f64);

    normalized * range
}
