//! Resilience configuration (rate limiting, caching, retry)

use crate::error::{CourierError, CourierResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resilience configuration for rate limiting, caching, and retry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilienceConfig {
    /// Maximum admissions within the trailing 60-second window
    pub max_calls_per_minute: u32,
    /// Time-to-live for cached responses; zero disables caching
    #[serde(with = "humantime_serde")]
    pub cache_ttl: Duration,
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent retry
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
    /// Upper bound on any single backoff delay
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
    /// Add random jitter to backoff delays
    #[serde(default)]
    pub jitter: bool,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_calls_per_minute: 60,
            cache_ttl: Duration::from_secs(300),
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            jitter: false,
        }
    }
}

impl ResilienceConfig {
    /// Create a new resilience config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rolling per-minute admission quota
    pub fn with_max_calls_per_minute(mut self, max_calls: u32) -> Self {
        self.max_calls_per_minute = max_calls;
        self
    }

    /// Set the cache time-to-live; `Duration::ZERO` disables caching
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set maximum retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base backoff delay
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Set the backoff delay cap
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Enable or disable backoff jitter
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> CourierResult<()> {
        if self.max_calls_per_minute == 0 {
            return Err(CourierError::invalid_input_field(
                "max_calls_per_minute must be greater than zero",
                "max_calls_per_minute",
            ));
        }
        if self.base_delay.is_zero() {
            return Err(CourierError::invalid_input_field(
                "base_delay must be greater than zero",
                "base_delay",
            ));
        }
        Ok(())
    }

    /// Check whether response caching is enabled
    pub fn caching_enabled(&self) -> bool {
        !self.cache_ttl.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ResilienceConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.caching_enabled());
        assert!(!config.jitter);
    }

    #[test]
    fn test_zero_ttl_disables_caching() {
        let config = ResilienceConfig::default().with_cache_ttl(Duration::ZERO);
        assert!(config.validate().is_ok());
        assert!(!config.caching_enabled());
    }

    #[test]
    fn test_validation_rejects_zero_quota() {
        let config = ResilienceConfig::default().with_max_calls_per_minute(0);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, CourierError::InvalidInput { .. }));
    }
}
