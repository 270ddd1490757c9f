//! API client type definition and construction

use super::backoff::{BackoffStrategy, ExponentialBackoff};
use crate::cache::ResponseCache;
use crate::config::ClientConfig;
use crate::error::CourierResult;
use crate::ratelimit::RateLimiter;
use crate::transport::{HttpTransport, Transport};
use std::sync::Arc;

/// Retrying API client
///
/// Composes an abstract transport with a sliding-window rate limiter, a
/// TTL response cache, and exponential-backoff retries. Every part is an
/// explicit value: multiple clients (e.g. one per upstream host) never
/// share state unless handed the same limiter or cache.
pub struct ApiClient {
    pub(super) config: ClientConfig,
    pub(super) transport: Arc<dyn Transport>,
    pub(super) limiter: RateLimiter,
    pub(super) cache: ResponseCache,
    pub(super) backoff: Arc<dyn BackoffStrategy>,
}

impl ApiClient {
    /// Create a client with the reqwest-backed transport
    pub fn new(config: ClientConfig) -> CourierResult<Self> {
        let transport = Arc::new(HttpTransport::new(
            config.network.clone(),
            config.auth.clone(),
        )?);
        Self::with_transport(config, transport)
    }

    /// Create a client over a caller-supplied transport
    ///
    /// This is the composition seam: tests inject a mock here, and callers
    /// with special transport needs (proxying, recording) do the same.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> CourierResult<Self> {
        config.validate()?;

        let resilience = &config.resilience;
        let limiter = RateLimiter::per_minute(resilience.max_calls_per_minute);
        let backoff = Arc::new(
            ExponentialBackoff::new(resilience.base_delay, resilience.max_delay)
                .with_jitter(resilience.jitter),
        );

        Ok(Self {
            config,
            transport,
            limiter,
            cache: ResponseCache::new(),
            backoff,
        })
    }

    /// Replace the backoff strategy
    pub fn with_backoff<B: BackoffStrategy + 'static>(mut self, backoff: B) -> Self {
        self.backoff = Arc::new(backoff);
        self
    }

    /// Share a rate limiter with another client
    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Share a response cache with another client
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = cache;
        self
    }

    /// The active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The rate limiter admitting this client's calls
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// The response cache backing this client
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}
