//! Courier core library
//!
//! This crate provides a resilient HTTP API client composed from three
//! explicit, independently constructible parts: a sliding-window rate
//! limiter, a TTL response cache, and a retrying call loop over an
//! abstract transport.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod ratelimit;
pub mod transport;

// Re-export commonly used types
pub use cache::{CacheEntry, CacheKey, CacheStatistics, ResponseCache};
pub use client::{ApiClient, BackoffStrategy, ConstantBackoff, ExponentialBackoff, PageConfig};
pub use config::{AuthConfig, ClientConfig, NetworkConfig, ResilienceConfig};
pub use error::{CourierError, CourierResult, ErrorClass};
pub use ratelimit::RateLimiter;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
