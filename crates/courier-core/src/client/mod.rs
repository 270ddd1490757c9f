//! Retrying API client
//!
//! Composes the transport with admission control, response caching, and a
//! bounded exponential-backoff retry loop. The cache, limiter, and
//! transport are injected rather than inherited, so alternative transports
//! (including test mocks) drop in without subclass tricks.

mod backoff;
mod call;
mod error_check;
mod pagination;
mod retry;
mod types;

#[cfg(test)]
mod tests;

pub use backoff::{BackoffStrategy, ConstantBackoff, ExponentialBackoff};
pub use pagination::PageConfig;
pub use types::ApiClient;
