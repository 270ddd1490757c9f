//! Transport boundary
//!
//! The client consumes an abstract "perform HTTP request" capability; the
//! concrete reqwest-backed implementation lives in [`http`]. Tests mock the
//! trait instead of standing up a server.

mod http;
mod types;

pub use http::HttpTransport;
pub use types::{ApiRequest, ApiResponse, Method};

use crate::error::CourierResult;
use async_trait::async_trait;

/// Abstract HTTP transport
///
/// Implementations return `Ok` for any HTTP status; mapping statuses into
/// the error taxonomy is the client's concern. Errors are reserved for
/// failures to obtain a response at all (connect failures, timeouts).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a single HTTP request
    async fn perform(&self, request: &ApiRequest) -> CourierResult<ApiResponse>;
}
