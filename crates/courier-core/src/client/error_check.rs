//! Response status classification

use super::types::ApiClient;
use crate::error::{CourierError, CourierResult};
use crate::transport::ApiResponse;

impl ApiClient {
    /// Map a transport response into the error taxonomy
    ///
    /// - 2xx passes through unchanged
    /// - 429 becomes a retryable rate-limit error carrying any
    ///   `Retry-After` hint
    /// - other 4xx become terminal client errors
    /// - 5xx become retryable server errors
    pub(super) fn check_response(&self, response: ApiResponse) -> CourierResult<ApiResponse> {
        match response.status {
            429 => Err(CourierError::rate_limited(response.retry_after())),
            status @ 400..=499 => Err(CourierError::client(status, body_snippet(&response))),
            status @ 500..=599 => Err(CourierError::server(status, body_snippet(&response))),
            _ => Ok(response),
        }
    }
}

/// First line of the body, truncated, for error messages
fn body_snippet(response: &ApiResponse) -> String {
    let text = response.text();
    let line = text.lines().next().unwrap_or("");
    let mut snippet: String = line.chars().take(200).collect();
    if snippet.is_empty() {
        snippet = "<empty body>".to_string();
    }
    snippet
}
