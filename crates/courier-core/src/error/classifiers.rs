//! Error classification for retry decisions

use super::types::CourierError;
use std::time::Duration;

/// Error classification for recovery decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient errors that may succeed on retry
    Transient,
    /// Permanent errors that will not succeed on retry
    Permanent,
    /// Unknown errors
    Unknown,
}

/// Classify an error into a recovery class
///
/// Network failures, timeouts, remote 429s, and 5xx responses are
/// transient. 4xx responses, configuration problems, and cancellation are
/// permanent.
pub fn classify_error(error: &CourierError) -> ErrorClass {
    match error {
        CourierError::Transport { .. }
        | CourierError::Timeout { .. }
        | CourierError::RateLimited { .. }
        | CourierError::Server { .. } => ErrorClass::Transient,
        CourierError::Client { .. }
        | CourierError::Config { .. }
        | CourierError::InvalidInput { .. }
        | CourierError::Json { .. }
        | CourierError::RequestFailed { .. }
        | CourierError::Cancelled => ErrorClass::Permanent,
        CourierError::Cache { .. } => ErrorClass::Unknown,
    }
}

impl CourierError {
    /// Check if this error should trigger an automatic retry
    pub fn is_retryable(&self) -> bool {
        classify_error(self) == ErrorClass::Transient
    }

    /// Suggested wait before the next attempt, when the remote provided one
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}
