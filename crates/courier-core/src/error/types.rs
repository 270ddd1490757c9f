//! Core error types for the courier client

use std::time::Duration;
use thiserror::Error;

/// Result type alias for courier operations
pub type CourierResult<T> = Result<T, CourierError>;

/// Main error type for the courier client
///
/// Retryable and non-retryable failures are distinguished by
/// [`CourierError::is_retryable`]; the retry loop absorbs retryable errors
/// up to its budget and always surfaces the rest.
#[derive(Error, Debug, Clone)]
pub enum CourierError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// Network or connection failure before a response was received
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Request exceeded its deadline
    #[error("Timeout: {message}")]
    Timeout { message: String },

    /// Remote replied 429 Too Many Requests
    #[error("Rate limited by remote")]
    RateLimited { retry_after: Option<Duration> },

    /// Remote replied with a 4xx status other than 429
    #[error("Client error {status}: {message}")]
    Client { status: u16, message: String },

    /// Remote replied with a 5xx status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Terminal failure after the retry budget was exhausted
    #[error("Request failed after {attempts} attempts: {source}")]
    RequestFailed {
        attempts: u32,
        #[source]
        source: Box<CourierError>,
    },

    /// Caller-initiated abort during a wait or backoff
    #[error("Request was cancelled")]
    Cancelled,

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// Cache errors
    #[error("Cache error: {message}")]
    Cache { message: String },
}
