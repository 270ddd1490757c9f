//! Retry loop for API requests

use super::types::ApiClient;
use crate::error::{CourierError, CourierResult};
use crate::transport::{ApiRequest, ApiResponse};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

impl ApiClient {
    /// Execute a request with admission control and retry
    ///
    /// The transport is invoked at most `max_retries + 1` times. Each
    /// attempt is separately admitted by the rate limiter. Retryable
    /// failures wait `base_delay * 2^attempt` (or the remote's
    /// `Retry-After` hint) before the next attempt; non-retryable failures
    /// surface immediately. Once the budget is exhausted the last cause is
    /// wrapped in a terminal `RequestFailed`.
    pub(super) async fn execute_with_retry(
        &self,
        request: &ApiRequest,
        cancel: Option<&CancellationToken>,
    ) -> CourierResult<ApiResponse> {
        let max_retries = self.config.resilience.max_retries;
        let mut last_error: Option<CourierError> = None;

        for attempt in 0..=max_retries {
            if let Some(token) = cancel {
                if token.is_cancelled() {
                    return Err(CourierError::Cancelled);
                }
            }

            match cancel {
                Some(token) => self.limiter.admit_cancellable(token).await?,
                None => self.limiter.admit().await,
            }

            let result = self
                .transport
                .perform(request)
                .await
                .and_then(|response| self.check_response(response));

            match result {
                Ok(response) => {
                    if attempt > 0 {
                        debug!(attempt, "request succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(error) => {
                    if !error.is_retryable() {
                        warn!(%error, "non-retryable error");
                        return Err(error);
                    }

                    if attempt < max_retries {
                        // A remote Retry-After hint overrides the computed
                        // backoff for this attempt.
                        let delay = error
                            .retry_after()
                            .unwrap_or_else(|| self.backoff.delay_for_attempt(attempt));

                        warn!(
                            attempt = attempt + 1,
                            max_attempts = max_retries + 1,
                            delay_secs = delay.as_secs_f64(),
                            error = %error,
                            "retrying after failure"
                        );

                        last_error = Some(error);

                        match cancel {
                            Some(token) => {
                                tokio::select! {
                                    _ = token.cancelled() => return Err(CourierError::Cancelled),
                                    _ = sleep(delay) => {}
                                }
                            }
                            None => sleep(delay).await,
                        }
                    } else {
                        warn!(attempts = max_retries + 1, error = %error, "retry budget exhausted");
                        last_error = Some(error);
                    }
                }
            }
        }

        let attempts = max_retries + 1;
        Err(CourierError::request_failed(
            attempts,
            last_error
                .unwrap_or_else(|| CourierError::transport("request failed without error detail")),
        ))
    }
}
