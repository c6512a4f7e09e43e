use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

use crate::{
    decode::extract_candidate_text,
    transport::{HttpRequest, HttpTransport, ReqwestTransport, Sleeper, TokioSleeper},
    CallerError, CallerOptions, ErrorKind, Outcome, RetryOn,
};

/// Sends a request with bounded exponential-backoff retries and turns the
/// result into an [`Outcome`].
///
/// Attempts are strictly sequential. The delay before the retry that follows
/// attempt `k` (0-indexed) is `retry_backoff_ms * 2^k`.
#[derive(Clone)]
pub struct ResilientCaller {
    transport: Arc<dyn HttpTransport>,
    sleeper: Arc<dyn Sleeper>,
    options: CallerOptions,
}

impl fmt::Debug for ResilientCaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResilientCaller")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for ResilientCaller {
    fn default() -> Self {
        Self::new(ReqwestTransport::default())
    }
}

impl ResilientCaller {
    /// Creates a caller over `transport` that sleeps with tokio's timer.
    pub fn new(transport: impl HttpTransport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            sleeper: Arc::new(TokioSleeper),
            options: CallerOptions::default(),
        }
    }

    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    pub fn with_transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    /// Applies timeout and retry options.
    pub fn with_options(mut self, opts: CallerOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn options(&self) -> &CallerOptions {
        &self.options
    }

    pub async fn call(&self, request: &HttpRequest) -> Outcome {
        self.call_from_with_cancel(request, 0, &CancellationToken::new())
            .await
    }

    /// Resumes a logical call at `attempt`.
    ///
    /// `attempt` is clamped to `max_retries`, so at least one request is
    /// always issued.
    pub async fn call_from(&self, request: &HttpRequest, attempt: usize) -> Outcome {
        self.call_from_with_cancel(request, attempt, &CancellationToken::new())
            .await
    }

    pub async fn call_with_cancel(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Outcome {
        self.call_from_with_cancel(request, 0, cancel).await
    }

    /// Runs the retry loop. Cancellation is checked while waiting on the
    /// network and while backing off.
    pub async fn call_from_with_cancel(
        &self,
        request: &HttpRequest,
        attempt: usize,
        cancel: &CancellationToken,
    ) -> Outcome {
        let max_retries = self.options.max_retries;
        let timeout = Duration::from_millis(self.options.timeout_ms);
        let first_attempt = attempt.min(max_retries);
        let mut attempt = first_attempt;

        loop {
            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Self::cancelled(attempt),
                response = self.transport.send(request, timeout) => response,
            };

            let err = match response {
                Ok(response) if response.is_success() => {
                    return match extract_candidate_text(&response.body) {
                        Ok(text) => Outcome::Success(text),
                        Err(err) => Self::unexpected(err),
                    };
                }
                Ok(response) => {
                    let retryable = self.should_retry_status(response.status);
                    let err = response.into_error();
                    if !retryable {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(attempt, error = %err, "request rejected");
                        return Outcome::failure(ErrorKind::Rejected, err.to_string());
                    }
                    err
                }
                Err(err) if err.is_transient() => err,
                Err(err) => return Self::unexpected(err),
            };

            if attempt >= max_retries {
                let attempts = attempt - first_attempt + 1;
                #[cfg(feature = "tracing")]
                tracing::warn!(attempts, error = %err, "retries exhausted");
                let noun = if attempts == 1 { "attempt" } else { "attempts" };
                return Outcome::failure(
                    ErrorKind::Exhausted,
                    format!("{err} after {attempts} {noun}"),
                );
            }

            let delay = self.backoff_delay(attempt);
            #[cfg(feature = "tracing")]
            tracing::debug!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "retrying request"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Self::cancelled(attempt),
                _ = self.sleeper.sleep(delay) => {}
            }
            attempt += 1;
        }
    }

    /// Delay before the retry that follows `attempt`.
    pub fn backoff_delay(&self, attempt: usize) -> Duration {
        let exp = attempt.min(16) as u32;
        let multiplier = 1u64 << exp;
        Duration::from_millis(self.options.retry_backoff_ms.saturating_mul(multiplier))
    }

    fn should_retry_status(&self, status: StatusCode) -> bool {
        match self.options.retry_on {
            RetryOn::AnyNonSuccess => !status.is_success(),
            RetryOn::Transient => matches!(
                status,
                StatusCode::TOO_MANY_REQUESTS
                    | StatusCode::INTERNAL_SERVER_ERROR
                    | StatusCode::BAD_GATEWAY
                    | StatusCode::SERVICE_UNAVAILABLE
                    | StatusCode::GATEWAY_TIMEOUT
            ),
        }
    }

    fn unexpected(err: CallerError) -> Outcome {
        #[cfg(feature = "tracing")]
        tracing::warn!(error = %err, "request failed unexpectedly");
        Outcome::failure(ErrorKind::Unexpected, err.to_string())
    }

    fn cancelled(_attempt: usize) -> Outcome {
        #[cfg(feature = "tracing")]
        tracing::warn!(attempt = _attempt, "request cancelled");
        Outcome::failure(ErrorKind::Cancelled, "request cancelled")
    }
}
