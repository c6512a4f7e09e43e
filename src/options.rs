/// Which non-success HTTP statuses are retried.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RetryOn {
    /// Retry only rate limiting (429) and server-side failures
    /// (500, 502, 503, 504). Other statuses fail fast as
    /// [`crate::ErrorKind::Rejected`].
    #[default]
    Transient,
    /// Retry every non-2xx status, client errors included.
    ///
    /// A 400 caused by a bad request is sent again until the retry budget is
    /// spent.
    AnyNonSuccess,
}

/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallerOptions {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Base retry backoff in milliseconds (exponential strategy, no jitter).
    pub retry_backoff_ms: u64,
    /// Status classes that trigger a retry.
    pub retry_on: RetryOn,
}

impl Default for CallerOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_retries: 5,
            retry_backoff_ms: 1_000,
            retry_on: RetryOn::Transient,
        }
    }
}
