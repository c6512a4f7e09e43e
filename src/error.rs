/// Classification of a failed transport attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransportFailure {
    /// The attempt exceeded its per-request timeout.
    Timeout,
    /// The connection could not be established.
    Connect,
    /// The request failed while being sent.
    Request,
    /// The response body could not be read.
    Body,
    /// The request could not be built (bad URL, header, ...).
    Builder,
    /// Anything the transport could not classify.
    Other,
}

/// Error produced by a single attempt.
///
/// These never reach callers of [`crate::ResilientCaller`]; they are
/// converted into an [`crate::Outcome`] at its boundary.
#[derive(Debug, thiserror::Error)]
pub enum CallerError {
    /// Network or request execution error.
    #[error("transport error: {message}")]
    Transport {
        failure: TransportFailure,
        message: String,
    },
    /// Non-success HTTP status code with raw response body.
    #[error("API error: {status} {reason}")]
    Http {
        status: u16,
        reason: String,
        body: String,
    },
    /// Response decoding or shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
}

impl CallerError {
    pub fn transport(failure: TransportFailure, message: impl Into<String>) -> Self {
        Self::Transport {
            failure,
            message: message.into(),
        }
    }

    /// Whether a transport failure is worth another attempt.
    ///
    /// HTTP statuses are classified by [`crate::RetryOn`] instead, so this is
    /// `false` for [`CallerError::Http`].
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { failure, .. } => matches!(
                failure,
                TransportFailure::Timeout
                    | TransportFailure::Connect
                    | TransportFailure::Request
                    | TransportFailure::Body
            ),
            Self::Http { .. } | Self::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for CallerError {
    fn from(err: reqwest::Error) -> Self {
        let failure = if err.is_timeout() {
            TransportFailure::Timeout
        } else if err.is_connect() {
            TransportFailure::Connect
        } else if err.is_builder() {
            TransportFailure::Builder
        } else if err.is_body() || err.is_decode() {
            TransportFailure::Body
        } else if err.is_request() {
            TransportFailure::Request
        } else {
            TransportFailure::Other
        };
        // The request URL carries the API key.
        Self::transport(failure, err.without_url().to_string())
    }
}
