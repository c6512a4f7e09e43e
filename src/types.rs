/// Prefix the chat UI puts in front of every failure message.
pub const FAILURE_PREFIX: &str = "Failed to get response";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Every allowed attempt failed with a retryable error.
    Exhausted,
    /// The server answered with a status that is not retried.
    Rejected,
    /// Malformed response or a failure that is not network related.
    Unexpected,
    /// The caller's cancellation token fired.
    Cancelled,
}

/// Result of one logical call. Every path through
/// [`crate::ResilientCaller`] ends in one of these.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    Success(String),
    Failure { kind: ErrorKind, message: String },
}

impl Outcome {
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Converts the outcome into the plain text a chat window would show.
    pub fn into_display(self) -> String {
        match self {
            Self::Success(text) => text,
            Self::Failure { message, .. } => format!("{FAILURE_PREFIX}: {message}"),
        }
    }
}
