//! `gemini-resilient-http` forwards prompts to a hosted generate-content API
//! and always resolves to something a chat window can display.
//!
//! - [`ResilientCaller`] sends a request with bounded exponential-backoff
//!   retries and validates the response shape.
//! - [`GeminiClient`] builds the generate-content request and drives it
//!   through a [`ResilientCaller`].
//!
//! Network access and timers are injected through [`HttpTransport`] and
//! [`Sleeper`], so the retry loop can be tested without either.

mod caller;
mod client;
mod decode;
mod error;
mod options;
mod transport;
mod types;
mod wire;

pub use caller::ResilientCaller;
pub use client::{generate_content_url, GeminiClient, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use decode::NO_RESPONSE_TEXT;
pub use error::{CallerError, TransportFailure};
pub use options::{CallerOptions, RetryOn};
pub use transport::{
    HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, Sleeper, TokioSleeper,
};
pub use types::{ErrorKind, Outcome, FAILURE_PREFIX};

pub use tokio_util::sync::CancellationToken;
