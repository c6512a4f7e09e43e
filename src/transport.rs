use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Method, StatusCode};

use crate::CallerError;

/// Immutable description of one remote call.
///
/// The same value is handed to every attempt of a logical call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Builds a `POST` with a JSON body.
    pub fn post_json(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: vec![(
                header::CONTENT_TYPE.as_str().to_owned(),
                "application/json".to_owned(),
            )],
            body: Some(body.into()),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Error describing a non-success response, e.g. `API error: 503 Service Unavailable`.
    pub(crate) fn into_error(self) -> CallerError {
        CallerError::Http {
            status: self.status.as_u16(),
            reason: self.status.canonical_reason().unwrap_or("").to_owned(),
            body: self.body,
        }
    }
}

/// Issues a single HTTP attempt. Retries are layered on top by
/// [`crate::ResilientCaller`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        request: &HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, CallerError>;
}

/// Suspends the current task between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

/// [`HttpTransport`] backed by a shared `reqwest` client.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: &HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, CallerError> {
        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

/// [`Sleeper`] using `tokio::time::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{Method, StatusCode};

    use super::{HttpRequest, HttpResponse};
    use crate::CallerError;

    #[test]
    fn post_json_sets_content_type() {
        let request = HttpRequest::post_json("http://localhost/x", "{}").with_header("x-test", "1");
        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.headers,
            vec![
                ("content-type".to_owned(), "application/json".to_owned()),
                ("x-test".to_owned(), "1".to_owned()),
            ]
        );
        assert_eq!(request.body.as_deref(), Some("{}"));
    }

    #[test]
    fn non_success_response_keeps_status_reason_and_body() {
        let err = HttpResponse::new(StatusCode::TOO_MANY_REQUESTS, "slow down").into_error();
        match err {
            CallerError::Http {
                status,
                reason,
                body,
            } => {
                assert_eq!(status, 429);
                assert_eq!(reason, "Too Many Requests");
                assert_eq!(body, "slow down");
            }
            other => panic!("expected http error, got {other:?}"),
        }
    }
}
