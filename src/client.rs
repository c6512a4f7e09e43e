use std::fmt;

use tokio_util::sync::CancellationToken;

use crate::{
    transport::{HttpRequest, HttpTransport, Sleeper},
    wire::GenerateContentRequest,
    CallerOptions, ErrorKind, Outcome, ResilientCaller,
};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Formats the generate-content URL for a model.
///
/// Example: `("https://host/v1beta", "m", "k")` → `"https://host/v1beta/models/m:generateContent?key=k"`
pub fn generate_content_url(endpoint: &str, model: &str, api_key: &str) -> String {
    format!(
        "{}/models/{}:generateContent?key={}",
        endpoint.trim().trim_end_matches('/'),
        model.trim(),
        api_key.trim()
    )
}

#[derive(Clone)]
/// Client for the generate-content endpoint of a hosted language model.
pub struct GeminiClient {
    caller: ResilientCaller,
    endpoint: String,
    model: String,
    api_key: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("options", self.caller.options())
            .finish()
    }
}

impl GeminiClient {
    /// Creates a client for the default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            caller: ResilientCaller::default(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: api_key.into(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `GEMINI_API_KEY` — API key (required)
    /// - `GEMINI_MODEL` — model name (optional)
    /// - `GEMINI_ENDPOINT` — API base URL (optional)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gemini_resilient_http::GeminiClient;
    ///
    /// let client = GeminiClient::from_env().expect("missing GEMINI_API_KEY");
    /// ```
    pub fn from_env() -> std::result::Result<Self, String> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| "missing GEMINI_API_KEY environment variable".to_owned())?;
        if api_key.trim().is_empty() {
            return Err("GEMINI_API_KEY is set but empty".to_owned());
        }

        let mut client = Self::new(api_key);
        if let Some(model) = non_empty_env("GEMINI_MODEL") {
            client = client.with_model(model);
        }
        if let Some(endpoint) = non_empty_env("GEMINI_ENDPOINT") {
            client = client.with_endpoint(endpoint);
        }
        Ok(client)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the API base URL, e.g. to point at a proxy or a mock server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Applies timeout and retry options.
    pub fn with_options(mut self, opts: CallerOptions) -> Self {
        self.caller = self.caller.with_options(opts);
        self
    }

    pub fn with_transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.caller = self.caller.with_transport(transport);
        self
    }

    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.caller = self.caller.with_sleeper(sleeper);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Builds the request sent on every attempt for `prompt`.
    pub fn build_request(&self, prompt: &str) -> std::result::Result<HttpRequest, String> {
        let body = serde_json::to_string(&GenerateContentRequest::user_prompt(prompt))
            .map_err(|err| format!("failed to encode request body: {err}"))?;
        let url = generate_content_url(&self.endpoint, &self.model, &self.api_key);
        Ok(HttpRequest::post_json(url, body))
    }

    /// Sends `prompt` and returns the model's text or a classified failure.
    pub async fn generate(&self, prompt: &str) -> Outcome {
        self.generate_with_cancel(prompt, &CancellationToken::new())
            .await
    }

    pub async fn generate_with_cancel(&self, prompt: &str, cancel: &CancellationToken) -> Outcome {
        match self.build_request(prompt) {
            Ok(request) => self.caller.call_with_cancel(&request, cancel).await,
            Err(message) => Outcome::failure(ErrorKind::Unexpected, message),
        }
    }

    /// Sends `prompt` and returns text ready to display, never an error.
    pub async fn reply(&self, prompt: &str) -> String {
        self.generate(prompt).await.into_display()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
