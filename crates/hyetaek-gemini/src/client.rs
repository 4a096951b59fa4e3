//! HTTP client for the Gemini `generateContent` REST endpoint.
//!
//! Wraps `reqwest` with API key handling and typed request/response
//! envelopes. Every call asks for `application/json` output and returns the
//! raw candidate text; turning that text into records is the job of
//! [`crate::normalize`]. Requests are never retried.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::GeminiError;
use crate::types::{
    ApiErrorEnvelope, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

/// Client for one Gemini model.
///
/// Use [`GeminiClient::new`] for production or [`GeminiClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
}

impl GeminiClient {
    /// Creates a new client pointed at the production Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GeminiError> {
        Self::with_base_url(api_key, model, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GeminiError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeminiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one `generateContent` request and returns the candidate text.
    ///
    /// # Errors
    ///
    /// - [`GeminiError::Http`] on network failure or timeout.
    /// - [`GeminiError::Api`] on a non-2xx status.
    /// - [`GeminiError::Deserialize`] if the envelope is not the expected shape.
    /// - [`GeminiError::Blocked`] / [`GeminiError::EmptyResponse`] when no
    ///   candidate text came back.
    pub async fn generate_json(&self, parts: Vec<Part>) -> Result<String, GeminiError> {
        let url = self.endpoint()?;
        let request = GenerateContentRequest {
            contents: vec![Content { role: None, parts }],
            generation_config: GenerationConfig::json(),
        };

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: Self::error_message(&body),
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| GeminiError::Deserialize {
                context: format!("generateContent(model={})", self.model),
                source: e,
            })?;

        if let Some(text) = parsed.text() {
            return Ok(text);
        }
        match parsed.block_reason() {
            Some(reason) => Err(GeminiError::Blocked(reason.to_string())),
            None => Err(GeminiError::EmptyResponse),
        }
    }

    /// `{base}/v1beta/models/{model}:generateContent`
    fn endpoint(&self) -> Result<Url, GeminiError> {
        let path = format!("v1beta/models/{}:generateContent", self.model);
        self.base_url
            .join(&path)
            .map_err(|e| GeminiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Pulls `error.message` out of an error body, or falls back to a prefix
    /// of the raw body.
    fn error_message(body: &str) -> String {
        match serde_json::from_str::<ApiErrorEnvelope>(body) {
            Ok(envelope) => envelope.error.message,
            Err(_) => body.chars().take(200).collect(),
        }
    }
}
