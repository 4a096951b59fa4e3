use thiserror::Error;

/// Errors returned by the Gemini `generateContent` client.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; `message` comes from the `{"error": {...}}` body when present.
    #[error("Gemini API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The prompt was refused before any candidate was produced.
    #[error("prompt blocked: {0}")]
    Blocked(String),

    /// The response carried no candidate text.
    #[error("response contained no text")]
    EmptyResponse,

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
