//! Error types for the Gemini API client

use thiserror::Error;

/// Errors that can occur when interacting with the Gemini API
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Neither `GEMINI_API_KEY` nor `API_KEY` is set to a non-empty value
    #[error("Missing GEMINI_API_KEY (or API_KEY) environment variable")]
    MissingApiKey,

    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be decoded
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Rate limited - too many requests
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Unauthorized - invalid or disallowed API key
    #[error("Unauthorized - invalid API key")]
    Unauthorized,

    /// API returned an error
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error body from the API
        message: String,
    },
}
