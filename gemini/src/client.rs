//! Gemini API client implementation

use crate::{
    error::GeminiError,
    generate::{GenerateContentRequest, GenerateContentResponse},
};
use reqwest::{Client, StatusCode};

/// Production endpoint for the v1beta API
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new client with the API key from the environment
    ///
    /// Reads `GEMINI_API_KEY`, then `API_KEY`. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError::MissingApiKey` if neither variable holds a key
    pub fn from_env() -> Result<Self, GeminiError> {
        ["GEMINI_API_KEY", "API_KEY"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|key| !key.trim().is_empty())
            .map(Self::new)
            .ok_or(GeminiError::MissingApiKey)
    }

    /// Create a new client with explicit API key
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Builder: point the client at another base URL (proxies, test servers)
    #[must_use]
    pub fn with_base_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: Set model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Model requests are sent to
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Call `models/{model}:generateContent`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);
        tracing::debug!(model = %self.model, "generateContent");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GeminiError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<GenerateContentResponse>()
                .await
                .map_err(|e| GeminiError::ResponseParseFailed(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(GeminiError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GeminiError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(GeminiError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }
}
