//! The completion service seam and its Gemini implementation.

use async_trait::async_trait;
use novamarket_gemini::{GeminiClient, GeminiError, GenerateContentRequest};
use thiserror::Error;

/// Errors a completion service can report
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The Gemini API call failed
    #[error("Gemini request failed: {0}")]
    Gemini(#[from] GeminiError),

    /// The service answered with no usable text
    #[error("Completion service returned an empty reply")]
    EmptyReply,

    /// Any other failure (test doubles, alternative backends)
    #[error("Completion failed: {0}")]
    Other(String),
}

/// A text completion capability: given a context block and a user message,
/// produce a reply.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Complete `message` under the system instruction `context`
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError`] when no reply text could be obtained.
    async fn complete(&self, context: &str, message: &str) -> Result<String, CompletionError>;
}

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default nucleus sampling mass
pub const DEFAULT_TOP_P: f32 = 0.95;

/// [`CompletionService`] backed by Gemini `generateContent`
#[derive(Clone, Debug)]
pub struct GeminiCompletionService {
    client: GeminiClient,
    temperature: f32,
    top_p: f32,
}

impl GeminiCompletionService {
    /// Wraps a client with the default sampling parameters
    #[must_use]
    pub const fn new(client: GeminiClient) -> Self {
        Self {
            client,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }

    /// Builder: Set sampling parameters
    #[must_use]
    pub const fn with_sampling(mut self, temperature: f32, top_p: f32) -> Self {
        self.temperature = temperature;
        self.top_p = top_p;
        self
    }
}

#[async_trait]
impl CompletionService for GeminiCompletionService {
    async fn complete(&self, context: &str, message: &str) -> Result<String, CompletionError> {
        let request = GenerateContentRequest::user(message)
            .with_system_instruction(context)
            .with_temperature(self.temperature)
            .with_top_p(self.top_p);

        let response = self.client.generate_content(&request).await?;

        if let Some(usage) = &response.usage_metadata {
            tracing::debug!(
                prompt_tokens = usage.prompt_token_count,
                reply_tokens = usage.candidates_token_count,
                "Gemini usage"
            );
        }

        response
            .text()
            .filter(|text| !text.trim().is_empty())
            .ok_or(CompletionError::EmptyReply)
    }
}
