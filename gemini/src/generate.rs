//! `generateContent` request and response bodies

use crate::types::{Content, GenerationConfig, UsageMetadata};
use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:generateContent`
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation contents, oldest first
    pub contents: Vec<Content>,
    /// System prompt (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// Sampling parameters (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// A request carrying a single user message
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::user(text)],
            system_instruction: None,
            generation_config: None,
        }
    }

    /// Builder: Set system instruction
    #[must_use]
    pub fn with_system_instruction(mut self, text: impl Into<String>) -> Self {
        self.system_instruction = Some(Content::system(text));
        self
    }

    /// Builder: Set temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.generation_config
            .get_or_insert_with(GenerationConfig::default)
            .temperature = Some(temperature);
        self
    }

    /// Builder: Set top-p
    #[must_use]
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.generation_config
            .get_or_insert_with(GenerationConfig::default)
            .top_p = Some(top_p);
        self
    }
}

/// One generated alternative
#[derive(Clone, Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content; absent when generation was blocked
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped (`STOP`, `MAX_TOKENS`, `SAFETY`, ...)
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response body of `generateContent`
#[derive(Clone, Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidates, best first
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Token usage statistics
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
    /// Model version that served the request
    #[serde(default)]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated.
    ///
    /// `None` when there is no candidate or it has no content.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(Content::joined_text)
    }
}
