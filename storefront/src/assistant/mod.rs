//! Shopping assistant session.
//!
//! An append-only transcript plus an in-flight flag. Sending a message
//! appends the shopper's turn right away, then exactly one assistant turn
//! once the completion service answers, fails, or times out. Errors never
//! leave this module; they become the fallback turn.

pub mod context;
pub mod service;

use crate::catalog::Catalog;
use crate::types::{AssistantTurn, CartLine, Role};
use novamarket_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use serde::{Deserialize, Serialize};
use service::{CompletionError, CompletionService};
use std::sync::Arc;
use std::time::Duration;

/// First turn of every transcript
pub const GREETING: &str =
    "Hello! I'm Nova, your personal shopping curator. How can I elevate your experience today?";

/// Assistant turn used when no API credential is configured
pub const UNAVAILABLE_MESSAGE: &str = "I'm currently unavailable, but you can browse our curated collections above! Use the search bar or category filters to find exactly what you're looking for.";

/// Assistant turn used when a request fails
pub const FAILURE_MESSAGE: &str =
    "I'm having a brief technical moment. Please try again or browse our latest collections!";

/// Default bound on a single completion request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Transcript and in-flight flag
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantState {
    /// All turns, oldest first; never edited or truncated
    pub transcript: Vec<AssistantTurn>,
    /// A request is outstanding
    pub awaiting_response: bool,
}

impl AssistantState {
    /// A transcript holding only the greeting
    #[must_use]
    pub fn new() -> Self {
        Self {
            transcript: vec![AssistantTurn::assistant(GREETING)],
            awaiting_response: false,
        }
    }

    /// The assistant turn answering the user turn at `index`, if both exist
    #[must_use]
    pub fn reply_to(&self, index: usize) -> Option<&str> {
        match self.transcript.get(index..=index + 1)? {
            [asked, reply] if asked.role == Role::User && reply.role == Role::Assistant => {
                Some(reply.text.as_str())
            },
            _ => None,
        }
    }
}

impl Default for AssistantState {
    fn default() -> Self {
        Self::new()
    }
}

/// Assistant inputs and completion results
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssistantAction {
    /// The shopper sent a message
    SendMessage {
        /// Raw input text
        text: String,
        /// Cart lines at send time, for the context block
        cart: Vec<CartLine>,
    },
    /// The completion service answered
    ResponseReceived {
        /// Reply text
        text: String,
    },
    /// The request failed, timed out, or produced nothing
    ResponseFailed {
        /// Diagnostic description
        error: String,
    },
}

/// Environment dependencies for the assistant reducer
#[derive(Clone)]
pub struct AssistantEnvironment {
    /// `None` when no credential is configured
    pub service: Option<Arc<dyn CompletionService>>,
    /// Catalog serialized into every request
    pub catalog: Arc<Catalog>,
    /// Bound on a single request
    pub request_timeout: Duration,
}

impl AssistantEnvironment {
    /// Creates a new `AssistantEnvironment`
    #[must_use]
    pub fn new(
        service: Option<Arc<dyn CompletionService>>,
        catalog: Arc<Catalog>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            service,
            catalog,
            request_timeout,
        }
    }
}

impl std::fmt::Debug for AssistantEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantEnvironment")
            .field("service", &self.service.as_ref().map(|_| "<service>"))
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

/// Reducer for [`AssistantState`]
#[derive(Clone, Copy, Debug, Default)]
pub struct AssistantReducer;

impl AssistantReducer {
    fn request(
        service: Arc<dyn CompletionService>,
        context: String,
        message: String,
        timeout: Duration,
    ) -> Effect<AssistantAction> {
        Effect::Future(Box::pin(async move {
            // Own task, so a panicking service surfaces as a JoinError
            let call = tokio::spawn(async move {
                tokio::time::timeout(timeout, service.complete(&context, &message)).await
            });
            let action = match call.await {
                Ok(Ok(Ok(text))) if !text.trim().is_empty() => {
                    AssistantAction::ResponseReceived { text }
                },
                Ok(Ok(Ok(_))) => AssistantAction::ResponseFailed {
                    error: CompletionError::EmptyReply.to_string(),
                },
                Ok(Ok(Err(error))) => AssistantAction::ResponseFailed {
                    error: error.to_string(),
                },
                Ok(Err(_)) => AssistantAction::ResponseFailed {
                    error: format!("no reply within {timeout:?}"),
                },
                Err(error) => AssistantAction::ResponseFailed {
                    error: format!("completion task died: {error}"),
                },
            };
            Some(action)
        }))
    }
}

impl Reducer for AssistantReducer {
    type State = AssistantState;
    type Action = AssistantAction;
    type Environment = AssistantEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AssistantAction::SendMessage { text, cart } => {
                let message = text.trim();
                if message.is_empty() {
                    tracing::debug!("Message rejected: empty");
                    return SmallVec::new();
                }
                if state.awaiting_response {
                    tracing::debug!("Message rejected: a request is already in flight");
                    return SmallVec::new();
                }

                state.transcript.push(AssistantTurn::user(message));

                let Some(service) = &env.service else {
                    tracing::info!("No completion credential configured; replying offline");
                    metrics::counter!("storefront.assistant.requests", "outcome" => "unavailable")
                        .increment(1);
                    state.transcript.push(AssistantTurn::assistant(UNAVAILABLE_MESSAGE));
                    return SmallVec::new();
                };

                state.awaiting_response = true;
                let context = context::system_instruction(&env.catalog, &cart);
                smallvec![Self::request(
                    Arc::clone(service),
                    context,
                    message.to_string(),
                    env.request_timeout,
                )]
            },
            AssistantAction::ResponseReceived { text } => {
                if !state.awaiting_response {
                    tracing::warn!("Reply arrived with no request in flight; dropped");
                    return SmallVec::new();
                }
                metrics::counter!("storefront.assistant.requests", "outcome" => "ok").increment(1);
                state.transcript.push(AssistantTurn::assistant(text));
                state.awaiting_response = false;
                SmallVec::new()
            },
            AssistantAction::ResponseFailed { error } => {
                if !state.awaiting_response {
                    tracing::warn!(%error, "Failure arrived with no request in flight; dropped");
                    return SmallVec::new();
                }
                tracing::warn!(%error, "Assistant request failed");
                metrics::counter!("storefront.assistant.requests", "outcome" => "failed")
                    .increment(1);
                state.transcript.push(AssistantTurn::assistant(FAILURE_MESSAGE));
                state.awaiting_response = false;
                SmallVec::new()
            },
        }
    }
}
