//! Test doubles for the storefront environment.
//!
//! **WARNING**: Do NOT use in production. These exist for tests and demos.

use crate::assistant::service::{CompletionError, CompletionService};
use crate::checkout::OrderNumbers;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted outcome for [`ScriptedCompletionService`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptedReply {
    /// Answer with this text
    Text(String),
    /// Fail with [`CompletionError::Other`]
    Fail(String),
    /// Answer after sleeping (combine with paused tokio time)
    Slow(Duration, String),
    /// Panic inside the service call
    Panic(String),
}

/// A request seen by [`ScriptedCompletionService`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    /// System instruction that was sent
    pub context: String,
    /// User message that was sent
    pub message: String,
}

/// Completion service that replays a script and records every call.
///
/// When the script runs out it fails every further call.
#[derive(Clone, Default)]
pub struct ScriptedCompletionService {
    script: Arc<Mutex<VecDeque<ScriptedReply>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedCompletionService {
    /// A service that plays `replies` in order
    #[must_use]
    pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            script: Arc::new(Mutex::new(replies.into_iter().collect())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A service that answers once with `text`
    #[must_use]
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new([ScriptedReply::Text(text.into())])
    }

    /// A service that fails once with `error`
    #[must_use]
    pub fn failing(error: impl Into<String>) -> Self {
        Self::new([ScriptedReply::Fail(error.into())])
    }

    /// Every call received so far
    #[must_use]
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletionService {
    #[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
    #[allow(clippy::panic)] // Test mock: scripted panic
    async fn complete(&self, context: &str, message: &str) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(RecordedCall {
            context: context.to_string(),
            message: message.to_string(),
        });

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Fail(error)) => Err(CompletionError::Other(error)),
            Some(ScriptedReply::Slow(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            },
            Some(ScriptedReply::Panic(reason)) => panic!("{reason}"),
            None => Err(CompletionError::Other("script exhausted".to_string())),
        }
    }
}

/// Order references `NV-<n>`, `NV-<n+1>`, ...
#[derive(Debug)]
pub struct SequentialOrderNumbers {
    next: AtomicU32,
}

impl SequentialOrderNumbers {
    /// Start counting at `first`
    #[must_use]
    pub const fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
        }
    }
}

impl OrderNumbers for SequentialOrderNumbers {
    fn next_reference(&self) -> String {
        format!("NV-{}", self.next.fetch_add(1, Ordering::Relaxed))
    }
}
