//! Configuration management for the storefront.
//!
//! Loads settings from environment variables with defaults. Unparseable
//! numbers fall back to their default with a warning; values that parse but
//! are out of range are rejected.

use crate::assistant::service::{
    CompletionService, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, GeminiCompletionService,
};
use crate::assistant::{AssistantEnvironment, DEFAULT_REQUEST_TIMEOUT};
use crate::catalog::Catalog;
use crate::checkout::{CheckoutEnvironment, DEFAULT_CHECKOUT_DELAY, RandomOrderNumbers};
use crate::session::SessionEnvironment;
use novamarket_core::environment::SystemClock;
use novamarket_gemini::{DEFAULT_API_URL, DEFAULT_MODEL, GeminiClient};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting parsed but is outside its allowed range
    #[error("{name}={value} is invalid: {reason}")]
    Invalid {
        /// Environment variable name
        name: &'static str,
        /// Raw value
        value: String,
        /// What is allowed
        reason: &'static str,
    },
}

/// Storefront configuration
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Gemini API key; `None` runs the assistant offline
    pub api_key: Option<String>,
    /// Gemini model name
    pub model: String,
    /// Gemini API base URL
    pub api_url: String,
    /// Sampling temperature, 0.0 to 2.0
    pub temperature: f32,
    /// Nucleus sampling mass, 0.0 to 1.0
    pub top_p: f32,
    /// Bound on one assistant request
    pub request_timeout: Duration,
    /// Simulated checkout latency
    pub checkout_delay: Duration,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("request_timeout", &self.request_timeout)
            .field("checkout_delay", &self.checkout_delay)
            .finish()
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            checkout_delay: DEFAULT_CHECKOUT_DELAY,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from the process environment
    ///
    /// Reads `GEMINI_API_KEY` (falling back to `API_KEY`), `GEMINI_MODEL`,
    /// `GEMINI_API_URL`, `ASSISTANT_TEMPERATURE`, `ASSISTANT_TOP_P`,
    /// `ASSISTANT_TIMEOUT_SECS` and `CHECKOUT_DELAY_MS`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let config = Self {
            api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
            model: get("GEMINI_MODEL").unwrap_or(defaults.model),
            api_url: get("GEMINI_API_URL").unwrap_or(defaults.api_url),
            temperature: parsed(&get, "ASSISTANT_TEMPERATURE", defaults.temperature),
            top_p: parsed(&get, "ASSISTANT_TOP_P", defaults.top_p),
            request_timeout: Duration::from_secs(parsed(
                &get,
                "ASSISTANT_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            checkout_delay: Duration::from_millis(parsed(
                &get,
                "CHECKOUT_DELAY_MS",
                u64::try_from(defaults.checkout_delay.as_millis()).unwrap_or(u64::MAX),
            )),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid {
                name: "ASSISTANT_TEMPERATURE",
                value: self.temperature.to_string(),
                reason: "must be between 0.0 and 2.0",
            });
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(ConfigError::Invalid {
                name: "ASSISTANT_TOP_P",
                value: self.top_p.to_string(),
                reason: "must be between 0.0 and 1.0",
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: "ASSISTANT_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// The completion service, if a key is configured
    #[must_use]
    pub fn completion_service(&self) -> Option<Arc<dyn CompletionService>> {
        let key = self.api_key.clone()?;
        let client = GeminiClient::new(key)
            .with_base_url(self.api_url.as_str())
            .with_model(self.model.as_str());
        Some(Arc::new(
            GeminiCompletionService::new(client).with_sampling(self.temperature, self.top_p),
        ))
    }

    /// Production dependencies for a session over `catalog`
    #[must_use]
    pub fn session_environment(&self, catalog: Arc<Catalog>) -> SessionEnvironment {
        SessionEnvironment::new(
            Arc::clone(&catalog),
            CheckoutEnvironment::new(
                self.checkout_delay,
                Arc::new(SystemClock),
                Arc::new(RandomOrderNumbers),
            ),
            AssistantEnvironment::new(self.completion_service(), catalog, self.request_timeout),
        )
    }
}

fn parsed<T, G>(get: &G, name: &'static str, default: T) -> T
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(name, value = %raw, "Unparseable setting; using default");
            default
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.api_key, None);
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.checkout_delay, Duration::from_millis(2500));
        assert!(config.completion_service().is_none());
    }

    #[test]
    fn api_key_falls_back_and_ignores_empty() {
        let config =
            StorefrontConfig::from_lookup(lookup(&[("GEMINI_API_KEY", " "), ("API_KEY", "k-1")]));
        assert_eq!(config.map(|c| c.api_key), Ok(Some("k-1".to_string())));
    }

    #[test]
    fn gemini_key_takes_precedence() {
        let config =
            StorefrontConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "g"), ("API_KEY", "a")]));
        assert_eq!(config.map(|c| c.api_key), Ok(Some("g".to_string())));
    }

    #[test]
    fn numbers_are_parsed() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("ASSISTANT_TEMPERATURE", "0.2"),
            ("ASSISTANT_TIMEOUT_SECS", "5"),
            ("CHECKOUT_DELAY_MS", "10"),
        ]));
        let config = config.unwrap();
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.checkout_delay, Duration::from_millis(10));
    }

    #[test]
    fn unparseable_number_uses_default() {
        let config = StorefrontConfig::from_lookup(lookup(&[("CHECKOUT_DELAY_MS", "soon")]));
        assert_eq!(
            config.map(|c| c.checkout_delay),
            Ok(Duration::from_millis(2500))
        );
    }

    #[test]
    fn out_of_range_top_p_is_rejected() {
        let config = StorefrontConfig::from_lookup(lookup(&[("ASSISTANT_TOP_P", "1.5")]));
        assert!(matches!(
            config,
            Err(ConfigError::Invalid { name: "ASSISTANT_TOP_P", .. })
        ));
    }

    #[test]
    fn debug_redacts_key() {
        let config = StorefrontConfig {
            api_key: Some("super-secret".to_string()),
            ..StorefrontConfig::default()
        };
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
