//! # NovaMarket Testing
//!
//! Test support for reducers and stores:
//! - [`ReducerTest`], a Given-When-Then harness for pure reducers
//! - [`assertions`] over returned effects
//! - deterministic environment doubles such as [`FixedClock`]
//!
//! ## Example
//!
//! ```ignore
//! use novamarket_testing::{ReducerTest, assertions, test_clock};
//!
//! ReducerTest::new(CheckoutReducer)
//!     .with_env(checkout_environment(test_clock()))
//!     .given_state(CheckoutStep::Browsing)
//!     .when_action(CheckoutAction::Begin)
//!     .then_effects(|effects| assertions::assert_effects_count(effects, 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use novamarket_core::environment::Clock;


pub use reducer_test::{ReducerTest, assertions};

/// Deterministic doubles for environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use novamarket_testing::mocks::FixedClock;
    /// use novamarket_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// A fixed clock at 2025-01-01 00:00:00 UTC
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

pub use mocks::{FixedClock, test_clock};

/// Route `tracing` output through the test harness writer.
///
/// Safe to call from every test; only the first call installs the
/// subscriber. Honours `RUST_LOG`.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
