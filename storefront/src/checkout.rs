//! Mock checkout flow.
//!
//! `Browsing -> Processing -> Success -> Browsing`. Processing always
//! succeeds after a fixed delay; there is no cancel and no failure state.

use crate::types::{CartSummary, CheckoutStep, OrderConfirmation};
use novamarket_core::{effect::Effect, environment::Clock, reducer::Reducer, smallvec, SmallVec};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Simulated payment latency
pub const DEFAULT_CHECKOUT_DELAY: Duration = Duration::from_millis(2500);

/// Source of order references
pub trait OrderNumbers: Send + Sync {
    /// A fresh reference such as `NV-82910`
    fn next_reference(&self) -> String;
}

/// `NV-` followed by five random digits
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOrderNumbers;

impl OrderNumbers for RandomOrderNumbers {
    fn next_reference(&self) -> String {
        let number: u32 = rand::thread_rng().gen_range(10_000..100_000);
        format!("NV-{number}")
    }
}

/// Checkout transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckoutAction {
    /// Start the simulated payment for a non-empty cart
    Begin {
        /// Cart at the moment checkout was requested
        summary: CartSummary,
    },
    /// Delay elapsed; place the order
    Complete,
    /// Leave the success screen
    ContinueExploring,
}

/// Environment dependencies for the checkout reducer
#[derive(Clone)]
pub struct CheckoutEnvironment {
    /// How long processing takes
    pub delay: Duration,
    /// Timestamps for confirmations
    pub clock: Arc<dyn Clock>,
    /// Order references for confirmations
    pub order_numbers: Arc<dyn OrderNumbers>,
}

impl CheckoutEnvironment {
    /// Creates a new `CheckoutEnvironment`
    #[must_use]
    pub fn new(delay: Duration, clock: Arc<dyn Clock>, order_numbers: Arc<dyn OrderNumbers>) -> Self {
        Self {
            delay,
            clock,
            order_numbers,
        }
    }
}

impl std::fmt::Debug for CheckoutEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutEnvironment")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

/// Reducer for [`CheckoutStep`]
#[derive(Clone, Copy, Debug, Default)]
pub struct CheckoutReducer;

impl Reducer for CheckoutReducer {
    type State = CheckoutStep;
    type Action = CheckoutAction;
    type Environment = CheckoutEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match (&*state, action) {
            (CheckoutStep::Browsing, CheckoutAction::Begin { summary }) if summary.item_count > 0 => {
                tracing::info!(items = summary.item_count, total = %summary.total, "Checkout processing");
                *state = CheckoutStep::Processing { summary };
                smallvec![Effect::Delay {
                    duration: env.delay,
                    action: Box::new(CheckoutAction::Complete),
                }]
            },
            (CheckoutStep::Browsing, CheckoutAction::Begin { .. }) => {
                tracing::warn!("Checkout ignored: cart is empty");
                SmallVec::new()
            },
            (CheckoutStep::Processing { summary }, CheckoutAction::Complete) => {
                let summary = *summary;
                let confirmation = OrderConfirmation {
                    reference: env.order_numbers.next_reference(),
                    placed_at: env.clock.now(),
                    item_count: summary.item_count,
                    total: summary.total,
                };
                tracing::info!(reference = %confirmation.reference, "Order placed");
                metrics::counter!("storefront.checkout.completed").increment(1);
                *state = CheckoutStep::Success(confirmation);
                SmallVec::new()
            },
            (CheckoutStep::Success(_), CheckoutAction::ContinueExploring) => {
                *state = CheckoutStep::Browsing;
                SmallVec::new()
            },
            (step, action) => {
                tracing::warn!(?step, ?action, "Checkout transition ignored");
                SmallVec::new()
            },
        }
    }
}
