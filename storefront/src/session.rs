//! The storefront session: one explicit state value composing catalog view,
//! cart, checkout and assistant, a reducer that wires them together, and
//! the [`Storefront`] facade that runs it on a [`Store`].

use crate::assistant::{AssistantAction, AssistantEnvironment, AssistantReducer, AssistantState};
use crate::cart::{CartAction, CartReducer, CartState};
use crate::catalog::Catalog;
use crate::checkout::{CheckoutAction, CheckoutEnvironment, CheckoutReducer};
use crate::filter::{CatalogAction, CatalogView, CatalogViewReducer, MemoizedFilter};
use crate::types::{CategoryFilter, CheckoutStep, Product, ProductId};
use novamarket_core::{composition::Scope, effect::Effect, reducer::Reducer, SmallVec};
use novamarket_runtime::{EffectHandle, Store, StoreError};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Everything a shopper's session holds
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionState {
    /// Category and search inputs
    pub catalog: CatalogView,
    /// Cart lines and drawer flag
    pub cart: CartState,
    /// Checkout phase
    pub checkout: CheckoutStep,
    /// Assistant transcript
    pub assistant: AssistantState,
}

/// Session inputs
#[derive(Clone, Debug, PartialEq)]
pub enum SessionAction {
    /// Filter inputs changed
    Catalog(CatalogAction),
    /// Cart operation
    Cart(CartAction),
    /// Checkout transition
    Checkout(CheckoutAction),
    /// Assistant input or completion result
    Assistant(AssistantAction),
    /// Ask the assistant, with the current cart as context
    Ask {
        /// Raw input text
        text: String,
    },
    /// Check out the current cart
    PlaceOrder,
}

/// Dependencies of the whole session
#[derive(Clone, Debug)]
pub struct SessionEnvironment {
    /// The product catalog
    pub catalog: Arc<Catalog>,
    /// Checkout timing, clock and order numbers
    pub checkout: CheckoutEnvironment,
    /// Completion service and request bound
    pub assistant: AssistantEnvironment,
}

impl SessionEnvironment {
    /// Creates a new `SessionEnvironment`
    #[must_use]
    pub const fn new(
        catalog: Arc<Catalog>,
        checkout: CheckoutEnvironment,
        assistant: AssistantEnvironment,
    ) -> Self {
        Self {
            catalog,
            checkout,
            assistant,
        }
    }
}

type ChildScope<R> = Scope<SessionState, SessionAction, SessionEnvironment, R>;

/// Reducer for [`SessionState`]
///
/// Delegates to the child reducers and handles the interactions between
/// them: the cart is frozen while checkout is processing, placing an order
/// closes the drawer, and a completed order empties the cart.
#[derive(Clone, Debug)]
pub struct SessionReducer {
    catalog: ChildScope<CatalogViewReducer>,
    cart: ChildScope<CartReducer>,
    checkout: ChildScope<CheckoutReducer>,
    assistant: ChildScope<AssistantReducer>,
}

impl SessionReducer {
    /// Creates a new `SessionReducer`
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: Scope::new(
                CatalogViewReducer,
                |s| &mut s.catalog,
                |_| &(),
                SessionAction::Catalog,
            ),
            cart: Scope::new(CartReducer, |s| &mut s.cart, |_| &(), SessionAction::Cart),
            checkout: Scope::new(
                CheckoutReducer,
                |s| &mut s.checkout,
                |e| &e.checkout,
                SessionAction::Checkout,
            ),
            assistant: Scope::new(
                AssistantReducer,
                |s| &mut s.assistant,
                |e| &e.assistant,
                SessionAction::Assistant,
            ),
        }
    }

    fn place_order(
        &self,
        state: &mut SessionState,
        env: &SessionEnvironment,
    ) -> SmallVec<[Effect<SessionAction>; 4]> {
        let summary = state.cart.summary();
        let mut effects = self
            .checkout
            .run(state, CheckoutAction::Begin { summary }, env);
        if state.checkout.is_processing() {
            effects.extend(self.cart.run(state, CartAction::Close, env));
        }
        effects
    }
}

impl Default for SessionReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for SessionReducer {
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            SessionAction::Catalog(action) => self.catalog.run(state, action, env),
            SessionAction::Cart(action) => {
                if state.checkout.is_processing() {
                    tracing::debug!(?action, "Cart is locked while checkout is processing");
                    return SmallVec::new();
                }
                self.cart.run(state, action, env)
            },
            SessionAction::PlaceOrder | SessionAction::Checkout(CheckoutAction::Begin { .. }) => {
                self.place_order(state, env)
            },
            SessionAction::Checkout(action) => {
                let completing =
                    action == CheckoutAction::Complete && state.checkout.is_processing();
                let mut effects = self.checkout.run(state, action, env);
                if completing && matches!(state.checkout, CheckoutStep::Success(_)) {
                    effects.extend(self.cart.run(state, CartAction::Clear, env));
                }
                effects
            },
            SessionAction::Assistant(action) => self.assistant.run(state, action, env),
            SessionAction::Ask { text } => {
                let cart = state.cart.lines.clone();
                self.assistant
                    .run(state, AssistantAction::SendMessage { text, cart }, env)
            },
        }
    }
}

/// The session store
pub type SessionStore = Store<SessionState, SessionAction, SessionEnvironment, SessionReducer>;

/// High-level operations over a running session
pub struct Storefront {
    store: SessionStore,
    filter: Mutex<MemoizedFilter>,
    asking: tokio::sync::Mutex<()>,
}

impl Storefront {
    /// Starts a fresh session
    #[must_use]
    pub fn new(environment: SessionEnvironment) -> Self {
        Self {
            store: Store::new(SessionState::default(), SessionReducer::new(), environment),
            filter: Mutex::new(MemoizedFilter::new()),
            asking: tokio::sync::Mutex::new(()),
        }
    }

    /// The underlying store, for observers and custom actions
    #[must_use]
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The product catalog
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.store.environment().catalog
    }

    /// Looks up a catalog product
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.catalog().get(id)
    }

    /// Adds one unit of a product. Returns `false` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is shutting down.
    pub async fn add_to_cart(&self, id: &ProductId) -> Result<bool, StoreError> {
        let Some(product) = self.product(id).cloned() else {
            tracing::debug!(%id, "Add ignored: unknown product");
            return Ok(false);
        };
        self.store
            .send(SessionAction::Cart(CartAction::Add { product }))
            .await?;
        Ok(true)
    }

    /// Removes a product's line; unknown ids are ignored
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is shutting down.
    pub async fn remove_from_cart(&self, id: &ProductId) -> Result<(), StoreError> {
        self.dispatch(SessionAction::Cart(CartAction::Remove { id: id.clone() }))
            .await
    }

    /// Changes a line's quantity by `delta`, never below one
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is shutting down.
    pub async fn update_quantity(&self, id: &ProductId, delta: i64) -> Result<(), StoreError> {
        self.dispatch(SessionAction::Cart(CartAction::UpdateQuantity {
            id: id.clone(),
            delta,
        }))
        .await
    }

    /// Shows or hides the cart drawer
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is shutting down.
    pub async fn set_cart_open(&self, open: bool) -> Result<(), StoreError> {
        let action = if open { CartAction::Open } else { CartAction::Close };
        self.dispatch(SessionAction::Cart(action)).await
    }

    /// Selects a category filter
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is shutting down.
    pub async fn select_category(&self, category: CategoryFilter) -> Result<(), StoreError> {
        self.dispatch(SessionAction::Catalog(CatalogAction::SelectCategory(category)))
            .await
    }

    /// Replaces the search text
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is shutting down.
    pub async fn search(&self, text: impl Into<String>) -> Result<(), StoreError> {
        self.dispatch(SessionAction::Catalog(CatalogAction::SetSearch(text.into())))
            .await
    }

    /// Products passing the current category and search
    pub async fn visible_products(&self) -> Vec<Product> {
        let (category, search) = self
            .store
            .state(|s| (s.catalog.category, s.catalog.search.clone()))
            .await;
        let mut filter = self.filter.lock().unwrap_or_else(PoisonError::into_inner);
        filter
            .apply(self.catalog(), category, &search)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Starts checkout. Await the returned handle to wait for the order to
    /// be placed; an empty cart or a checkout already underway is ignored
    /// and the handle completes immediately.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is shutting down.
    pub async fn checkout(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(SessionAction::PlaceOrder).await
    }

    /// Leaves the success screen
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is shutting down.
    pub async fn continue_exploring(&self) -> Result<(), StoreError> {
        self.dispatch(SessionAction::Checkout(CheckoutAction::ContinueExploring))
            .await
    }

    /// Sends a message to the assistant and waits for its turn.
    ///
    /// Returns the assistant text appended for this message (reply or
    /// fallback), or `None` if the message was rejected as blank or while
    /// another request was in flight.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is shutting down.
    pub async fn ask(&self, text: impl Into<String>) -> Result<Option<String>, StoreError> {
        // Held until the reply lands so `asked_at` indexes our own turn
        let Ok(_asking) = self.asking.try_lock() else {
            tracing::debug!("Question rejected: another question is in flight");
            return Ok(None);
        };

        let asked_at = self.store.state(|s| s.assistant.transcript.len()).await;
        let mut handle = self.store.send(SessionAction::Ask { text: text.into() }).await?;
        handle.wait().await;

        Ok(self
            .store
            .state(|s| s.assistant.reply_to(asked_at).map(str::to_string))
            .await)
    }

    /// A copy of the whole session state
    pub async fn snapshot(&self) -> SessionState {
        self.store.state(Clone::clone).await
    }

    /// Stops accepting input and waits for a pending checkout or reply
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if work is still pending
    /// after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }

    async fn dispatch(&self, action: SessionAction) -> Result<(), StoreError> {
        self.store.send(action).await.map(|_| ())
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront").finish_non_exhaustive()
    }
}
