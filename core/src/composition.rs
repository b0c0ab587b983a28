//! Reducer composition utilities
//!
//! A parent feature usually owns several child features, each with its own
//! state, action and environment types. [`Scope`] embeds one child reducer
//! into a parent:
//!
//! - a state lens picks the child state out of the parent state,
//! - an environment lens picks the child dependencies out of the parent environment,
//! - an embedding wraps child actions (including those produced by effects)
//!   back into the parent action type.
//!
//! The child state is borrowed mutably in place, so no cloning happens on the
//! hot path.
//!
//! # Examples
//!
//! ```
//! use novamarket_core::composition::Scope;
//! use novamarket_core::{effect::Effect, reducer::Reducer, SmallVec, smallvec};
//!
//! #[derive(Default)]
//! struct CounterState {
//!     count: i32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! #[derive(Clone)]
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! #[derive(Default)]
//! struct AppState {
//!     counter: CounterState,
//! }
//!
//! #[derive(Debug)]
//! enum AppAction {
//!     Counter(CounterAction),
//! }
//!
//! struct AppEnv {
//!     counter: (),
//! }
//!
//! let scope: Scope<AppState, AppAction, AppEnv, CounterReducer> = Scope::new(
//!     CounterReducer,
//!     |s| &mut s.counter,
//!     |e| &e.counter,
//!     AppAction::Counter,
//! );
//!
//! let mut state = AppState::default();
//! let effects = scope.run(&mut state, CounterAction::Increment, &AppEnv { counter: () });
//! assert_eq!(state.counter.count, 1);
//! // `Effect::None` is dropped when lifting
//! assert!(effects.is_empty());
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Lift a batch of child effects into the parent action type.
#[must_use]
pub fn lift_effects<A, B>(
    effects: SmallVec<[Effect<A>; 4]>,
    embed: fn(A) -> B,
) -> SmallVec<[Effect<B>; 4]>
where
    A: Send + 'static,
    B: Send + 'static,
{
    effects
        .into_iter()
        .filter(|effect| !effect.is_none())
        .map(|effect| effect.map(embed))
        .collect()
}

/// A child reducer focused on part of a parent's state and environment.
///
/// Created with [`Scope::new`]; run with [`Scope::run`].
pub struct Scope<P, PA, PE, R>
where
    R: Reducer,
{
    reducer: R,
    state: fn(&mut P) -> &mut R::State,
    env: fn(&PE) -> &R::Environment,
    embed: fn(R::Action) -> PA,
}

impl<P, PA, PE, R> Scope<P, PA, PE, R>
where
    R: Reducer,
    R::Action: Send + 'static,
    PA: Send + 'static,
{
    /// Build a scope from a child reducer and the three lenses.
    #[must_use]
    pub const fn new(
        reducer: R,
        state: fn(&mut P) -> &mut R::State,
        env: fn(&PE) -> &R::Environment,
        embed: fn(R::Action) -> PA,
    ) -> Self {
        Self {
            reducer,
            state,
            env,
            embed,
        }
    }

    /// Reduce a child action against the parent state.
    ///
    /// `Effect::None` entries are dropped; everything else is mapped into
    /// the parent action type.
    pub fn run(&self, parent: &mut P, action: R::Action, env: &PE) -> SmallVec<[Effect<PA>; 4]> {
        let child_state = (self.state)(parent);
        let child_env = (self.env)(env);
        let effects = self.reducer.reduce(child_state, action, child_env);
        lift_effects(effects, self.embed)
    }
}

impl<P, PA, PE, R> Clone for Scope<P, PA, PE, R>
where
    R: Reducer + Clone,
{
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            state: self.state,
            env: self.env,
            embed: self.embed,
        }
    }
}

impl<P, PA, PE, R> std::fmt::Debug for Scope<P, PA, PE, R>
where
    R: Reducer + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("reducer", &self.reducer)
            .finish_non_exhaustive()
    }
}
