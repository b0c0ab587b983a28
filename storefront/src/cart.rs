//! Cart state machine.
//!
//! Lines are merged by product id; quantities never drop below one and a
//! line only disappears through an explicit `Remove` or `Clear`. Unknown
//! ids are no-ops rather than errors.

use crate::types::{CartLine, CartSummary, Money, Product, ProductId};
use novamarket_core::{effect::Effect, reducer::Reducer, SmallVec};
use serde::{Deserialize, Serialize};

/// Cart contents plus the drawer flag
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    /// Lines in insertion order, at most one per product
    pub lines: Vec<CartLine>,
    /// Whether the cart drawer is showing
    pub is_open: bool,
}

impl CartState {
    /// Creates an empty, closed cart
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of `unit_price × quantity` over all lines
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities (the badge count)
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Number of distinct lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if there are no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line for `id`, if any
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == id)
    }

    /// Item count and subtotal
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            item_count: self.item_count(),
            total: self.subtotal(),
        }
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.product_id == id)
    }
}

/// Cart operations
#[derive(Clone, Debug, PartialEq)]
pub enum CartAction {
    /// Add one unit of a product and open the drawer
    Add {
        /// Product to add
        product: Product,
    },
    /// Drop the line for a product
    Remove {
        /// Product whose line is removed
        id: ProductId,
    },
    /// Adjust a line's quantity by `delta`, clamped to at least 1
    UpdateQuantity {
        /// Product whose line changes
        id: ProductId,
        /// Signed change
        delta: i64,
    },
    /// Remove every line
    Clear,
    /// Show the drawer
    Open,
    /// Hide the drawer
    Close,
}

/// Reducer for [`CartState`]
#[derive(Clone, Copy, Debug, Default)]
pub struct CartReducer;

impl CartReducer {
    fn adjusted(quantity: u32, delta: i64) -> u32 {
        let target = i64::from(quantity).saturating_add(delta).max(1);
        u32::try_from(target).unwrap_or(u32::MAX)
    }
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CartAction::Add { product } => {
                if let Some(line) = state.line_mut(&product.id) {
                    line.quantity = line.quantity.saturating_add(1);
                    tracing::debug!(id = %product.id, quantity = line.quantity, "Cart line incremented");
                } else {
                    tracing::debug!(id = %product.id, "Cart line added");
                    state.lines.push(CartLine::from_product(&product));
                }
                state.is_open = true;
            },
            CartAction::Remove { id } => {
                let before = state.lines.len();
                state.lines.retain(|line| line.product_id != id);
                if state.lines.len() == before {
                    tracing::debug!(%id, "Remove ignored: not in cart");
                }
            },
            CartAction::UpdateQuantity { id, delta } => match state.line_mut(&id) {
                Some(line) => {
                    line.quantity = Self::adjusted(line.quantity, delta);
                    tracing::debug!(%id, quantity = line.quantity, "Cart quantity updated");
                },
                None => tracing::debug!(%id, "Quantity update ignored: not in cart"),
            },
            CartAction::Clear => state.lines.clear(),
            CartAction::Open => state.is_open = true,
            CartAction::Close => state.is_open = false,
        }
        SmallVec::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use novamarket_testing::{ReducerTest, assertions};
    use proptest::prelude::*;

    fn product(id: &str) -> Product {
        Catalog::standard()
            .get(&ProductId::new(id))
            .cloned()
            .unwrap_or_else(|| panic!("no product {id}"))
    }

    fn cart_with(lines: &[(&str, u32)]) -> CartState {
        let mut cart = CartState::new();
        for (id, quantity) in lines {
            let mut line = CartLine::from_product(&product(id));
            line.quantity = *quantity;
            cart.lines.push(line);
        }
        cart
    }

    #[test]
    fn add_new_product_creates_line_and_opens_drawer() {
        ReducerTest::new(CartReducer)
            .with_env(())
            .given_state(CartState::new())
            .when_action(CartAction::Add { product: product("1") })
            .then_state(|cart| {
                assert_eq!(cart.len(), 1);
                assert_eq!(cart.lines[0].quantity, 1);
                assert_eq!(cart.lines[0].name, "Aether Noise-Cancelling Headphones");
                assert!(cart.is_open);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn add_existing_product_increments_quantity() {
        ReducerTest::new(CartReducer)
            .with_env(())
            .given_state(cart_with(&[("2", 1)]))
            .when_action(CartAction::Add { product: product("2") })
            .then_state(|cart| {
                assert_eq!(cart.len(), 1);
                assert_eq!(cart.lines[0].quantity, 2);
            })
            .run();
    }

    #[test]
    fn remove_absent_id_is_a_noop() {
        ReducerTest::new(CartReducer)
            .with_env(())
            .given_state(cart_with(&[("3", 2)]))
            .when_action(CartAction::Remove { id: ProductId::new("9") })
            .then_state(|cart| assert_eq!(*cart, cart_with(&[("3", 2)])))
            .run();
    }

    #[test]
    fn remove_drops_only_that_line() {
        ReducerTest::new(CartReducer)
            .with_env(())
            .given_state(cart_with(&[("3", 2), ("4", 1)]))
            .when_action(CartAction::Remove { id: ProductId::new("3") })
            .then_state(|cart| {
                assert_eq!(cart.len(), 1);
                assert!(cart.line(&ProductId::new("4")).is_some());
            })
            .run();
    }

    #[test]
    fn large_negative_delta_clamps_to_one() {
        ReducerTest::new(CartReducer)
            .with_env(())
            .given_state(cart_with(&[("5", 3)]))
            .when_action(CartAction::UpdateQuantity {
                id: ProductId::new("5"),
                delta: -100,
            })
            .then_state(|cart| assert_eq!(cart.lines[0].quantity, 1))
            .run();
    }

    #[test]
    fn quantity_saturates_at_u32_max() {
        ReducerTest::new(CartReducer)
            .with_env(())
            .given_state(cart_with(&[("6", 10)]))
            .when_action(CartAction::UpdateQuantity {
                id: ProductId::new("6"),
                delta: i64::MAX,
            })
            .then_state(|cart| assert_eq!(cart.lines[0].quantity, u32::MAX))
            .run();
    }

    #[test]
    fn update_absent_id_is_a_noop() {
        ReducerTest::new(CartReducer)
            .with_env(())
            .given_state(CartState::new())
            .when_action(CartAction::UpdateQuantity {
                id: ProductId::new("1"),
                delta: 1,
            })
            .then_state(|cart| assert!(cart.is_empty()))
            .run();
    }

    #[test]
    fn clear_keeps_drawer_flag() {
        let mut given = cart_with(&[("1", 1), ("2", 4)]);
        given.is_open = true;

        ReducerTest::new(CartReducer)
            .with_env(())
            .given_state(given)
            .when_action(CartAction::Clear)
            .then_state(|cart| {
                assert!(cart.is_empty());
                assert!(cart.is_open);
            })
            .run();
    }

    #[test]
    fn derived_totals() {
        let cart = cart_with(&[("1", 2), ("4", 3)]);
        assert_eq!(cart.subtotal(), Money::from_cents(2 * 34_999 + 3 * 7_500));
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.summary().total, cart.subtotal());
    }

    fn cart_action() -> impl Strategy<Value = CartAction> {
        let id = prop::sample::select(vec!["1", "2", "3", "4", "5", "6", "7"]);
        prop_oneof![
            id.clone().prop_filter_map("catalog product", |id| {
                Catalog::standard()
                    .get(&ProductId::new(id))
                    .cloned()
                    .map(|product| CartAction::Add { product })
            }),
            id.clone().prop_map(|id| CartAction::Remove { id: ProductId::new(id) }),
            (id, -5_i64..5).prop_map(|(id, delta)| CartAction::UpdateQuantity {
                id: ProductId::new(id),
                delta,
            }),
            Just(CartAction::Open),
            Just(CartAction::Close),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_sequence(actions in prop::collection::vec(cart_action(), 0..40)) {
            let mut cart = CartState::new();
            for action in actions {
                let _ = CartReducer.reduce(&mut cart, action, &());

                prop_assert!(cart.lines.iter().all(|line| line.quantity >= 1));
                let mut ids: Vec<_> = cart.lines.iter().map(|l| &l.product_id).collect();
                ids.sort();
                ids.dedup();
                prop_assert_eq!(ids.len(), cart.len());
                let total: u64 = cart.lines.iter().map(|l| l.unit_price.cents() * u64::from(l.quantity)).sum();
                prop_assert_eq!(cart.subtotal().cents(), total);
            }
        }

        #[test]
        fn add_raises_subtotal_by_unit_price(id in 1_u8..=6, preload in 0_u32..5) {
            let product = product(&id.to_string());
            let mut cart = CartState::new();
            for _ in 0..preload {
                let _ = CartReducer.reduce(&mut cart, CartAction::Add { product: product.clone() }, &());
            }
            let before = cart.subtotal();

            let _ = CartReducer.reduce(&mut cart, CartAction::Add { product: product.clone() }, &());

            prop_assert_eq!(cart.subtotal().cents() - before.cents(), product.price.cents());
            prop_assert_eq!(cart.line(&product.id).map(|l| l.quantity), Some(preload + 1));
        }
    }
}
