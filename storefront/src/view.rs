//! Plain-text rendering of the session for the terminal front end.

use crate::cart::CartState;
use crate::filter::CatalogView;
use crate::types::{AssistantTurn, CategoryFilter, CheckoutStep, Product, Role};
use std::fmt::Write as _;

/// Category bar, result count and product rows, or the empty state
#[must_use]
pub fn product_grid(products: &[Product], view: &CatalogView) -> String {
    let mut out = categories(view.category);
    if !view.search.is_empty() {
        let _ = write!(out, "  search: \"{}\"", view.search);
    }
    let _ = writeln!(out, "\nShowing {} results\n", products.len());

    if products.is_empty() {
        out.push_str("No items found\nTry adjusting your filters or search query.\n");
        return out;
    }
    for product in products {
        let _ = writeln!(
            out,
            "  [{}] {:<36} {:>9}  {:<11} {:.1}* ({})",
            product.id,
            product.name,
            product.price.to_string(),
            product.category.label(),
            product.rating,
            product.reviews
        );
    }
    out
}

/// All filter options with the active one bracketed
#[must_use]
pub fn categories(active: CategoryFilter) -> String {
    CategoryFilter::options()
        .into_iter()
        .map(|option| {
            if option == active {
                format!("[{option}]")
            } else {
                option.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Full product card
#[must_use]
pub fn product_detail(product: &Product) -> String {
    format!(
        "{name}\n{category} | {price} | {rating:.1}* from {reviews} reviews | {stock} in stock\n{description}\n{image}\n",
        name = product.name,
        category = product.category,
        price = product.price,
        rating = product.rating,
        reviews = product.reviews,
        stock = product.stock,
        description = product.description,
        image = product.image,
    )
}

/// The cart drawer
#[must_use]
pub fn cart_drawer(cart: &CartState) -> String {
    let mut out = format!("Your Selection ({} items)\n", cart.item_count());
    if cart.is_empty() {
        out.push_str("Your cart is feeling light.\n");
        return out;
    }
    for line in &cart.lines {
        let _ = writeln!(
            out,
            "  [{}] {:<36} {} x {}  = {}",
            line.product_id,
            line.name,
            line.quantity,
            line.unit_price,
            line.line_total()
        );
    }
    let _ = write!(
        out,
        "Subtotal {}\nTaxes and shipping calculated at checkout.\n",
        cart.subtotal()
    );
    out
}

/// The checkout overlay, or `None` while browsing
#[must_use]
pub fn checkout_overlay(step: &CheckoutStep) -> Option<String> {
    match step {
        CheckoutStep::Browsing => None,
        CheckoutStep::Processing { .. } => Some(
            "Securing your order...\nVerifying payment with our premium network.\n".to_string(),
        ),
        CheckoutStep::Success(confirmation) => Some(format!(
            "A Remarkable Choice.\nYour order #{} has been placed ({} items, {}). \
             You'll receive a confirmation email shortly with your tracking details.\n\
             Type `continue` to keep exploring.\n",
            confirmation.reference, confirmation.item_count, confirmation.total
        )),
    }
}

/// One transcript turn
#[must_use]
pub fn turn(turn: &AssistantTurn) -> String {
    let speaker = match turn.role {
        Role::User => "you",
        Role::Assistant => "nova",
    };
    format!("{speaker}> {}", turn.text)
}

/// The whole transcript
#[must_use]
pub fn transcript(turns: &[AssistantTurn]) -> String {
    turns.iter().map(turn).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::{CartLine, Category, Money, OrderConfirmation};
    use chrono::Utc;

    #[test]
    fn grid_shows_count_and_rows() {
        let catalog = Catalog::standard();
        let view = CatalogView::default();
        let text = product_grid(catalog.products(), &view);

        assert!(text.starts_with("[All]  Electronics"));
        assert!(text.contains("Showing 6 results"));
        assert!(text.contains("[4] Zenith Organic Essential Kit"));
        assert!(text.contains("$349.99"));
    }

    #[test]
    fn empty_grid_shows_empty_state() {
        let view = CatalogView {
            category: CategoryFilter::Only(Category::Home),
            search: "watch".to_string(),
        };
        let text = product_grid(&[], &view);

        assert!(text.contains("[Home]"));
        assert!(text.contains("search: \"watch\""));
        assert!(text.contains("Showing 0 results"));
        assert!(text.contains("No items found"));
    }

    #[test]
    fn drawer_shows_lines_and_subtotal() {
        let catalog = Catalog::standard();
        let mut line = CartLine::from_product(&catalog.products()[3]);
        line.quantity = 2;
        let cart = CartState {
            lines: vec![line],
            is_open: true,
        };

        let text = cart_drawer(&cart);

        assert!(text.starts_with("Your Selection (2 items)"));
        assert!(text.contains("2 x $75.00  = $150.00"));
        assert!(text.contains("Subtotal $150.00"));
    }

    #[test]
    fn empty_drawer() {
        assert!(cart_drawer(&CartState::default()).contains("feeling light"));
    }

    #[test]
    fn overlay_per_step() {
        assert_eq!(checkout_overlay(&CheckoutStep::Browsing), None);

        let success = CheckoutStep::Success(OrderConfirmation {
            reference: "NV-82910".to_string(),
            placed_at: Utc::now(),
            item_count: 1,
            total: Money::from_cents(12_000),
        });
        let text = checkout_overlay(&success).unwrap_or_default();
        assert!(text.contains("Your order #NV-82910 has been placed (1 items, $120.00)"));
    }

    #[test]
    fn transcript_prefixes_speakers() {
        let text = transcript(&[AssistantTurn::assistant("Hello"), AssistantTurn::user("Hi")]);
        assert_eq!(text, "nova> Hello\nyou> Hi");
    }
}
