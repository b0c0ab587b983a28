//! The context block sent with every assistant request.

use crate::catalog::Catalog;
use crate::types::CartLine;
use std::fmt::Write as _;

/// Persona, catalog and cart, as a single system instruction
#[must_use]
pub fn system_instruction(catalog: &Catalog, cart: &[CartLine]) -> String {
    format!(
        "You are Nova, the elite AI shopping assistant for NovaMarket.\n\
         Your personality: Professional, helpful, slightly luxurious, and concise.\n\
         Your goal: Help users find products, give gift advice based on NovaMarket's catalog, and answer product questions.\n\
         \n\
         Catalog Context:\n\
         {catalog}\n\
         \n\
         Shopping Context:\n\
         {cart}\n\
         \n\
         If the user asks for something we don't have, politely suggest the closest alternative from our catalog.\n\
         Always format your response using professional markdown.",
        catalog = catalog_context(catalog),
        cart = cart_context(cart),
    )
}

/// One `name ($price) in category: description` line per product
#[must_use]
pub fn catalog_context(catalog: &Catalog) -> String {
    let mut out = String::new();
    for (i, product) in catalog.products().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(
            out,
            "{} ({}) in {}: {}",
            product.name,
            product.price.compact(),
            product.category,
            product.description
        );
    }
    out
}

/// Cart lines as `name (Qty: n)`, or a note that the cart is empty
#[must_use]
pub fn cart_context(cart: &[CartLine]) -> String {
    if cart.is_empty() {
        return "The user's cart is empty.".to_string();
    }
    let items: Vec<String> = cart
        .iter()
        .map(|line| format!("{} (Qty: {})", line.name, line.quantity))
        .collect();
    format!("Current items in user's cart: {}", items.join(", "))
}
