//! Domain types for the storefront.
//!
//! Everything here is plain data: products are immutable catalog entries,
//! cart lines copy the display fields they need, and money is kept in
//! integer cents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier for a catalog product
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a `ProductId` from any string-like value
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Product category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Headphones, watches and other devices
    Electronics,
    /// Bags and apparel
    Fashion,
    /// Furniture
    Home,
    /// Skincare
    Beauty,
    /// Wellness kits
    Wellness,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Self; 5] = [
        Self::Electronics,
        Self::Fashion,
        Self::Home,
        Self::Beauty,
        Self::Wellness,
    ];

    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Fashion => "Fashion",
            Self::Home => "Home",
            Self::Beauty => "Beauty",
            Self::Wellness => "Wellness",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A label that names no category
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(wanted.to_string()))
    }
}

/// Active category selection: everything, or one category
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryFilter {
    /// The "All" sentinel
    #[default]
    All,
    /// A single category
    Only(Category),
}

impl CategoryFilter {
    /// Filter options in display order, starting with "All"
    #[must_use]
    pub fn options() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(Category::ALL.into_iter().map(Self::Only))
            .collect()
    }

    /// Returns `true` if `category` passes this filter
    #[must_use]
    pub fn admits(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(category) => category.label(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// A non-negative amount of money in cents
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(u64);

impl Money {
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Creates an amount from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// The amount in cents
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// `self × quantity`, saturating
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Shortest form, as a number would print in the assistant context:
    /// `$299`, `$12.5`, `$349.99`
    #[must_use]
    pub fn compact(self) -> String {
        let dollars = self.0 / 100;
        let cents = self.0 % 100;
        match (cents, cents % 10) {
            (0, _) => format!("${dollars}"),
            (_, 0) => format!("${dollars}.{}", cents / 10),
            _ => format!("${dollars}.{cents:02}"),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// A catalog entry. Never mutated after the catalog is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: Money,
    /// Category
    pub category: Category,
    /// Image URL
    pub image: String,
    /// Description text, searched alongside the name
    pub description: String,
    /// Average rating out of 5
    pub rating: f32,
    /// Number of reviews
    pub reviews: u32,
    /// Units in stock (display only)
    pub stock: u32,
}

/// One product's aggregated quantity in the cart
///
/// Holds a copy of the product's display fields taken when the line was
/// created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product this line is for
    pub product_id: ProductId,
    /// Product name at the time it was added
    pub name: String,
    /// Unit price at the time it was added
    pub unit_price: Money,
    /// Product category
    pub category: Category,
    /// Image URL
    pub image: String,
    /// Always at least 1
    pub quantity: u32,
}

impl CartLine {
    /// A new line with quantity 1
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            category: product.category,
            image: product.image.clone(),
            quantity: 1,
        }
    }

    /// `unit_price × quantity`
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// Speaker of a transcript turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The shopper
    User,
    /// The assistant
    Assistant,
}

/// One message in the assistant transcript
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantTurn {
    /// Who said it
    pub role: Role,
    /// What was said
    pub text: String,
}

impl AssistantTurn {
    /// A shopper turn
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// An assistant turn
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Item count and total of a cart at one point in time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    /// Sum of line quantities
    pub item_count: u32,
    /// Sum of line totals
    pub total: Money,
}

/// Display-only acknowledgment of a completed mock checkout
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Order reference, e.g. `NV-82910`
    pub reference: String,
    /// When the order was placed
    pub placed_at: DateTime<Utc>,
    /// Items in the order
    pub item_count: u32,
    /// Amount charged
    pub total: Money,
}

/// Checkout phase of the session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutStep {
    /// Shopping; checkout may begin
    #[default]
    Browsing,
    /// Simulated payment in progress
    Processing {
        /// Cart at the time checkout began
        summary: CartSummary,
    },
    /// Order placed
    Success(OrderConfirmation),
}

impl CheckoutStep {
    /// Returns `true` while the simulated payment is running
    #[must_use]
    pub const fn is_processing(&self) -> bool {
        matches!(self, Self::Processing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_displays_two_decimals() {
        assert_eq!(Money::from_cents(34_999).to_string(), "$349.99");
        assert_eq!(Money::from_cents(29_900).to_string(), "$299.00");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
    }

    #[test]
    fn money_compact_drops_trailing_zero_cents() {
        assert_eq!(Money::from_cents(29_900).compact(), "$299");
        assert_eq!(Money::from_cents(1_250).compact(), "$12.5");
        assert_eq!(Money::from_cents(34_999).compact(), "$349.99");
        assert_eq!(Money::from_cents(7).compact(), "$0.07");
    }

    #[test]
    fn money_times_saturates() {
        assert_eq!(Money::from_cents(u64::MAX).times(2), Money::from_cents(u64::MAX));
    }

    #[test]
    fn category_filter_parses_case_insensitively() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            " electronics ".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(Category::Electronics))
        );
        assert_eq!(
            "Toys".parse::<CategoryFilter>(),
            Err(UnknownCategory("Toys".to_string()))
        );
    }

    #[test]
    fn options_start_with_all() {
        let labels: Vec<_> = CategoryFilter::options()
            .into_iter()
            .map(CategoryFilter::label)
            .collect();
        assert_eq!(
            labels,
            ["All", "Electronics", "Fashion", "Home", "Beauty", "Wellness"]
        );
    }
}
