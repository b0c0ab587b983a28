//! The product catalog.
//!
//! Built once at startup and shared read-only through `Arc<Catalog>`.

use crate::types::{Category, Money, Product, ProductId};

/// Immutable, ordered product list
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Creates a catalog from products in display order
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The NovaMarket house collection
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            product(
                "1",
                "Aether Noise-Cancelling Headphones",
                34_999,
                Category::Electronics,
                "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?auto=format&fit=crop&w=800&q=80",
                "Experience studio-quality sound with our flagship hybrid active noise-cancelling technology.",
                (4.9, 1240, 15),
            ),
            product(
                "2",
                "Lumina Smart Watch Pro",
                29_900,
                Category::Electronics,
                "https://images.unsplash.com/photo-1523275335684-37898b6baf30?auto=format&fit=crop&w=800&q=80",
                "Stay connected and track your health metrics with precision using the latest Lumina OS.",
                (4.8, 856, 22),
            ),
            product(
                "3",
                "Onyx Silk Minimalist Tote",
                18_500,
                Category::Fashion,
                "https://images.unsplash.com/photo-1584917033904-491a34d2aed1?auto=format&fit=crop&w=800&q=80",
                "Handcrafted premium leather tote designed for the modern urban professional.",
                (4.7, 420, 8),
            ),
            product(
                "4",
                "Zenith Organic Essential Kit",
                7_500,
                Category::Wellness,
                "https://images.unsplash.com/photo-1540555700478-4be289fbecef?auto=format&fit=crop&w=800&q=80",
                "A curated set of 100% organic essential oils for deep relaxation and focus.",
                (4.9, 310, 50),
            ),
            product(
                "5",
                "Nordic Oak Coffee Table",
                45_000,
                Category::Home,
                "https://images.unsplash.com/photo-1533090161767-e6ffed986c88?auto=format&fit=crop&w=800&q=80",
                "Sustainably sourced solid oak table with a minimalist Scandinavian design aesthetic.",
                (4.6, 150, 3),
            ),
            product(
                "6",
                "Velvet Cloud Skincare Set",
                12_000,
                Category::Beauty,
                "https://images.unsplash.com/photo-1556227702-d1e4e7b5c232?auto=format&fit=crop&w=800&q=80",
                "A complete 5-step hydration system for glowing, radiant skin throughout the day.",
                (5.0, 2100, 45),
            ),
        ])
    }

    /// All products in display order
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Looks up a product by id
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Number of products
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` if the catalog has no products
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn product(
    id: &str,
    name: &str,
    cents: u64,
    category: Category,
    image: &str,
    description: &str,
    (rating, reviews, stock): (f32, u32, u32),
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Money::from_cents(cents),
        category,
        image: image.to_string(),
        description: description.to_string(),
        rating,
        reviews,
        stock,
    }
}
