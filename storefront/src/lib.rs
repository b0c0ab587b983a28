//! NovaMarket storefront session.
//!
//! A shopper's session is one [`SessionState`] value driven by
//! [`SessionReducer`] on a store runtime:
//!
//! - catalog browsing with category and text filtering ([`filter`])
//! - a cart with merge-by-product lines ([`cart`])
//! - a mock checkout with simulated latency ([`checkout`])
//! - Nova, a shopping assistant backed by an injectable
//!   [`CompletionService`](assistant::service::CompletionService) ([`assistant`])
//!
//! [`Storefront`] wraps the store with task-level operations.
//!
//! # Quick Start
//!
//! ```no_run
//! use novamarket::{Catalog, Storefront, StorefrontConfig};
//! use novamarket::types::ProductId;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StorefrontConfig::from_env()?;
//! let storefront = Storefront::new(config.session_environment(Arc::new(Catalog::standard())));
//!
//! storefront.add_to_cart(&ProductId::new("1")).await?;
//! let reply = storefront.ask("What pairs well with these headphones?").await?;
//! println!("{}", reply.unwrap_or_default());
//!
//! let mut placed = storefront.checkout().await?;
//! placed.wait().await;
//! # Ok(())
//! # }
//! ```

pub mod assistant;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod cli;
pub mod config;
pub mod filter;
pub mod mocks;
pub mod session;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use assistant::{AssistantAction, AssistantEnvironment, AssistantReducer, AssistantState};
pub use cart::{CartAction, CartReducer, CartState};
pub use catalog::Catalog;
pub use checkout::{CheckoutAction, CheckoutEnvironment, CheckoutReducer};
pub use config::{ConfigError, StorefrontConfig};
pub use filter::{CatalogAction, CatalogView, MemoizedFilter, filter};
pub use session::{SessionAction, SessionEnvironment, SessionReducer, SessionState, Storefront};
