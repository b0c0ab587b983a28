//! # Gemini API Client
//!
//! Minimal client for Google's Gemini `generateContent` endpoint: a single
//! non-streaming call with an optional system instruction and sampling
//! parameters.
//!
//! ## Example
//!
//! ```no_run
//! use novamarket_gemini::{GeminiClient, GenerateContentRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GEMINI_API_KEY (or API_KEY)
//!     let client = GeminiClient::from_env()?;
//!
//!     let request = GenerateContentRequest::user("Suggest a gift under $200")
//!         .with_system_instruction("You are a concise shopping assistant.")
//!         .with_temperature(0.7);
//!
//!     let response = client.generate_content(&request).await?;
//!     println!("{}", response.text().unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod generate;
pub mod types;

pub use client::{DEFAULT_API_URL, DEFAULT_MODEL, GeminiClient};
pub use error::GeminiError;
pub use generate::{Candidate, GenerateContentRequest, GenerateContentResponse};
pub use types::{Content, GenerationConfig, Part, Role, UsageMetadata};
