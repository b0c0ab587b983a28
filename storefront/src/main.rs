//! NovaMarket terminal storefront.
//!
//! ## Usage
//!
//! Optionally set an API key to enable the assistant:
//! ```bash
//! export GEMINI_API_KEY="your-key-here"
//! ```
//!
//! Then run:
//! ```bash
//! cargo run --bin novamarket
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=novamarket=debug` for reducer traces.

use novamarket::cli::{Command, HELP};
use novamarket::{view, Catalog, Storefront, StorefrontConfig};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("novamarket=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = StorefrontConfig::from_env()?;
    tracing::info!(?config, "Configuration loaded");

    let storefront = Storefront::new(config.session_environment(Arc::new(Catalog::standard())));

    println!("=== NovaMarket ===");
    if config.api_key.is_none() {
        println!("(Nova is offline: set GEMINI_API_KEY to enable the assistant)");
    }
    println!("Type `help` for commands.\n");
    run_list(&storefront).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&storefront).await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => run(&storefront, command).await?,
            Err(error) => println!("{error}"),
        }
    }

    println!("\nGoodbye!");
    storefront.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}

async fn prompt(storefront: &Storefront) -> std::io::Result<()> {
    let badge = storefront.snapshot().await.cart.item_count();
    print!("novamarket [cart: {badge}]> ");
    std::io::stdout().flush()
}

async fn run(storefront: &Storefront, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::List => run_list(storefront).await,
        Command::Categories => {
            println!("{}", view::categories(storefront.snapshot().await.catalog.category));
        },
        Command::Category(category) => {
            storefront.select_category(category).await?;
            run_list(storefront).await;
        },
        Command::Search(text) => {
            storefront.search(text).await?;
            run_list(storefront).await;
        },
        Command::Show(id) => match storefront.product(&id) {
            Some(product) => println!("{}", view::product_detail(product)),
            None => println!("No product with id {id}"),
        },
        Command::Add(id) => {
            if storefront.add_to_cart(&id).await? {
                println!("{}", view::cart_drawer(&storefront.snapshot().await.cart));
            } else {
                println!("No product with id {id}");
            }
        },
        Command::Remove(id) => {
            storefront.remove_from_cart(&id).await?;
            println!("{}", view::cart_drawer(&storefront.snapshot().await.cart));
        },
        Command::Adjust(id, delta) => {
            storefront.update_quantity(&id, delta).await?;
            println!("{}", view::cart_drawer(&storefront.snapshot().await.cart));
        },
        Command::Cart => {
            storefront.set_cart_open(true).await?;
            println!("{}", view::cart_drawer(&storefront.snapshot().await.cart));
        },
        Command::Close => storefront.set_cart_open(false).await?,
        Command::Checkout => {
            if storefront.snapshot().await.cart.is_empty() {
                println!("Your cart is feeling light. Add something first.");
                return Ok(());
            }
            let mut placed = storefront.checkout().await?;
            if let Some(overlay) = view::checkout_overlay(&storefront.snapshot().await.checkout) {
                println!("{overlay}");
            }
            placed.wait().await;
            if let Some(overlay) = view::checkout_overlay(&storefront.snapshot().await.checkout) {
                println!("{overlay}");
            }
        },
        Command::Continue => {
            storefront.continue_exploring().await?;
            run_list(storefront).await;
        },
        Command::Ask(text) => match storefront.ask(text).await? {
            Some(reply) => println!("nova> {reply}\n"),
            None => println!("(Nova is still answering your previous question)"),
        },
        Command::Chat => {
            println!("{}\n", view::transcript(&storefront.snapshot().await.assistant.transcript));
        },
        Command::Snapshot => {
            println!("{}", serde_json::to_string_pretty(&storefront.snapshot().await)?);
        },
        Command::Help => println!("{HELP}"),
        Command::Quit => {},
    }
    Ok(())
}

async fn run_list(storefront: &Storefront) {
    let products = storefront.visible_products().await;
    let state = storefront.snapshot().await;
    println!("{}", view::product_grid(&products, &state.catalog));
}
