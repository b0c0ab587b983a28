//! End-to-end session tests through the `Storefront` facade.

#![allow(clippy::unwrap_used, clippy::panic)]

use novamarket::assistant::service::CompletionService;
use novamarket::assistant::{
    AssistantEnvironment, DEFAULT_REQUEST_TIMEOUT, FAILURE_MESSAGE, GREETING, UNAVAILABLE_MESSAGE,
};
use novamarket::checkout::{CheckoutEnvironment, DEFAULT_CHECKOUT_DELAY};
use novamarket::mocks::{ScriptedCompletionService, ScriptedReply, SequentialOrderNumbers};
use novamarket::types::{AssistantTurn, Category, CategoryFilter, CheckoutStep, ProductId};
use novamarket::{Catalog, SessionEnvironment, Storefront};
use novamarket_testing::{init_test_tracing, test_clock};
use std::sync::Arc;
use std::time::Duration;

fn storefront(service: Option<Arc<dyn CompletionService>>) -> Storefront {
    init_test_tracing();
    let catalog = Arc::new(Catalog::standard());
    Storefront::new(SessionEnvironment::new(
        Arc::clone(&catalog),
        CheckoutEnvironment::new(
            DEFAULT_CHECKOUT_DELAY,
            Arc::new(test_clock()),
            Arc::new(SequentialOrderNumbers::starting_at(82_910)),
        ),
        AssistantEnvironment::new(service, catalog, DEFAULT_REQUEST_TIMEOUT),
    ))
}

fn id(raw: &str) -> ProductId {
    ProductId::new(raw)
}

#[tokio::test]
async fn category_and_search_filter_the_grid() {
    let store = storefront(None);

    store
        .select_category(CategoryFilter::Only(Category::Electronics))
        .await
        .unwrap();
    let names: Vec<_> = store.visible_products().await.into_iter().map(|p| p.name).collect();
    assert_eq!(names, ["Aether Noise-Cancelling Headphones", "Lumina Smart Watch Pro"]);

    store.select_category(CategoryFilter::All).await.unwrap();
    store.search("Organic").await.unwrap();
    let visible = store.visible_products().await;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, id("4"));

    store.search("no such thing").await.unwrap();
    assert!(store.visible_products().await.is_empty());
}

#[tokio::test]
async fn adding_twice_merges_and_quantity_clamps() {
    let store = storefront(None);

    assert!(store.add_to_cart(&id("3")).await.unwrap());
    assert!(store.add_to_cart(&id("3")).await.unwrap());
    assert!(!store.add_to_cart(&id("99")).await.unwrap());

    let cart = store.snapshot().await.cart;
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.lines[0].quantity, 2);
    assert!(cart.is_open);

    store.update_quantity(&id("3"), -100).await.unwrap();
    assert_eq!(store.snapshot().await.cart.lines[0].quantity, 1);

    store.remove_from_cart(&id("42")).await.unwrap();
    assert_eq!(store.snapshot().await.cart.len(), 1);
    store.remove_from_cart(&id("3")).await.unwrap();
    assert!(store.snapshot().await.cart.is_empty());
}

#[tokio::test(start_paused = true)]
async fn checkout_succeeds_only_after_the_delay() {
    let store = storefront(None);
    store.add_to_cart(&id("1")).await.unwrap();
    store.add_to_cart(&id("6")).await.unwrap();

    let mut placed = store.checkout().await.unwrap();

    let state = store.snapshot().await;
    assert!(state.checkout.is_processing());
    assert!(!state.cart.is_open);
    assert_eq!(state.cart.len(), 2);

    tokio::time::sleep(DEFAULT_CHECKOUT_DELAY - Duration::from_millis(1)).await;
    let state = store.snapshot().await;
    assert!(state.checkout.is_processing());
    assert_eq!(state.cart.len(), 2);

    placed.wait().await;
    let state = store.snapshot().await;
    assert!(state.cart.is_empty());
    match &state.checkout {
        CheckoutStep::Success(confirmation) => {
            assert_eq!(confirmation.reference, "NV-82910");
            assert_eq!(confirmation.item_count, 2);
            assert_eq!(confirmation.total.to_string(), "$469.99");
        },
        other => panic!("expected success, got {other:?}"),
    }

    store.continue_exploring().await.unwrap();
    assert_eq!(store.snapshot().await.checkout, CheckoutStep::Browsing);
}

#[tokio::test(start_paused = true)]
async fn second_checkout_while_processing_is_ignored() {
    let store = storefront(None);
    store.add_to_cart(&id("2")).await.unwrap();

    let mut first = store.checkout().await.unwrap();
    let mut second = store.checkout().await.unwrap();
    assert_eq!(second.pending(), 0);
    second.wait().await;

    first.wait().await;
    assert!(matches!(store.snapshot().await.checkout, CheckoutStep::Success(_)));
}

#[tokio::test]
async fn checkout_with_empty_cart_stays_browsing() {
    let store = storefront(None);

    let handle = store.checkout().await.unwrap();

    assert_eq!(handle.pending(), 0);
    assert_eq!(store.snapshot().await.checkout, CheckoutStep::Browsing);
}

#[tokio::test]
async fn assistant_without_credential_replies_unavailable() {
    let store = storefront(None);

    let reply = store.ask("gift ideas").await.unwrap();

    assert_eq!(reply.as_deref(), Some(UNAVAILABLE_MESSAGE));
    let transcript = store.snapshot().await.assistant.transcript;
    assert_eq!(
        transcript,
        [
            AssistantTurn::assistant(GREETING),
            AssistantTurn::user("gift ideas"),
            AssistantTurn::assistant(UNAVAILABLE_MESSAGE),
        ]
    );
}

#[tokio::test]
async fn assistant_failure_appends_fallback_and_clears_flag() {
    let store = storefront(Some(Arc::new(ScriptedCompletionService::failing(
        "connection refused",
    ))));

    let reply = store.ask("Do you sell lamps?").await.unwrap();

    assert_eq!(reply.as_deref(), Some(FAILURE_MESSAGE));
    let assistant = store.snapshot().await.assistant;
    assert!(!assistant.awaiting_response);
    assert_eq!(
        assistant.transcript[1..],
        [
            AssistantTurn::user("Do you sell lamps?"),
            AssistantTurn::assistant(FAILURE_MESSAGE),
        ]
    );
}

#[tokio::test]
async fn assistant_reply_uses_cart_context() {
    let service = ScriptedCompletionService::replying("The **Aether** headphones pair nicely.");
    let store = storefront(Some(Arc::new(service.clone())));
    store.add_to_cart(&id("2")).await.unwrap();

    let reply = store.ask("  What goes with my watch?  ").await.unwrap();

    assert_eq!(reply.as_deref(), Some("The **Aether** headphones pair nicely."));
    let calls = service.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].message, "What goes with my watch?");
    assert!(calls[0]
        .context
        .contains("Current items in user's cart: Lumina Smart Watch Pro (Qty: 1)"));
}

#[tokio::test]
async fn panicking_service_still_clears_the_flag() {
    let service = ScriptedCompletionService::new([
        ScriptedReply::Panic("decoder blew up".to_string()),
        ScriptedReply::Text("Back online.".to_string()),
    ]);
    let store = storefront(Some(Arc::new(service)));

    let first = store.ask("hi").await.unwrap();

    assert_eq!(first.as_deref(), Some(FAILURE_MESSAGE));
    let assistant = store.snapshot().await.assistant;
    assert!(!assistant.awaiting_response);
    assert_eq!(assistant.transcript.len(), 3);

    let second = store.ask("again").await.unwrap();
    assert_eq!(second.as_deref(), Some("Back online."));
}

#[tokio::test]
async fn rejected_question_never_returns_the_greeting() {
    let store = storefront(None);

    assert_eq!(store.ask("").await.unwrap(), None);
    assert_eq!(store.ask("\t ").await.unwrap(), None);
    assert_eq!(store.snapshot().await.assistant.transcript.len(), 1);
}

#[tokio::test]
async fn stock_does_not_cap_quantity() {
    let store = storefront(None);
    let table = id("5");
    assert_eq!(store.product(&table).unwrap().stock, 3);

    for _ in 0..4 {
        assert!(store.add_to_cart(&table).await.unwrap());
    }

    let cart = store.snapshot().await.cart;
    assert_eq!(cart.line(&table).unwrap().quantity, 4);
    assert_eq!(cart.item_count(), 4);
}

#[tokio::test]
async fn blank_question_is_rejected() {
    let service = ScriptedCompletionService::replying("unused");
    let store = storefront(Some(Arc::new(service.clone())));

    assert_eq!(store.ask("   ").await.unwrap(), None);
    assert_eq!(store.snapshot().await.assistant.transcript.len(), 1);
    assert!(service.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn question_while_in_flight_is_rejected() {
    let service = ScriptedCompletionService::new([ScriptedReply::Slow(
        Duration::from_secs(2),
        "Here are three ideas.".to_string(),
    )]);
    let store = Arc::new(storefront(Some(Arc::new(service.clone()))));

    let first = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.ask("first").await }
    });
    while !store.snapshot().await.assistant.awaiting_response {
        tokio::task::yield_now().await;
    }

    assert_eq!(store.ask("second").await.unwrap(), None);

    let reply = first.await.unwrap().unwrap();
    assert_eq!(reply.as_deref(), Some("Here are three ideas."));
    assert_eq!(service.calls().len(), 1);
    assert_eq!(store.snapshot().await.assistant.transcript.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn shutdown_waits_for_pending_checkout() {
    let store = storefront(None);
    store.add_to_cart(&id("5")).await.unwrap();
    let _placed = store.checkout().await.unwrap();

    store.shutdown(Duration::from_secs(10)).await.unwrap();

    assert!(matches!(store.snapshot().await.checkout, CheckoutStep::Success(_)));
    assert!(store.add_to_cart(&id("1")).await.is_err());
}
