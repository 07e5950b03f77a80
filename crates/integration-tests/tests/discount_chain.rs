//! The discount apply, lookup, create, re-apply chain.

use seagrape_core::Market;
use seagrape_integration_tests::InMemoryBackend;
use seagrape_session::{CartSession, SessionConfig};

fn backend() -> InMemoryBackend {
    seagrape_integration_tests::init_tracing();
    let backend = InMemoryBackend::new();
    backend.insert_product(1, "Wool sweater", 10.0);
    backend
}

fn session(backend: &InMemoryBackend) -> CartSession<InMemoryBackend> {
    let market = Market::new("US", "United States", "USD", "$", "+1");
    CartSession::new(backend.clone(), SessionConfig::new(market, "seagrape"))
}

#[tokio::test]
async fn unknown_code_walks_the_full_chain_and_creates_it() {
    let backend = backend();
    let mut session = session(&backend);

    let applied = session
        .apply_or_create_discount("save10", 10, None, None, None)
        .await;

    assert!(applied);
    assert_eq!(session.state().last_discount_code.as_deref(), Some("SAVE10"));
    assert!(session.state().last_discount_id.is_some());

    let discount_calls: Vec<&str> = backend
        .calls()
        .into_iter()
        .filter(|call| call.starts_with("discount"))
        .collect();
    assert_eq!(
        discount_calls,
        [
            "discount_apply",
            "discounts_by_channel",
            "discounts",
            "discount_add",
            "discount_apply",
        ]
    );
}

#[tokio::test]
async fn existing_code_is_found_by_lookup_and_reapplied() {
    let backend = backend();
    backend.register_discount(7, "VIP", true);
    // First apply attempt reports not executed even though the code exists.
    backend.fail_next_applies(1);
    let mut session = session(&backend);

    let applied = session
        .apply_or_create_discount("vip", 15, None, None, None)
        .await;

    assert!(applied);
    assert_eq!(session.state().last_discount_id, Some(7));
    // The code existed, so no creation happened.
    assert!(!backend.calls().contains(&"discount_add"));
}

#[tokio::test]
async fn failed_creation_returns_false_without_panicking() {
    let backend = backend();
    backend.fail_discount_creation(true);
    let mut session = session(&backend);

    let applied = session
        .apply_or_create_discount("save10", 10, None, None, None)
        .await;

    assert!(!applied);
    assert_eq!(session.state().last_discount_code, None);
    assert!(session.state().error_message.is_some());
}

#[tokio::test]
async fn empty_code_is_rejected_without_a_network_call() {
    let backend = backend();
    let mut session = session(&backend);

    let applied = session.apply_or_create_discount("   ", 10, None, None, None).await;

    assert!(!applied);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn removing_the_applied_code_clears_tracking() {
    let backend = backend();
    backend.register_discount(1, "SAVE10", true);
    let mut session = session(&backend);
    assert!(session.apply_discount("save10").await);

    assert!(session.remove_applied_discount(None).await);
    assert_eq!(session.state().last_discount_code, None);
}

#[tokio::test]
async fn deleting_an_unrelated_discount_keeps_tracking() {
    let backend = backend();
    backend.register_discount(1, "SAVE10", true);
    backend.register_discount(2, "OTHER", false);
    let mut session = session(&backend);
    backend.fail_next_applies(1);
    session.apply_or_create_discount("save10", 10, None, None, None).await;
    assert_eq!(session.state().last_discount_id, Some(1));

    assert!(session.delete_discount(2).await);
    assert_eq!(session.state().last_discount_id, Some(1));

    assert!(session.delete_discount(1).await);
    assert_eq!(session.state().last_discount_id, None);
}
