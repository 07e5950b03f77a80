//! Shipping aggregation, pending selections, and the commit loop.

use rust_decimal::Decimal;
use seagrape_core::Market;
use seagrape_integration_tests::InMemoryBackend;
use seagrape_session::{CartSession, SessionConfig};

fn backend() -> InMemoryBackend {
    seagrape_integration_tests::init_tracing();
    let backend = InMemoryBackend::new();
    backend.insert_product_with_supplier(1, "Wool sweater", 10.0, "knitwear");
    backend.insert_product_with_supplier(2, "Clogs", 20.0, "footwear");
    backend
}

async fn session_with_items(backend: &InMemoryBackend) -> CartSession<InMemoryBackend> {
    let market = Market::new("US", "United States", "USD", "$", "+1");
    let mut session =
        CartSession::new(backend.clone(), SessionConfig::new(market, "seagrape"));
    assert!(session.load_products(None, None, false).await);
    let sweater = session.state().products[0].clone();
    let clogs = session.state().products[1].clone();
    session.add_item(&sweater, None, 1).await;
    session.add_item(&clogs, None, 1).await;
    assert!(session.refresh_shipping_options().await);
    session
}

fn item_id(session: &CartSession<InMemoryBackend>, product_id: i64) -> String {
    session
        .state()
        .items
        .iter()
        .find(|item| item.product_id == product_id)
        .map(|item| item.id.clone())
        .expect("line item")
}

#[tokio::test]
async fn refresh_attaches_options_per_supplier_group() {
    let backend = backend();
    let session = session_with_items(&backend).await;

    for item in &session.state().items {
        let ids: Vec<&str> = item
            .available_shippings
            .iter()
            .map(|option| option.id.as_str())
            .collect();
        assert_eq!(ids, ["ship-standard", "ship-express"]);
    }
}

#[tokio::test]
async fn pending_selection_survives_a_concurrent_refresh() {
    let backend = backend();
    let mut session = session_with_items(&backend).await;
    let sweater = item_id(&session, 1);

    assert!(session.set_shipping_option(&sweater, "ship-express"));
    assert_eq!(session.state().shipping_total, Decimal::new(900, 2));

    // A background refresh reports no selection for the item; the pending
    // local choice must win until committed.
    assert!(session.refresh_shipping_options().await);

    let item = &session.state().items[session
        .state()
        .items
        .iter()
        .position(|item| item.id == sweater)
        .expect("sweater line")];
    assert_eq!(item.shipping_id.as_deref(), Some("ship-express"));
    assert_eq!(session.state().shipping_total, Decimal::new(900, 2));
}

#[tokio::test]
async fn commit_sends_each_pending_selection_once() {
    let backend = backend();
    let mut session = session_with_items(&backend).await;
    let sweater = item_id(&session, 1);
    let clogs = item_id(&session, 2);

    session.set_shipping_option(&sweater, "ship-standard");
    session.set_shipping_option(&clogs, "ship-express");

    let updated = session.commit_pending_shipping().await;

    assert_eq!(updated, 2);
    assert!(session.state().pending_shipping.is_empty());
    assert_eq!(session.state().shipping_total, Decimal::new(1400, 2));
}

#[tokio::test]
async fn failed_line_stays_pending_without_blocking_others() {
    let backend = backend();
    let mut session = session_with_items(&backend).await;
    let sweater = item_id(&session, 1);
    let clogs = item_id(&session, 2);

    session.set_shipping_option(&sweater, "ship-standard");
    session.set_shipping_option(&clogs, "ship-standard");
    backend.fail_shipping_update_for(&clogs);

    let updated = session.commit_pending_shipping().await;

    assert_eq!(updated, 1);
    assert!(session.state().pending_shipping.contains_key(&clogs));
    assert!(!session.state().pending_shipping.contains_key(&sweater));
    // One selection confirmed remotely, one still applied optimistically.
    assert_eq!(session.state().shipping_total, Decimal::new(1000, 2));
}
