//! Checkout creation and payment provider orchestration.

use seagrape_client::payloads::{
    CheckoutUpdateInput, KlarnaNativeConfirmInput, KlarnaNativeInitInput,
};
use seagrape_core::{Market, PaymentStatus};
use seagrape_integration_tests::InMemoryBackend;
use seagrape_session::{CartSession, SessionConfig};

fn backend() -> InMemoryBackend {
    seagrape_integration_tests::init_tracing();
    let backend = InMemoryBackend::new();
    backend.insert_product(1, "Wool sweater", 10.0);
    backend
}

fn session(backend: &InMemoryBackend) -> CartSession<InMemoryBackend> {
    let market = Market::new("NO", "Norway", "NOK", "kr", "+47");
    CartSession::new(backend.clone(), SessionConfig::new(market, "seagrape"))
}

#[tokio::test]
async fn checkout_id_is_extracted_from_aliased_field() {
    let backend = backend();
    let mut session = session(&backend);

    let checkout_id = session.create_checkout().await.expect("checkout id");

    assert!(checkout_id.starts_with("chk-"));
    assert_eq!(session.state().checkout_id.as_deref(), Some(checkout_id.as_str()));
    // The cart was created lazily on the way.
    assert!(session.state().cart_id.is_some());
}

#[tokio::test]
async fn update_without_an_id_creates_the_checkout_first() {
    let backend = backend();
    let mut session = session(&backend);

    let input = CheckoutUpdateInput {
        email: Some("buyer@example.com".to_string()),
        ..CheckoutUpdateInput::default()
    };
    let updated = session.update_checkout(None, &input).await.expect("checkout id");

    let calls = backend.calls();
    let created = calls
        .iter()
        .position(|call| *call == "checkout_create")
        .expect("create call");
    let sent = calls
        .iter()
        .position(|call| *call == "checkout_update")
        .expect("update call");
    assert!(created < sent);
    // The backend rotated the id; the caller and the session must agree.
    assert!(updated.ends_with("-updated"));
    assert_eq!(session.state().checkout_id.as_deref(), Some(updated.as_str()));
}

#[tokio::test]
async fn klarna_redirect_init_returns_the_order_snippet() {
    let backend = backend();
    let mut session = session(&backend);

    let init = session
        .klarna_init("NO", "https://shop.example.com/checkout", Some("buyer@example.com"))
        .await
        .expect("klarna order");

    assert_eq!(init.order_id, "klarna-order-1");
    assert!(init.html_snippet.is_some());
    assert!(session.state().checkout_id.is_some());
}

#[tokio::test]
async fn stripe_link_returns_the_hosted_url() {
    let backend = backend();
    let mut session = session(&backend);

    let link = session
        .stripe_link("https://shop.example.com/done", "card", "buyer@example.com")
        .await
        .expect("payment link");

    assert!(link.checkout_url.starts_with("https://"));
    assert!(backend.calls().contains(&"payment_stripe_link"));
}

#[tokio::test]
async fn payment_calls_create_the_checkout_lazily() {
    let backend = backend();
    let mut session = session(&backend);

    let intent = session.stripe_intent(Some(true)).await.expect("intent");

    assert_eq!(intent.client_secret, "pi_secret");
    assert_eq!(intent.ephemeral_key.as_deref(), Some("ek_test"));
    assert!(session.state().checkout_id.is_some());
    assert!(backend.calls().contains(&"checkout_create"));
}

#[tokio::test]
async fn klarna_native_init_writes_back_the_rotated_checkout_id() {
    let backend = backend();
    let mut session = session(&backend);
    let original = session.create_checkout().await.expect("checkout id");

    let init = session
        .klarna_native_init(&KlarnaNativeInitInput::default())
        .await
        .expect("klarna session");

    assert_eq!(init.checkout_id, format!("{original}-klarna"));
    assert_eq!(
        session.state().checkout_id.as_deref(),
        Some(init.checkout_id.as_str())
    );

    // The follow-up confirm targets the rotated checkout.
    let confirm = session
        .klarna_native_confirm(&KlarnaNativeConfirmInput {
            authorization_token: "auth-token".to_string(),
            ..KlarnaNativeConfirmInput::default()
        })
        .await
        .expect("confirmation");
    assert_eq!(confirm.checkout_id.as_deref(), Some(init.checkout_id.as_str()));

    let order = session
        .klarna_native_order(&confirm.order_id, None)
        .await
        .expect("order");
    assert_eq!(order.status.as_deref(), Some("AUTHORIZED"));
}

#[tokio::test]
async fn vipps_flow_tracks_and_completes_via_return_url() {
    let backend = backend();
    let mut session = session(&backend);

    let init = session
        .vipps_init("buyer@example.com", "seagrape://payment-return")
        .await
        .expect("vipps redirect");
    assert!(init.payment_url.starts_with("https://"));
    assert_eq!(session.payment_status(), PaymentStatus::InProgress);

    let checkout_id = session.state().checkout_id.clone().expect("checkout id");
    let url = format!(
        "seagrape://payment-return?payment_method=vipps&status=success&checkout_id={checkout_id}"
    );
    assert!(session.is_vipps_return_url(&url));

    let status = session.handle_return_url(&url);
    assert_eq!(status, Some(PaymentStatus::Success));
    assert_eq!(session.payment_status(), PaymentStatus::Success);
}

#[tokio::test]
async fn foreign_return_url_is_ignored() {
    let backend = backend();
    let mut session = session(&backend);
    session
        .vipps_init("buyer@example.com", "seagrape://payment-return")
        .await
        .expect("vipps redirect");

    let status =
        session.handle_return_url("https://evil.example.com/?payment_method=vipps&status=failed");

    assert_eq!(status, None);
    assert_eq!(session.payment_status(), PaymentStatus::InProgress);
}
