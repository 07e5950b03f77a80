//! Unit-test backend double.

use seagrape_client::payloads::{
    CartPayload, CheckoutPayload, CheckoutUpdateInput, DiscountActionPayload, DiscountPayload,
    KlarnaInitPayload, KlarnaNativeConfirmInput, KlarnaNativeConfirmPayload,
    KlarnaNativeInitInput, KlarnaNativeInitPayload, KlarnaNativeOrderPayload, LineItemInput,
    MarketPayload, ProductPayload, ProductQuery, StripeIntentPayload, StripeLinkPayload,
    SupplierGroupPayload, VippsInitPayload,
};
use seagrape_client::{CommerceBackend, CommerceError};
use serde_json::json;

/// A backend that fails every call, for exercising the local fallback
/// paths without a network.
pub(crate) struct OfflineBackend;

fn offline() -> CommerceError {
    CommerceError::Api {
        message: "offline".to_string(),
        code: None,
        status: None,
    }
}

impl CommerceBackend for OfflineBackend {
    async fn cart_create(
        &self,
        _customer_session_id: &str,
        _currency: &str,
        _shipping_country: &str,
    ) -> Result<CartPayload, CommerceError> {
        Err(offline())
    }

    async fn cart_get(&self, _cart_id: &str) -> Result<CartPayload, CommerceError> {
        Err(offline())
    }

    async fn cart_add_item(
        &self,
        _cart_id: &str,
        _line_items: &[LineItemInput],
    ) -> Result<CartPayload, CommerceError> {
        Err(offline())
    }

    async fn cart_update_item(
        &self,
        _cart_id: &str,
        _cart_item_id: &str,
        _shipping_id: Option<&str>,
        _quantity: Option<u32>,
    ) -> Result<CartPayload, CommerceError> {
        Err(offline())
    }

    async fn cart_delete_item(
        &self,
        _cart_id: &str,
        _cart_item_id: &str,
    ) -> Result<CartPayload, CommerceError> {
        Err(offline())
    }

    async fn cart_line_items_by_supplier(
        &self,
        _cart_id: &str,
    ) -> Result<Vec<SupplierGroupPayload>, CommerceError> {
        Err(offline())
    }

    async fn discount_add(
        &self,
        _code: &str,
        _percentage: i64,
        _start_date: &str,
        _end_date: &str,
        _type_id: i64,
    ) -> Result<DiscountPayload, CommerceError> {
        Err(offline())
    }

    async fn discount_apply(
        &self,
        _code: &str,
        _cart_id: &str,
    ) -> Result<DiscountActionPayload, CommerceError> {
        Err(offline())
    }

    async fn discount_delete_applied(
        &self,
        _code: &str,
        _cart_id: &str,
    ) -> Result<DiscountActionPayload, CommerceError> {
        Err(offline())
    }

    async fn discount_delete(
        &self,
        _discount_id: i64,
    ) -> Result<DiscountActionPayload, CommerceError> {
        Err(offline())
    }

    async fn discounts(&self) -> Result<Vec<DiscountPayload>, CommerceError> {
        Err(offline())
    }

    async fn discounts_by_channel(&self) -> Result<Vec<DiscountPayload>, CommerceError> {
        Err(offline())
    }

    async fn checkout_create(&self, _cart_id: &str) -> Result<CheckoutPayload, CommerceError> {
        Err(offline())
    }

    async fn checkout_update(
        &self,
        _checkout_id: &str,
        _input: &CheckoutUpdateInput,
    ) -> Result<CheckoutPayload, CommerceError> {
        Err(offline())
    }

    async fn payment_klarna_init(
        &self,
        _checkout_id: &str,
        _country_code: &str,
        _href: &str,
        _email: Option<&str>,
    ) -> Result<KlarnaInitPayload, CommerceError> {
        Err(offline())
    }

    async fn payment_klarna_native_init(
        &self,
        _checkout_id: &str,
        _input: &KlarnaNativeInitInput,
    ) -> Result<KlarnaNativeInitPayload, CommerceError> {
        Err(offline())
    }

    async fn payment_klarna_native_confirm(
        &self,
        _checkout_id: &str,
        _input: &KlarnaNativeConfirmInput,
    ) -> Result<KlarnaNativeConfirmPayload, CommerceError> {
        Err(offline())
    }

    async fn payment_klarna_native_order(
        &self,
        _order_id: &str,
        _user_id: Option<&str>,
    ) -> Result<KlarnaNativeOrderPayload, CommerceError> {
        Err(offline())
    }

    async fn payment_stripe_intent(
        &self,
        _checkout_id: &str,
        _return_ephemeral_key: Option<bool>,
    ) -> Result<StripeIntentPayload, CommerceError> {
        Err(offline())
    }

    async fn payment_stripe_link(
        &self,
        _checkout_id: &str,
        _success_url: &str,
        _payment_method: &str,
        _email: &str,
    ) -> Result<StripeLinkPayload, CommerceError> {
        Err(offline())
    }

    async fn payment_vipps_init(
        &self,
        _checkout_id: &str,
        _email: &str,
        _return_url: &str,
    ) -> Result<VippsInitPayload, CommerceError> {
        Err(offline())
    }

    async fn markets_available(&self) -> Result<Vec<MarketPayload>, CommerceError> {
        Err(offline())
    }

    async fn products(&self, _query: &ProductQuery) -> Result<Vec<ProductPayload>, CommerceError> {
        Err(offline())
    }
}

/// A minimal product for cart tests.
pub(crate) fn product(id: i64, amount: f64) -> ProductPayload {
    serde_json::from_value(json!({
        "id": id,
        "title": format!("Product {id}"),
        "price": { "amount": amount, "currency_code": "USD" }
    }))
    .expect("product payload")
}
