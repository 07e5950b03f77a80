//! The backend operation set, as a trait.
//!
//! The session engine is generic over this trait so it can run against the
//! real GraphQL client or an in-memory double in tests. Every operation
//! either returns a typed payload or a [`CommerceError`]; callers are free
//! to retry any of them.

use crate::error::CommerceError;
use crate::payloads::{
    CartPayload, CheckoutPayload, CheckoutUpdateInput, DiscountActionPayload, DiscountPayload,
    KlarnaInitPayload, KlarnaNativeConfirmInput, KlarnaNativeConfirmPayload, KlarnaNativeInitInput,
    KlarnaNativeInitPayload, KlarnaNativeOrderPayload, LineItemInput, MarketPayload,
    ProductPayload, ProductQuery, StripeIntentPayload, StripeLinkPayload, SupplierGroupPayload,
    VippsInitPayload,
};

/// Operations the commerce backend exposes.
///
/// Static dispatch only; the session engine takes `B: CommerceBackend` as a
/// type parameter.
#[allow(async_fn_in_trait)]
pub trait CommerceBackend {
    // Cart
    async fn cart_create(
        &self,
        customer_session_id: &str,
        currency: &str,
        shipping_country: &str,
    ) -> Result<CartPayload, CommerceError>;

    async fn cart_get(&self, cart_id: &str) -> Result<CartPayload, CommerceError>;

    async fn cart_add_item(
        &self,
        cart_id: &str,
        line_items: &[LineItemInput],
    ) -> Result<CartPayload, CommerceError>;

    /// Update a line item's quantity and/or selected shipping. At least one
    /// of the two must be provided.
    async fn cart_update_item(
        &self,
        cart_id: &str,
        cart_item_id: &str,
        shipping_id: Option<&str>,
        quantity: Option<u32>,
    ) -> Result<CartPayload, CommerceError>;

    async fn cart_delete_item(
        &self,
        cart_id: &str,
        cart_item_id: &str,
    ) -> Result<CartPayload, CommerceError>;

    async fn cart_line_items_by_supplier(
        &self,
        cart_id: &str,
    ) -> Result<Vec<SupplierGroupPayload>, CommerceError>;

    // Discounts
    async fn discount_add(
        &self,
        code: &str,
        percentage: i64,
        start_date: &str,
        end_date: &str,
        type_id: i64,
    ) -> Result<DiscountPayload, CommerceError>;

    async fn discount_apply(
        &self,
        code: &str,
        cart_id: &str,
    ) -> Result<DiscountActionPayload, CommerceError>;

    async fn discount_delete_applied(
        &self,
        code: &str,
        cart_id: &str,
    ) -> Result<DiscountActionPayload, CommerceError>;

    async fn discount_delete(&self, discount_id: i64)
    -> Result<DiscountActionPayload, CommerceError>;

    async fn discounts(&self) -> Result<Vec<DiscountPayload>, CommerceError>;

    async fn discounts_by_channel(&self) -> Result<Vec<DiscountPayload>, CommerceError>;

    // Checkout
    async fn checkout_create(&self, cart_id: &str) -> Result<CheckoutPayload, CommerceError>;

    async fn checkout_update(
        &self,
        checkout_id: &str,
        input: &CheckoutUpdateInput,
    ) -> Result<CheckoutPayload, CommerceError>;

    // Payment
    async fn payment_klarna_init(
        &self,
        checkout_id: &str,
        country_code: &str,
        href: &str,
        email: Option<&str>,
    ) -> Result<KlarnaInitPayload, CommerceError>;

    async fn payment_klarna_native_init(
        &self,
        checkout_id: &str,
        input: &KlarnaNativeInitInput,
    ) -> Result<KlarnaNativeInitPayload, CommerceError>;

    async fn payment_klarna_native_confirm(
        &self,
        checkout_id: &str,
        input: &KlarnaNativeConfirmInput,
    ) -> Result<KlarnaNativeConfirmPayload, CommerceError>;

    async fn payment_klarna_native_order(
        &self,
        order_id: &str,
        user_id: Option<&str>,
    ) -> Result<KlarnaNativeOrderPayload, CommerceError>;

    async fn payment_stripe_intent(
        &self,
        checkout_id: &str,
        return_ephemeral_key: Option<bool>,
    ) -> Result<StripeIntentPayload, CommerceError>;

    async fn payment_stripe_link(
        &self,
        checkout_id: &str,
        success_url: &str,
        payment_method: &str,
        email: &str,
    ) -> Result<StripeLinkPayload, CommerceError>;

    async fn payment_vipps_init(
        &self,
        checkout_id: &str,
        email: &str,
        return_url: &str,
    ) -> Result<VippsInitPayload, CommerceError>;

    // Markets & catalog
    async fn markets_available(&self) -> Result<Vec<MarketPayload>, CommerceError>;

    async fn products(&self, query: &ProductQuery) -> Result<Vec<ProductPayload>, CommerceError>;
}
