//! Commerce backend client implementation.
//!
//! Hand-written GraphQL operations over `reqwest`, with a `moka` cache for
//! catalog queries (5-minute TTL, keyed by currency/country/image size).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

use crate::api::CommerceBackend;
use crate::config::ClientConfig;
use crate::error::CommerceError;
use crate::graphql::{GraphqlTransport, pick};
use crate::operations;
use crate::payloads::{
    CartPayload, CheckoutPayload, CheckoutUpdateInput, DiscountActionPayload, DiscountPayload,
    KlarnaInitPayload, KlarnaNativeConfirmInput, KlarnaNativeConfirmPayload, KlarnaNativeInitInput,
    KlarnaNativeInitPayload, KlarnaNativeOrderPayload, LineItemInput, MarketPayload,
    ProductPayload, ProductQuery, StripeIntentPayload, StripeLinkPayload, SupplierGroupPayload,
    VippsInitPayload,
};

/// Cache key for catalog queries.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct ProductCacheKey {
    currency: String,
    shipping_country: String,
    image_size: String,
}

/// Client for the commerce backend's GraphQL API.
#[derive(Clone)]
pub struct GraphqlCommerceClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: GraphqlTransport,
    product_cache: Cache<ProductCacheKey, Arc<Vec<ProductPayload>>>,
}

impl GraphqlCommerceClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let product_cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(ClientInner {
                transport: GraphqlTransport::new(config),
                product_cache,
            }),
        }
    }

    async fn execute(&self, document: &str, variables: Value) -> Result<Value, CommerceError> {
        self.inner.transport.execute(document, variables).await
    }
}

/// Reject empty required string arguments before hitting the network.
fn require_non_empty(value: &str, field: &'static str) -> Result<(), CommerceError> {
    if value.trim().is_empty() {
        return Err(CommerceError::Api {
            message: format!("{field} cannot be empty"),
            code: Some("VALIDATION".to_string()),
            status: None,
        });
    }
    Ok(())
}

/// Build a variables object, skipping entries whose value is `None`.
fn variables<const N: usize>(entries: [(&str, Option<Value>); N]) -> Value {
    let mut map = Map::new();
    for (key, value) in entries {
        if let Some(value) = value {
            map.insert(key.to_string(), value);
        }
    }
    Value::Object(map)
}

impl CommerceBackend for GraphqlCommerceClient {
    #[instrument(skip(self))]
    async fn cart_create(
        &self,
        customer_session_id: &str,
        currency: &str,
        shipping_country: &str,
    ) -> Result<CartPayload, CommerceError> {
        require_non_empty(customer_session_id, "customer_session_id")?;
        require_non_empty(currency, "currency")?;
        let data = self
            .execute(
                &operations::create_cart(),
                json!({
                    "customerSessionId": customer_session_id,
                    "currency": currency,
                    "shippingCountry": shipping_country,
                }),
            )
            .await?;
        pick(&data, &["Cart", "CreateCart"], "Cart.create")
    }

    #[instrument(skip(self))]
    async fn cart_get(&self, cart_id: &str) -> Result<CartPayload, CommerceError> {
        require_non_empty(cart_id, "cart_id")?;
        let data = self
            .execute(&operations::get_cart(), json!({ "cartId": cart_id }))
            .await?;
        pick(&data, &["Cart", "GetCart"], "Cart.get")
    }

    #[instrument(skip(self, line_items))]
    async fn cart_add_item(
        &self,
        cart_id: &str,
        line_items: &[LineItemInput],
    ) -> Result<CartPayload, CommerceError> {
        require_non_empty(cart_id, "cart_id")?;
        if line_items.is_empty() {
            return Err(CommerceError::Api {
                message: "line_items cannot be empty".to_string(),
                code: Some("VALIDATION".to_string()),
                status: None,
            });
        }
        let data = self
            .execute(
                &operations::add_item(),
                json!({ "cartId": cart_id, "lineItems": line_items }),
            )
            .await?;
        pick(&data, &["Cart", "AddItem"], "Cart.addItem")
    }

    #[instrument(skip(self))]
    async fn cart_update_item(
        &self,
        cart_id: &str,
        cart_item_id: &str,
        shipping_id: Option<&str>,
        quantity: Option<u32>,
    ) -> Result<CartPayload, CommerceError> {
        require_non_empty(cart_id, "cart_id")?;
        require_non_empty(cart_item_id, "cart_item_id")?;
        if quantity.is_none() && shipping_id.is_none_or(str::is_empty) {
            return Err(CommerceError::Api {
                message: "either quantity or shipping_id must be provided".to_string(),
                code: Some("VALIDATION".to_string()),
                status: None,
            });
        }
        let data = self
            .execute(
                &operations::update_item(),
                variables([
                    ("cartId", Some(json!(cart_id))),
                    ("cartItemId", Some(json!(cart_item_id))),
                    ("shippingId", shipping_id.map(|s| json!(s))),
                    ("qty", quantity.map(|q| json!(q))),
                ]),
            )
            .await?;
        pick(&data, &["Cart", "UpdateItem"], "Cart.updateItem")
    }

    #[instrument(skip(self))]
    async fn cart_delete_item(
        &self,
        cart_id: &str,
        cart_item_id: &str,
    ) -> Result<CartPayload, CommerceError> {
        require_non_empty(cart_id, "cart_id")?;
        require_non_empty(cart_item_id, "cart_item_id")?;
        let data = self
            .execute(
                &operations::delete_item(),
                json!({ "cartId": cart_id, "cartItemId": cart_item_id }),
            )
            .await?;
        pick(&data, &["Cart", "DeleteItem"], "Cart.deleteItem")
    }

    #[instrument(skip(self))]
    async fn cart_line_items_by_supplier(
        &self,
        cart_id: &str,
    ) -> Result<Vec<SupplierGroupPayload>, CommerceError> {
        require_non_empty(cart_id, "cart_id")?;
        let data = self
            .execute(
                operations::GET_LINE_ITEMS_BY_SUPPLIER,
                json!({ "cartId": cart_id }),
            )
            .await?;
        pick(
            &data,
            &["Cart", "GetLineItemsBySupplier"],
            "Cart.getLineItemsBySupplier",
        )
    }

    #[instrument(skip(self))]
    async fn discount_add(
        &self,
        code: &str,
        percentage: i64,
        start_date: &str,
        end_date: &str,
        type_id: i64,
    ) -> Result<DiscountPayload, CommerceError> {
        require_non_empty(code, "code")?;
        let data = self
            .execute(
                operations::ADD_DISCOUNT,
                json!({
                    "code": code,
                    "percentage": percentage,
                    "startDate": start_date,
                    "endDate": end_date,
                    "typeId": type_id,
                }),
            )
            .await?;
        pick(&data, &["Discount", "AddDiscount"], "Discount.add")
    }

    #[instrument(skip(self))]
    async fn discount_apply(
        &self,
        code: &str,
        cart_id: &str,
    ) -> Result<DiscountActionPayload, CommerceError> {
        require_non_empty(code, "code")?;
        require_non_empty(cart_id, "cart_id")?;
        let data = self
            .execute(
                operations::APPLY_DISCOUNT,
                json!({ "code": code, "cartId": cart_id }),
            )
            .await?;
        pick(&data, &["Discount", "ApplyDiscount"], "Discount.apply")
    }

    #[instrument(skip(self))]
    async fn discount_delete_applied(
        &self,
        code: &str,
        cart_id: &str,
    ) -> Result<DiscountActionPayload, CommerceError> {
        require_non_empty(code, "code")?;
        require_non_empty(cart_id, "cart_id")?;
        let data = self
            .execute(
                operations::DELETE_APPLIED_DISCOUNT,
                json!({ "code": code, "cartId": cart_id }),
            )
            .await?;
        pick(
            &data,
            &["Discount", "DeleteAppliedDiscount"],
            "Discount.deleteApplied",
        )
    }

    #[instrument(skip(self))]
    async fn discount_delete(
        &self,
        discount_id: i64,
    ) -> Result<DiscountActionPayload, CommerceError> {
        let data = self
            .execute(
                operations::DELETE_DISCOUNT,
                json!({ "discountId": discount_id }),
            )
            .await?;
        pick(&data, &["Discount", "DeleteDiscount"], "Discount.delete")
    }

    #[instrument(skip(self))]
    async fn discounts(&self) -> Result<Vec<DiscountPayload>, CommerceError> {
        let data = self
            .execute(operations::GET_DISCOUNTS, json!({}))
            .await?;
        pick(&data, &["Discount", "GetDiscounts"], "Discount.get")
    }

    #[instrument(skip(self))]
    async fn discounts_by_channel(&self) -> Result<Vec<DiscountPayload>, CommerceError> {
        let data = self
            .execute(operations::GET_DISCOUNTS_BY_CHANNEL, json!({}))
            .await?;
        pick(
            &data,
            &["Discount", "GetDiscountsByChannel"],
            "Discount.getByChannel",
        )
    }

    #[instrument(skip(self))]
    async fn checkout_create(&self, cart_id: &str) -> Result<CheckoutPayload, CommerceError> {
        require_non_empty(cart_id, "cart_id")?;
        let data = self
            .execute(operations::CREATE_CHECKOUT, json!({ "cartId": cart_id }))
            .await?;
        pick(&data, &["Checkout", "CreateCheckout"], "Checkout.create")
    }

    #[instrument(skip(self, input))]
    async fn checkout_update(
        &self,
        checkout_id: &str,
        input: &CheckoutUpdateInput,
    ) -> Result<CheckoutPayload, CommerceError> {
        require_non_empty(checkout_id, "checkout_id")?;
        // Serialize the input (set fields only) and splice the id in, so
        // absent fields are genuinely absent from the request.
        let mut vars = serde_json::to_value(input)?;
        if let Value::Object(map) = &mut vars {
            let mut camel = Map::new();
            camel.insert("checkoutId".to_string(), json!(checkout_id));
            for (key, value) in std::mem::take(map) {
                camel.insert(snake_to_camel(&key), value);
            }
            vars = Value::Object(camel);
        }
        let data = self.execute(operations::UPDATE_CHECKOUT, vars).await?;
        pick(&data, &["Checkout", "UpdateCheckout"], "Checkout.update")
    }

    #[instrument(skip(self))]
    async fn payment_klarna_init(
        &self,
        checkout_id: &str,
        country_code: &str,
        href: &str,
        email: Option<&str>,
    ) -> Result<KlarnaInitPayload, CommerceError> {
        require_non_empty(checkout_id, "checkout_id")?;
        require_non_empty(country_code, "country_code")?;
        require_non_empty(href, "href")?;
        let data = self
            .execute(
                operations::KLARNA_INIT,
                variables([
                    ("checkoutId", Some(json!(checkout_id))),
                    ("countryCode", Some(json!(country_code))),
                    ("href", Some(json!(href))),
                    ("email", email.map(|e| json!(e))),
                ]),
            )
            .await?;
        pick(
            &data,
            &["Payment", "CreatePaymentKlarna"],
            "Payment.klarnaInit",
        )
    }

    #[instrument(skip(self, input))]
    async fn payment_klarna_native_init(
        &self,
        checkout_id: &str,
        input: &KlarnaNativeInitInput,
    ) -> Result<KlarnaNativeInitPayload, CommerceError> {
        require_non_empty(checkout_id, "checkout_id")?;
        let mut vars = serde_json::to_value(input)?;
        if let Value::Object(map) = &mut vars {
            let mut camel = Map::new();
            camel.insert("checkoutId".to_string(), json!(checkout_id));
            for (key, value) in std::mem::take(map) {
                camel.insert(snake_to_camel(&key), value);
            }
            vars = Value::Object(camel);
        }
        let data = self.execute(operations::KLARNA_NATIVE_INIT, vars).await?;
        pick(
            &data,
            &["Payment", "CreatePaymentKlarnaNative"],
            "Payment.klarnaNativeInit",
        )
    }

    #[instrument(skip(self, input))]
    async fn payment_klarna_native_confirm(
        &self,
        checkout_id: &str,
        input: &KlarnaNativeConfirmInput,
    ) -> Result<KlarnaNativeConfirmPayload, CommerceError> {
        require_non_empty(checkout_id, "checkout_id")?;
        require_non_empty(&input.authorization_token, "authorization_token")?;
        let mut vars = serde_json::to_value(input)?;
        if let Value::Object(map) = &mut vars {
            let mut camel = Map::new();
            camel.insert("checkoutId".to_string(), json!(checkout_id));
            for (key, value) in std::mem::take(map) {
                camel.insert(snake_to_camel(&key), value);
            }
            vars = Value::Object(camel);
        }
        let data = self
            .execute(operations::KLARNA_NATIVE_CONFIRM, vars)
            .await?;
        pick(
            &data,
            &["Payment", "ConfirmPaymentKlarnaNative"],
            "Payment.klarnaNativeConfirm",
        )
    }

    #[instrument(skip(self))]
    async fn payment_klarna_native_order(
        &self,
        order_id: &str,
        user_id: Option<&str>,
    ) -> Result<KlarnaNativeOrderPayload, CommerceError> {
        require_non_empty(order_id, "order_id")?;
        let data = self
            .execute(
                operations::KLARNA_NATIVE_ORDER,
                variables([
                    ("orderId", Some(json!(order_id))),
                    ("userId", user_id.map(|u| json!(u.trim()))),
                ]),
            )
            .await?;
        pick(
            &data,
            &["Payment", "GetKlarnaOrderNative"],
            "Payment.klarnaNativeOrder",
        )
    }

    #[instrument(skip(self))]
    async fn payment_stripe_intent(
        &self,
        checkout_id: &str,
        return_ephemeral_key: Option<bool>,
    ) -> Result<StripeIntentPayload, CommerceError> {
        require_non_empty(checkout_id, "checkout_id")?;
        let data = self
            .execute(
                operations::STRIPE_INTENT,
                variables([
                    ("checkoutId", Some(json!(checkout_id))),
                    ("returnEphemeralKey", return_ephemeral_key.map(|b| json!(b))),
                ]),
            )
            .await?;
        pick(
            &data,
            &["Payment", "CreatePaymentIntentStripe"],
            "Payment.stripeIntent",
        )
    }

    #[instrument(skip(self))]
    async fn payment_stripe_link(
        &self,
        checkout_id: &str,
        success_url: &str,
        payment_method: &str,
        email: &str,
    ) -> Result<StripeLinkPayload, CommerceError> {
        require_non_empty(checkout_id, "checkout_id")?;
        require_non_empty(success_url, "success_url")?;
        require_non_empty(payment_method, "payment_method")?;
        require_non_empty(email, "email")?;
        let data = self
            .execute(
                operations::STRIPE_LINK,
                json!({
                    "checkoutId": checkout_id,
                    "successUrl": success_url,
                    "paymentMethod": payment_method,
                    "email": email,
                }),
            )
            .await?;
        pick(
            &data,
            &["Payment", "CreatePaymentStripe"],
            "Payment.stripeLink",
        )
    }

    #[instrument(skip(self))]
    async fn payment_vipps_init(
        &self,
        checkout_id: &str,
        email: &str,
        return_url: &str,
    ) -> Result<VippsInitPayload, CommerceError> {
        require_non_empty(checkout_id, "checkout_id")?;
        require_non_empty(email, "email")?;
        require_non_empty(return_url, "return_url")?;
        let data = self
            .execute(
                operations::VIPPS_INIT,
                json!({
                    "checkoutId": checkout_id,
                    "email": email,
                    "returnUrl": return_url,
                }),
            )
            .await?;
        pick(
            &data,
            &["Payment", "CreatePaymentVipps"],
            "Payment.vippsInit",
        )
    }

    #[instrument(skip(self))]
    async fn markets_available(&self) -> Result<Vec<MarketPayload>, CommerceError> {
        let data = self
            .execute(operations::GET_AVAILABLE_MARKETS, json!({}))
            .await?;
        pick(
            &data,
            &["Markets", "GetAvailableMarkets"],
            "Markets.getAvailable",
        )
    }

    #[instrument(skip(self))]
    async fn products(&self, query: &ProductQuery) -> Result<Vec<ProductPayload>, CommerceError> {
        let cache_key = ProductCacheKey {
            currency: query.currency.clone(),
            shipping_country: query.shipping_country.clone(),
            image_size: query.image_size.clone(),
        };

        if query.use_cache
            && let Some(products) = self.inner.product_cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok((*products).clone());
        }

        let data = self
            .execute(
                operations::GET_PRODUCTS,
                json!({
                    "currency": query.currency,
                    "imageSize": query.image_size,
                    "useCache": query.use_cache,
                    "shippingCountryCode": query.shipping_country,
                }),
            )
            .await?;
        let products: Vec<ProductPayload> =
            pick(&data, &["Channel", "GetProducts"], "Channel.getProducts")?;

        self.inner
            .product_cache
            .insert(cache_key, Arc::new(products.clone()))
            .await;

        Ok(products)
    }
}

/// Convert a snake_case wire key to the camelCase variable name the
/// operation documents declare.
fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_to_camel_conversion() {
        assert_eq!(snake_to_camel("success_url"), "successUrl");
        assert_eq!(
            snake_to_camel("buyer_accepts_terms_conditions"),
            "buyerAcceptsTermsConditions"
        );
        assert_eq!(snake_to_camel("email"), "email");
    }

    #[test]
    fn variables_skip_absent_entries() {
        let vars = variables([
            ("cartId", Some(json!("c-1"))),
            ("shippingId", None),
            ("qty", Some(json!(3))),
        ]);
        assert_eq!(vars, json!({ "cartId": "c-1", "qty": 3 }));
    }

    #[test]
    fn empty_arguments_are_rejected_locally() {
        assert!(require_non_empty("  ", "cart_id").is_err());
        assert!(require_non_empty("c-1", "cart_id").is_ok());
    }
}
