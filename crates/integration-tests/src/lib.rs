//! Integration test support for Seagrape.
//!
//! [`InMemoryBackend`] is a stateful, scripted implementation of
//! [`CommerceBackend`]: it emulates the backend's cart bookkeeping well
//! enough to exercise the full session engine (reconciliation, shipping
//! commits, discount chains, market switches) without a network, and
//! exposes failure switches so tests can force the local-fallback paths.
//!
//! The backend is a cheap clone around shared state; tests keep one handle
//! for scripting and assertions and move another into the session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use seagrape_client::payloads::{
    AvailableShippingPayload, AvailableShippingPricePayload, CartPayload, CheckoutPayload,
    CheckoutUpdateInput, DiscountActionPayload, DiscountPayload, ImagePayload, KlarnaInitPayload,
    KlarnaNativeConfirmInput, KlarnaNativeConfirmPayload, KlarnaNativeInitInput,
    KlarnaNativeInitPayload, KlarnaNativeOrderPayload, LineItemInput, LineItemPayload,
    MarketPayload, PricePayload, ProductPayload, ProductQuery, ShippingPayload,
    ShippingPricePayload, StripeIntentPayload, StripeLinkPayload, SupplierGroupPayload,
    VippsInitPayload,
};
use seagrape_client::{CommerceBackend, CommerceError};
use serde_json::json;

/// Install a fmt subscriber honoring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Shipping options every supplier group offers: (id, name, amount).
pub const SHIPPING_OPTIONS: &[(&str, &str, f64)] = &[
    ("ship-standard", "Standard", 5.0),
    ("ship-express", "Express", 9.0),
];

/// In-memory commerce backend with failure injection.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    inner: Arc<Mutex<BackendState>>,
}

#[derive(Default)]
struct BackendState {
    products: HashMap<i64, StoredProduct>,
    carts: HashMap<String, StoredCart>,
    discounts: Vec<StoredDiscount>,
    applied_discounts: HashMap<String, String>,
    markets: Vec<MarketPayload>,
    next_id: u64,
    calls: Vec<&'static str>,
    last_product_query: Option<ProductQuery>,
    fail_cart_mutations: bool,
    fail_discount_creation: bool,
    failing_applies: u32,
    failing_shipping_items: Vec<String>,
    markets_not_found: bool,
}

struct StoredProduct {
    title: String,
    amount: f64,
    supplier: String,
}

#[derive(Default)]
struct StoredCart {
    currency: String,
    country: String,
    items: Vec<StoredItem>,
}

#[derive(Clone)]
struct StoredItem {
    id: String,
    product_id: i64,
    variant_id: Option<i64>,
    quantity: u32,
    amount: f64,
    supplier: String,
    shipping_id: Option<String>,
}

struct StoredDiscount {
    id: i64,
    code: String,
    channel: bool,
}

fn failure(message: &str) -> CommerceError {
    CommerceError::Api {
        message: message.to_string(),
        code: None,
        status: None,
    }
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a purchasable product.
    pub fn insert_product(&self, id: i64, title: &str, amount: f64) {
        self.lock().products.insert(
            id,
            StoredProduct {
                title: title.to_string(),
                amount,
                supplier: "default-supplier".to_string(),
            },
        );
    }

    /// Register a product fulfilled by a specific supplier.
    pub fn insert_product_with_supplier(&self, id: i64, title: &str, amount: f64, supplier: &str) {
        self.lock().products.insert(
            id,
            StoredProduct {
                title: title.to_string(),
                amount,
                supplier: supplier.to_string(),
            },
        );
    }

    /// Register a discount code the backend knows about.
    pub fn register_discount(&self, id: i64, code: &str, channel: bool) {
        self.lock().discounts.push(StoredDiscount {
            id,
            code: code.to_string(),
            channel,
        });
    }

    /// Make the given market list available.
    pub fn set_markets(&self, markets: Vec<MarketPayload>) {
        self.lock().markets = markets;
    }

    /// When on, every cart mutation fails.
    pub fn fail_cart_mutations(&self, on: bool) {
        self.lock().fail_cart_mutations = on;
    }

    /// When on, discount creation fails.
    pub fn fail_discount_creation(&self, on: bool) {
        self.lock().fail_discount_creation = on;
    }

    /// Report the next `count` discount applies as not executed, regardless
    /// of whether the code exists.
    pub fn fail_next_applies(&self, count: u32) {
        self.lock().failing_applies = count;
    }

    /// Fail every shipping update targeting the given line item.
    pub fn fail_shipping_update_for(&self, item_id: &str) {
        self.lock().failing_shipping_items.push(item_id.to_string());
    }

    /// Answer the market list with a not-found error.
    pub fn markets_not_found(&self, on: bool) {
        self.lock().markets_not_found = on;
    }

    /// Names of the operations invoked so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    /// The most recent catalog query, for asserting currency/country.
    #[must_use]
    pub fn last_product_query(&self) -> Option<ProductQuery> {
        self.lock().last_product_query.clone()
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.inner.lock().expect("backend state lock")
    }
}

impl BackendState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn record(&mut self, call: &'static str) {
        self.calls.push(call);
    }

    fn cart_payload(&self, cart_id: &str) -> Result<CartPayload, CommerceError> {
        let cart = self
            .carts
            .get(cart_id)
            .ok_or_else(|| CommerceError::NotFound(format!("cart {cart_id}")))?;
        Ok(CartPayload {
            cart_id: cart_id.to_string(),
            customer_session_id: None,
            currency: cart.currency.clone(),
            shipping_country: Some(cart.country.clone()),
            available_shipping_countries: vec![cart.country.clone()],
            subtotal: cart
                .items
                .iter()
                .map(|item| item.amount * f64::from(item.quantity))
                .sum(),
            shipping: 0.0,
            line_items: cart
                .items
                .iter()
                .map(|item| line_item_payload(item, &cart.currency))
                .collect(),
        })
    }
}

fn line_item_payload(item: &StoredItem, currency: &str) -> LineItemPayload {
    LineItemPayload {
        id: item.id.clone(),
        supplier: Some(item.supplier.clone()),
        image: Some(vec![ImagePayload {
            id: None,
            url: format!("https://img.example.com/{}.jpg", item.product_id),
            width: None,
            height: None,
            order: Some(0),
        }]),
        sku: None,
        barcode: None,
        brand: None,
        product_id: item.product_id,
        title: Some(format!("Product {}", item.product_id)),
        variant_id: item.variant_id,
        variant_title: None,
        quantity: item.quantity,
        price: PricePayload {
            amount: item.amount,
            currency_code: currency.to_string(),
            ..PricePayload::default()
        },
        shipping: item.shipping_id.as_deref().and_then(|id| {
            SHIPPING_OPTIONS
                .iter()
                .find(|(option_id, _, _)| *option_id == id)
                .map(|(option_id, name, amount)| ShippingPayload {
                    id: (*option_id).to_string(),
                    name: (*name).to_string(),
                    description: None,
                    price: ShippingPricePayload {
                        amount: *amount,
                        currency_code: Some(currency.to_string()),
                        ..ShippingPricePayload::default()
                    },
                })
        }),
        available_shippings: Some(available_options(currency)),
    }
}

fn available_options(currency: &str) -> Vec<AvailableShippingPayload> {
    SHIPPING_OPTIONS
        .iter()
        .map(|(id, name, amount)| AvailableShippingPayload {
            id: Some((*id).to_string()),
            name: Some((*name).to_string()),
            description: None,
            country_code: None,
            price: AvailableShippingPricePayload {
                amount: Some(*amount),
                currency_code: Some(currency.to_string()),
                amount_incl_taxes: None,
            },
        })
        .collect()
}

impl CommerceBackend for InMemoryBackend {
    async fn cart_create(
        &self,
        _customer_session_id: &str,
        currency: &str,
        shipping_country: &str,
    ) -> Result<CartPayload, CommerceError> {
        let mut state = self.lock();
        state.record("cart_create");
        if state.fail_cart_mutations {
            return Err(failure("cart create unavailable"));
        }
        let cart_id = format!("cart-{}", state.next_id());
        state.carts.insert(
            cart_id.clone(),
            StoredCart {
                currency: currency.to_string(),
                country: shipping_country.to_string(),
                items: Vec::new(),
            },
        );
        state.cart_payload(&cart_id)
    }

    async fn cart_get(&self, cart_id: &str) -> Result<CartPayload, CommerceError> {
        let mut state = self.lock();
        state.record("cart_get");
        state.cart_payload(cart_id)
    }

    async fn cart_add_item(
        &self,
        cart_id: &str,
        line_items: &[LineItemInput],
    ) -> Result<CartPayload, CommerceError> {
        let mut state = self.lock();
        state.record("cart_add_item");
        if state.fail_cart_mutations {
            return Err(failure("cart mutation unavailable"));
        }
        for input in line_items {
            let product = state
                .products
                .get(&input.product_id)
                .ok_or_else(|| CommerceError::NotFound(format!("product {}", input.product_id)))?;
            let item = StoredItem {
                id: String::new(),
                product_id: input.product_id,
                variant_id: input.variant_id,
                quantity: input.quantity,
                amount: product.amount,
                supplier: product.supplier.clone(),
                shipping_id: None,
            };
            let id = format!("item-{}", state.next_id());
            let cart = state
                .carts
                .get_mut(cart_id)
                .ok_or_else(|| CommerceError::NotFound(format!("cart {cart_id}")))?;
            cart.items.push(StoredItem { id, ..item });
        }
        state.cart_payload(cart_id)
    }

    async fn cart_update_item(
        &self,
        cart_id: &str,
        cart_item_id: &str,
        shipping_id: Option<&str>,
        quantity: Option<u32>,
    ) -> Result<CartPayload, CommerceError> {
        let mut state = self.lock();
        state.record("cart_update_item");
        if state.fail_cart_mutations {
            return Err(failure("cart mutation unavailable"));
        }
        if shipping_id.is_some()
            && state
                .failing_shipping_items
                .iter()
                .any(|id| id == cart_item_id)
        {
            return Err(failure("shipping update unavailable"));
        }
        let cart = state
            .carts
            .get_mut(cart_id)
            .ok_or_else(|| CommerceError::NotFound(format!("cart {cart_id}")))?;
        let item = cart
            .items
            .iter_mut()
            .find(|item| item.id == cart_item_id)
            .ok_or_else(|| CommerceError::NotFound(format!("item {cart_item_id}")))?;
        if let Some(quantity) = quantity {
            item.quantity = quantity;
        }
        if let Some(shipping_id) = shipping_id {
            item.shipping_id = Some(shipping_id.to_string());
        }
        state.cart_payload(cart_id)
    }

    async fn cart_delete_item(
        &self,
        cart_id: &str,
        cart_item_id: &str,
    ) -> Result<CartPayload, CommerceError> {
        let mut state = self.lock();
        state.record("cart_delete_item");
        if state.fail_cart_mutations {
            return Err(failure("cart mutation unavailable"));
        }
        let cart = state
            .carts
            .get_mut(cart_id)
            .ok_or_else(|| CommerceError::NotFound(format!("cart {cart_id}")))?;
        cart.items.retain(|item| item.id != cart_item_id);
        state.cart_payload(cart_id)
    }

    async fn cart_line_items_by_supplier(
        &self,
        cart_id: &str,
    ) -> Result<Vec<SupplierGroupPayload>, CommerceError> {
        let mut state = self.lock();
        state.record("cart_line_items_by_supplier");
        let cart = state
            .carts
            .get(cart_id)
            .ok_or_else(|| CommerceError::NotFound(format!("cart {cart_id}")))?;

        let mut groups: HashMap<String, Vec<LineItemPayload>> = HashMap::new();
        for item in &cart.items {
            groups
                .entry(item.supplier.clone())
                .or_default()
                .push(line_item_payload(item, &cart.currency));
        }
        let currency = cart.currency.clone();
        Ok(groups
            .into_iter()
            .map(|(supplier, line_items)| SupplierGroupPayload {
                supplier: Some(supplier),
                line_items,
                available_shippings: Some(available_options(&currency)),
            })
            .collect())
    }

    async fn discount_add(
        &self,
        code: &str,
        percentage: i64,
        start_date: &str,
        end_date: &str,
        _type_id: i64,
    ) -> Result<DiscountPayload, CommerceError> {
        let mut state = self.lock();
        state.record("discount_add");
        if state.fail_discount_creation {
            return Err(failure("discount creation unavailable"));
        }
        let id = i64::try_from(state.next_id()).unwrap_or(i64::MAX);
        state.discounts.push(StoredDiscount {
            id,
            code: code.to_string(),
            channel: true,
        });
        Ok(DiscountPayload {
            id,
            code: Some(code.to_string()),
            percentage: Some(percentage),
            start_date: Some(start_date.to_string()),
            end_date: Some(end_date.to_string()),
        })
    }

    async fn discount_apply(
        &self,
        code: &str,
        cart_id: &str,
    ) -> Result<DiscountActionPayload, CommerceError> {
        let mut state = self.lock();
        state.record("discount_apply");
        if state.failing_applies > 0 {
            state.failing_applies -= 1;
            return Ok(DiscountActionPayload {
                executed: false,
                message: "discount could not be applied".to_string(),
            });
        }
        let known = state
            .discounts
            .iter()
            .any(|d| d.code.eq_ignore_ascii_case(code));
        if known {
            state
                .applied_discounts
                .insert(cart_id.to_string(), code.to_uppercase());
        }
        Ok(DiscountActionPayload {
            executed: known,
            message: if known {
                "discount applied".to_string()
            } else {
                "discount not found".to_string()
            },
        })
    }

    async fn discount_delete_applied(
        &self,
        code: &str,
        cart_id: &str,
    ) -> Result<DiscountActionPayload, CommerceError> {
        let mut state = self.lock();
        state.record("discount_delete_applied");
        let removed = state
            .applied_discounts
            .get(cart_id)
            .is_some_and(|applied| applied.eq_ignore_ascii_case(code));
        if removed {
            state.applied_discounts.remove(cart_id);
        }
        Ok(DiscountActionPayload {
            executed: removed,
            message: String::new(),
        })
    }

    async fn discount_delete(
        &self,
        discount_id: i64,
    ) -> Result<DiscountActionPayload, CommerceError> {
        let mut state = self.lock();
        state.record("discount_delete");
        let before = state.discounts.len();
        state.discounts.retain(|d| d.id != discount_id);
        Ok(DiscountActionPayload {
            executed: state.discounts.len() < before,
            message: String::new(),
        })
    }

    async fn discounts(&self) -> Result<Vec<DiscountPayload>, CommerceError> {
        let mut state = self.lock();
        state.record("discounts");
        Ok(state.discounts.iter().map(discount_payload).collect())
    }

    async fn discounts_by_channel(&self) -> Result<Vec<DiscountPayload>, CommerceError> {
        let mut state = self.lock();
        state.record("discounts_by_channel");
        Ok(state
            .discounts
            .iter()
            .filter(|d| d.channel)
            .map(discount_payload)
            .collect())
    }

    async fn checkout_create(&self, cart_id: &str) -> Result<CheckoutPayload, CommerceError> {
        let mut state = self.lock();
        state.record("checkout_create");
        if !state.carts.contains_key(cart_id) {
            return Err(CommerceError::NotFound(format!("cart {cart_id}")));
        }
        let checkout_id = format!("chk-{}", state.next_id());
        // The create response uses the camelCase alias on purpose, so the
        // ordered alias extraction is exercised end to end.
        Ok(CheckoutPayload::new(json!({ "checkoutId": checkout_id })))
    }

    async fn checkout_update(
        &self,
        checkout_id: &str,
        _input: &CheckoutUpdateInput,
    ) -> Result<CheckoutPayload, CommerceError> {
        let mut state = self.lock();
        state.record("checkout_update");
        // Updates re-issue the checkout id so the write-back is observable.
        let rotated = format!("{checkout_id}-updated");
        Ok(CheckoutPayload::new(json!({ "checkout_id": rotated })))
    }

    async fn payment_klarna_init(
        &self,
        _checkout_id: &str,
        _country_code: &str,
        _href: &str,
        _email: Option<&str>,
    ) -> Result<KlarnaInitPayload, CommerceError> {
        self.lock().record("payment_klarna_init");
        Ok(KlarnaInitPayload {
            order_id: "klarna-order-1".to_string(),
            status: "created".to_string(),
            locale: None,
            html_snippet: Some("<div id=\"klarna\"></div>".to_string()),
        })
    }

    async fn payment_klarna_native_init(
        &self,
        checkout_id: &str,
        _input: &KlarnaNativeInitInput,
    ) -> Result<KlarnaNativeInitPayload, CommerceError> {
        self.lock().record("payment_klarna_native_init");
        // Klarna rotates the checkout id during session creation.
        Ok(KlarnaNativeInitPayload {
            session_id: "klarna-session-1".to_string(),
            checkout_id: format!("{checkout_id}-klarna"),
            cart_id: None,
            client_token: Some("client-token".to_string()),
            purchase_country: None,
            purchase_currency: None,
            payment_method_categories: Vec::new(),
        })
    }

    async fn payment_klarna_native_confirm(
        &self,
        checkout_id: &str,
        _input: &KlarnaNativeConfirmInput,
    ) -> Result<KlarnaNativeConfirmPayload, CommerceError> {
        self.lock().record("payment_klarna_native_confirm");
        Ok(KlarnaNativeConfirmPayload {
            order_id: "klarna-order-1".to_string(),
            checkout_id: Some(checkout_id.to_string()),
            fraud_status: Some("ACCEPTED".to_string()),
        })
    }

    async fn payment_klarna_native_order(
        &self,
        order_id: &str,
        _user_id: Option<&str>,
    ) -> Result<KlarnaNativeOrderPayload, CommerceError> {
        self.lock().record("payment_klarna_native_order");
        Ok(KlarnaNativeOrderPayload {
            order_id: order_id.to_string(),
            status: Some("AUTHORIZED".to_string()),
            purchase_country: None,
            purchase_currency: None,
            order_amount: None,
            order_tax_amount: None,
            order_lines: Vec::new(),
            payment_method_categories: Vec::new(),
        })
    }

    async fn payment_stripe_intent(
        &self,
        _checkout_id: &str,
        return_ephemeral_key: Option<bool>,
    ) -> Result<StripeIntentPayload, CommerceError> {
        self.lock().record("payment_stripe_intent");
        Ok(StripeIntentPayload {
            client_secret: "pi_secret".to_string(),
            customer: "cus_1".to_string(),
            publishable_key: "pk_test".to_string(),
            ephemeral_key: return_ephemeral_key
                .unwrap_or(false)
                .then(|| "ek_test".to_string()),
        })
    }

    async fn payment_stripe_link(
        &self,
        _checkout_id: &str,
        _success_url: &str,
        _payment_method: &str,
        _email: &str,
    ) -> Result<StripeLinkPayload, CommerceError> {
        self.lock().record("payment_stripe_link");
        Ok(StripeLinkPayload {
            checkout_url: "https://pay.example.com/link".to_string(),
            order_id: 1,
        })
    }

    async fn payment_vipps_init(
        &self,
        _checkout_id: &str,
        _email: &str,
        _return_url: &str,
    ) -> Result<VippsInitPayload, CommerceError> {
        self.lock().record("payment_vipps_init");
        Ok(VippsInitPayload {
            payment_url: "https://pay.vipps.example.com/redirect".to_string(),
        })
    }

    async fn markets_available(&self) -> Result<Vec<MarketPayload>, CommerceError> {
        let mut state = self.lock();
        state.record("markets_available");
        if state.markets_not_found {
            return Err(CommerceError::NotFound("markets".to_string()));
        }
        Ok(state.markets.clone())
    }

    async fn products(&self, query: &ProductQuery) -> Result<Vec<ProductPayload>, CommerceError> {
        let mut state = self.lock();
        state.record("products");
        state.last_product_query = Some(query.clone());
        let mut products: Vec<ProductPayload> = state
            .products
            .iter()
            .map(|(id, product)| ProductPayload {
                id: *id,
                title: product.title.clone(),
                brand: None,
                description: None,
                sku: None,
                supplier: Some(product.supplier.clone()),
                quantity: Some(10),
                price: PricePayload {
                    amount: product.amount,
                    currency_code: query.currency.clone(),
                    ..PricePayload::default()
                },
                variants: Vec::new(),
                images: Vec::new(),
                digital: None,
            })
            .collect();
        products.sort_by_key(|product| product.id);
        Ok(products)
    }
}

fn discount_payload(discount: &StoredDiscount) -> DiscountPayload {
    DiscountPayload {
        id: discount.id,
        code: Some(discount.code.clone()),
        percentage: Some(10),
        start_date: None,
        end_date: None,
    }
}
