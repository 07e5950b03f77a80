//! Observable session state.
//!
//! [`CartState`] is the single source of truth for one session. Mutations go
//! through [`crate::CartSession`]; observers read the state between
//! operations. Derived totals are recomputed after every mutation so the
//! invariants below hold at every observable point:
//!
//! - `cart_total` equals the sum of `price * quantity` over `items`;
//! - `shipping_total` equals the sum of selected shipping amounts;
//! - an empty cart has a zero shipping total and `shipping_currency` equal
//!   to the cart currency.

use std::collections::HashMap;

use rust_decimal::Decimal;
use seagrape_client::payloads::ProductPayload;
use seagrape_core::Market;
use serde::Serialize;

/// A shipping option attached to a line item's supplier group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingOption {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub currency: String,
}

/// One line in the cart.
///
/// `id` is remote-assigned once synced; before the first successful sync a
/// locally generated id is used and stays stable for the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub id: String,
    pub product_id: i64,
    pub variant_id: Option<i64>,
    pub title: String,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub sku: Option<String>,
    pub supplier: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub quantity: u32,
    pub shipping_id: Option<String>,
    pub shipping_name: Option<String>,
    pub shipping_amount: Option<Decimal>,
    pub shipping_currency: Option<String>,
    pub available_shippings: Vec<ShippingOption>,
}

impl LineItem {
    pub(crate) fn select_shipping(&mut self, option: &ShippingOption) {
        self.shipping_id = Some(option.id.clone());
        self.shipping_name = Some(option.name.clone());
        self.shipping_amount = Some(option.amount);
        self.shipping_currency = Some(option.currency.clone());
    }

    pub(crate) fn clear_shipping(&mut self) {
        self.shipping_id = None;
        self.shipping_name = None;
        self.shipping_amount = None;
        self.shipping_currency = None;
    }
}

/// Full session state published to observers.
#[derive(Debug, Clone, Serialize)]
pub struct CartState {
    pub cart_id: Option<String>,
    pub items: Vec<LineItem>,
    pub currency: String,
    pub country: String,
    pub currency_symbol: String,
    pub phone_code: String,
    pub flag_url: Option<String>,
    pub cart_total: Decimal,
    pub shipping_total: Decimal,
    pub shipping_currency: String,
    pub checkout_id: Option<String>,
    pub pending_shipping: HashMap<String, ShippingOption>,
    pub last_discount_code: Option<String>,
    pub last_discount_id: Option<i64>,
    pub selected_market: Option<Market>,
    pub markets: Vec<Market>,
    pub products: Vec<ProductPayload>,
    /// Error from the most recent failed cart/checkout/payment operation.
    pub error_message: Option<String>,
    /// Error from the most recent failed catalog load, kept separate so a
    /// cart failure does not hide the product list state.
    pub products_error: Option<String>,
    /// (currency, country) of the last successful catalog load; cache hits
    /// are only honored when the requested pair matches.
    pub last_loaded_catalog: Option<(String, String)>,
}

impl CartState {
    #[must_use]
    pub fn new(market: &Market) -> Self {
        Self {
            cart_id: None,
            items: Vec::new(),
            currency: market.currency_code.clone(),
            country: market.code.clone(),
            currency_symbol: market.currency_symbol.clone(),
            phone_code: market.phone_code.clone(),
            flag_url: market.flag_url.clone(),
            cart_total: Decimal::ZERO,
            shipping_total: Decimal::ZERO,
            shipping_currency: market.currency_code.clone(),
            checkout_id: None,
            pending_shipping: HashMap::new(),
            last_discount_code: None,
            last_discount_id: None,
            selected_market: Some(market.clone()),
            markets: Vec::new(),
            products: Vec::new(),
            error_message: None,
            products_error: None,
            last_loaded_catalog: None,
        }
    }

    /// Index of the line matching the accumulation key `(product_id, variant_id)`.
    #[must_use]
    pub fn item_index(&self, product_id: i64, variant_id: Option<i64>) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id == product_id && item.variant_id == variant_id)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Recompute `cart_total`, `shipping_total` and `shipping_currency`
    /// from the current items.
    pub fn recompute_totals(&mut self) {
        self.cart_total = self
            .items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();

        if self.items.is_empty() {
            self.shipping_total = Decimal::ZERO;
            self.shipping_currency = self.currency.clone();
        } else {
            self.shipping_total = self.items.iter().filter_map(|item| item.shipping_amount).sum();
            self.shipping_currency = self
                .items
                .iter()
                .find_map(|item| item.shipping_currency.clone())
                .unwrap_or_else(|| self.currency.clone());
        }
    }

    /// Re-apply a market's display-only fields. Currency and country are
    /// owned by the authoritative cart payload and are not touched here.
    pub(crate) fn apply_market_display(&mut self, market: &Market) {
        self.currency_symbol = market.currency_symbol.clone();
        self.phone_code = market.phone_code.clone();
        self.flag_url = market.flag_url.clone();
    }
}
