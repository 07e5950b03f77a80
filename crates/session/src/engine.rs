//! Cart mutation engine.
//!
//! Every mutating operation attempts the remote call first and reconciles
//! from the authoritative response; on failure it applies the equivalent
//! local mutation so the cart stays usable offline. The returned
//! [`MutationOutcome`] tells callers which path was taken.

use seagrape_client::payloads::{LineItemInput, ProductPayload};
use seagrape_client::CommerceBackend;
use seagrape_core::PaymentStatus;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::catalog::Generation;
use crate::config::SessionConfig;
use crate::reconcile::reconcile;
use crate::state::{CartState, LineItem};

/// User-facing classification of a cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartNotice {
    /// A new line item appeared.
    Added,
    /// An existing line's quantity changed.
    QuantityUpdated,
    /// A line item was removed.
    Removed,
    /// Nothing changed (unknown item id, zero quantity request).
    Unchanged,
}

/// Result of a cart mutation.
///
/// `count_increased` is true exactly when the total unit count went up,
/// which is what gates the add-to-cart haptic cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationOutcome {
    pub applied_remotely: bool,
    pub notice: CartNotice,
    pub count_increased: bool,
}

impl MutationOutcome {
    pub(crate) const fn unchanged() -> Self {
        Self {
            applied_remotely: false,
            notice: CartNotice::Unchanged,
            count_increased: false,
        }
    }
}

/// A per-session cart/checkout/payment coordinator.
///
/// Single writer by construction: all mutations take `&mut self`, so two
/// operations can never interleave their writes. Suspension happens only at
/// the backend call boundaries.
pub struct CartSession<B: CommerceBackend> {
    pub(crate) backend: B,
    pub(crate) config: SessionConfig,
    pub(crate) customer_session_id: String,
    pub(crate) state: CartState,
    pub(crate) catalog_generation: Generation,
    pub(crate) vipps_in_flight: Option<String>,
    pub(crate) payment_status: PaymentStatus,
}

impl<B: CommerceBackend> CartSession<B> {
    #[must_use]
    pub fn new(backend: B, config: SessionConfig) -> Self {
        let state = CartState::new(&config.default_market);
        Self {
            backend,
            config,
            customer_session_id: format!("rs-{}", Uuid::new_v4()),
            state,
            catalog_generation: Generation::initial(),
            vipps_in_flight: None,
            payment_status: PaymentStatus::Unknown,
        }
    }

    /// Read-only view of the session state.
    #[must_use]
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Observable status of the most recent redirect-style payment.
    #[must_use]
    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.state.item_count()
    }

    /// Create a remote cart for the active market. Returns true when a cart
    /// id is available afterwards, whether it was just created or already
    /// existed. Failure leaves the session in local-only mode.
    pub async fn create_cart(&mut self) -> bool {
        if self.state.cart_id.is_some() {
            return true;
        }
        let currency = self.state.currency.clone();
        let country = self.state.country.clone();
        match self
            .backend
            .cart_create(&self.customer_session_id, &currency, &country)
            .await
        {
            Ok(payload) => {
                reconcile(&mut self.state, &payload);
                self.state.error_message = None;
                true
            }
            Err(err) => {
                warn!(error = %err, "cart creation failed, continuing locally");
                self.state.error_message = Some(err.to_string());
                false
            }
        }
    }

    /// Cart id, creating the remote cart first when none exists.
    pub(crate) async fn ensure_cart(&mut self) -> Option<String> {
        if self.state.cart_id.is_none() {
            self.create_cart().await;
        }
        self.state.cart_id.clone()
    }

    /// Add `quantity` units of a product to the cart.
    ///
    /// An existing `(product_id, variant_id)` line accumulates quantity
    /// instead of duplicating; this goes out as a single quantity update.
    pub async fn add_item(
        &mut self,
        product: &ProductPayload,
        variant_id: Option<i64>,
        quantity: u32,
    ) -> MutationOutcome {
        if quantity == 0 {
            return MutationOutcome::unchanged();
        }

        let cart_id = self.ensure_cart().await;

        if let Some(index) = self.state.item_index(product.id, variant_id) {
            let item_id = self.state.items[index].id.clone();
            let new_quantity = self.state.items[index].quantity + quantity;

            if let Some(cart_id) = &cart_id {
                match self
                    .backend
                    .cart_update_item(cart_id, &item_id, None, Some(new_quantity))
                    .await
                {
                    Ok(payload) => {
                        reconcile(&mut self.state, &payload);
                        self.state.error_message = None;
                        return MutationOutcome {
                            applied_remotely: true,
                            notice: CartNotice::QuantityUpdated,
                            count_increased: true,
                        };
                    }
                    Err(err) => {
                        warn!(error = %err, "quantity update failed, applying locally");
                        self.state.error_message = Some(err.to_string());
                    }
                }
            }

            if let Some(item) = self.state.items.iter_mut().find(|item| item.id == item_id) {
                item.quantity = new_quantity;
            }
            self.state.recompute_totals();
            return MutationOutcome {
                applied_remotely: false,
                notice: CartNotice::QuantityUpdated,
                count_increased: true,
            };
        }

        if let Some(cart_id) = &cart_id {
            let input = LineItemInput {
                product_id: product.id,
                variant_id,
                quantity,
                price_data: None,
            };
            match self.backend.cart_add_item(cart_id, &[input]).await {
                Ok(payload) => {
                    reconcile(&mut self.state, &payload);
                    self.state.error_message = None;
                    return MutationOutcome {
                        applied_remotely: true,
                        notice: CartNotice::Added,
                        count_increased: true,
                    };
                }
                Err(err) => {
                    warn!(error = %err, "add item failed, applying locally");
                    self.state.error_message = Some(err.to_string());
                }
            }
        }

        let item = local_line_item(product, variant_id, quantity, &self.state.currency);
        debug!(item_id = %item.id, "added line item locally");
        self.state.items.push(item);
        self.state.recompute_totals();
        MutationOutcome {
            applied_remotely: false,
            notice: CartNotice::Added,
            count_increased: true,
        }
    }

    /// Set a line's quantity. Zero removes the line.
    pub async fn update_quantity(&mut self, item_id: &str, quantity: u32) -> MutationOutcome {
        if quantity == 0 {
            return self.remove_item(item_id).await;
        }
        let Some(index) = self.state.items.iter().position(|item| item.id == item_id) else {
            return MutationOutcome::unchanged();
        };
        let previous = self.state.items[index].quantity;
        let count_increased = quantity > previous;
        let item_id = item_id.to_string();

        if let Some(cart_id) = self.state.cart_id.clone() {
            match self
                .backend
                .cart_update_item(&cart_id, &item_id, None, Some(quantity))
                .await
            {
                Ok(payload) => {
                    reconcile(&mut self.state, &payload);
                    self.state.error_message = None;
                    return MutationOutcome {
                        applied_remotely: true,
                        notice: CartNotice::QuantityUpdated,
                        count_increased,
                    };
                }
                Err(err) => {
                    warn!(error = %err, "quantity update failed, applying locally");
                    self.state.error_message = Some(err.to_string());
                }
            }
        }

        if let Some(item) = self.state.items.iter_mut().find(|item| item.id == item_id) {
            item.quantity = quantity;
        }
        self.state.recompute_totals();
        MutationOutcome {
            applied_remotely: false,
            notice: CartNotice::QuantityUpdated,
            count_increased,
        }
    }

    /// Remove a line from the cart.
    pub async fn remove_item(&mut self, item_id: &str) -> MutationOutcome {
        if !self.state.items.iter().any(|item| item.id == item_id) {
            return MutationOutcome::unchanged();
        }
        let item_id = item_id.to_string();

        if let Some(cart_id) = self.state.cart_id.clone() {
            match self.backend.cart_delete_item(&cart_id, &item_id).await {
                Ok(payload) => {
                    self.state.pending_shipping.remove(&item_id);
                    reconcile(&mut self.state, &payload);
                    self.state.error_message = None;
                    return MutationOutcome {
                        applied_remotely: true,
                        notice: CartNotice::Removed,
                        count_increased: false,
                    };
                }
                Err(err) => {
                    warn!(error = %err, "item removal failed, applying locally");
                    self.state.error_message = Some(err.to_string());
                }
            }
        }

        self.state.items.retain(|item| item.id != item_id);
        self.state.pending_shipping.remove(&item_id);
        self.state.recompute_totals();
        MutationOutcome {
            applied_remotely: false,
            notice: CartNotice::Removed,
            count_increased: false,
        }
    }

    /// Remove every line. Remote deletions are best effort and failures do
    /// not block the local reset.
    pub async fn clear_cart(&mut self) {
        if let Some(cart_id) = self.state.cart_id.clone() {
            let item_ids: Vec<String> =
                self.state.items.iter().map(|item| item.id.clone()).collect();
            for item_id in item_ids {
                if let Err(err) = self.backend.cart_delete_item(&cart_id, &item_id).await {
                    warn!(error = %err, item_id = %item_id, "remote delete failed during clear");
                }
            }
        }
        self.state.items.clear();
        self.state.pending_shipping.clear();
        self.state.recompute_totals();
    }

    /// Re-fetch the cart and reconcile from the authoritative snapshot.
    pub async fn refresh_cart(&mut self) -> bool {
        let Some(cart_id) = self.state.cart_id.clone() else {
            return false;
        };
        match self.backend.cart_get(&cart_id).await {
            Ok(payload) => {
                reconcile(&mut self.state, &payload);
                self.state.error_message = None;
                true
            }
            Err(err) => {
                self.state.error_message = Some(err.to_string());
                false
            }
        }
    }
}

/// Synthesize a line item for local-only mode.
fn local_line_item(
    product: &ProductPayload,
    variant_id: Option<i64>,
    quantity: u32,
    cart_currency: &str,
) -> LineItem {
    let variant = variant_id.and_then(|id| product.variants.iter().find(|v| v.id == id));
    let price_payload = variant
        .and_then(|v| v.price.as_ref())
        .unwrap_or(&product.price);
    let images = variant
        .map(|v| v.images.as_slice())
        .filter(|images| !images.is_empty())
        .unwrap_or(product.images.as_slice());

    let currency = if price_payload.currency_code.is_empty() {
        cart_currency.to_string()
    } else {
        price_payload.currency_code.clone()
    };

    LineItem {
        id: format!("local-{}", Uuid::new_v4()),
        product_id: product.id,
        variant_id,
        title: product.title.clone(),
        brand: product.brand.clone(),
        image_url: images
            .iter()
            .min_by_key(|image| image.order.unwrap_or(0))
            .map(|image| image.url.clone()),
        sku: product.sku.clone(),
        supplier: product.supplier.clone(),
        price: seagrape_core::decimal_from_wire(price_payload.effective_amount()),
        currency,
        quantity,
        shipping_id: None,
        shipping_name: None,
        shipping_amount: None,
        shipping_currency: None,
        available_shippings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{product, OfflineBackend};
    use rust_decimal::Decimal;
    use seagrape_core::Market;

    fn session() -> CartSession<OfflineBackend> {
        let market = Market::new("US", "United States", "USD", "$", "+1");
        CartSession::new(OfflineBackend, SessionConfig::new(market, "seagrape"))
    }

    #[tokio::test]
    async fn offline_add_still_succeeds() {
        let mut session = session();
        let outcome = session.add_item(&product(1, 10.0), None, 2).await;

        assert!(!outcome.applied_remotely);
        assert_eq!(outcome.notice, CartNotice::Added);
        assert!(outcome.count_increased);
        assert_eq!(session.state().items.len(), 1);
        assert_eq!(session.state().cart_total, Decimal::new(2000, 2));
        assert!(session.state().error_message.is_some());
    }

    #[tokio::test]
    async fn same_product_accumulates_quantity() {
        let mut session = session();
        session.add_item(&product(1, 10.0), None, 2).await;
        let outcome = session.add_item(&product(1, 10.0), None, 1).await;

        assert_eq!(outcome.notice, CartNotice::QuantityUpdated);
        assert_eq!(session.state().items.len(), 1);
        assert_eq!(session.state().items[0].quantity, 3);
        assert_eq!(session.state().cart_total, Decimal::new(3000, 2));
    }

    #[tokio::test]
    async fn distinct_variants_stay_separate_lines() {
        let mut session = session();
        session.add_item(&product(1, 10.0), Some(7), 1).await;
        session.add_item(&product(1, 10.0), Some(8), 1).await;

        assert_eq!(session.state().items.len(), 2);
        assert_eq!(session.item_count(), 2);
    }

    #[tokio::test]
    async fn zero_quantity_update_removes_the_line() {
        let mut session = session();
        session.add_item(&product(1, 10.0), None, 2).await;
        let item_id = session.state().items[0].id.clone();

        let outcome = session.update_quantity(&item_id, 0).await;

        assert_eq!(outcome.notice, CartNotice::Removed);
        assert!(session.state().items.is_empty());
        assert_eq!(session.state().cart_total, Decimal::ZERO);
        assert_eq!(session.state().shipping_total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn unknown_item_is_a_no_op() {
        let mut session = session();
        let outcome = session.update_quantity("nope", 3).await;
        assert_eq!(outcome, MutationOutcome::unchanged());
    }

    #[tokio::test]
    async fn totals_invariant_holds_across_mixed_operations() {
        let mut session = session();
        session.add_item(&product(1, 10.0), None, 2).await;
        session.add_item(&product(2, 5.5), None, 1).await;
        let first = session.state().items[0].id.clone();
        session.update_quantity(&first, 5).await;
        session.remove_item(&first).await;

        let expected: Decimal = session
            .state()
            .items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();
        assert_eq!(session.state().cart_total, expected);
        assert_eq!(session.state().cart_total, Decimal::new(550, 2));
    }

    #[tokio::test]
    async fn clear_cart_empties_everything() {
        let mut session = session();
        session.add_item(&product(1, 10.0), None, 2).await;
        session.clear_cart().await;

        assert!(session.state().items.is_empty());
        assert!(session.state().pending_shipping.is_empty());
        assert_eq!(session.state().cart_total, Decimal::ZERO);
    }
}
