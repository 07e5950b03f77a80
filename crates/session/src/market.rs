//! Market loading and switching.
//!
//! A market switch is the most destructive operation in the session: the
//! old cart, catalog, checkout, discount bookkeeping and pending shipping
//! selections are all tied to the old market and must not leak into the new
//! one.

use seagrape_client::CommerceBackend;
use seagrape_core::Market;
use tracing::{debug, warn};

use crate::engine::CartSession;

impl<B: CommerceBackend> CartSession<B> {
    /// Fetch the market list once. No-op when it is already loaded.
    pub async fn load_markets_if_needed(&mut self) {
        if self.state.markets.is_empty() {
            self.reload_markets().await;
        }
    }

    /// Fetch the market list and re-apply the active (or default) market.
    ///
    /// A not-found response means the backend has no market configuration;
    /// that is not an error and silently falls back to the configured
    /// default market.
    pub async fn reload_markets(&mut self) {
        let fallback = self.config.default_market.clone();
        match self.backend.markets_available().await {
            Ok(payloads) => {
                let markets: Vec<Market> = payloads
                    .iter()
                    .filter_map(|payload| payload.to_market(&fallback))
                    .collect();
                self.state.markets = if markets.is_empty() {
                    vec![fallback]
                } else {
                    markets
                };
            }
            Err(err) if err.is_not_found() => {
                debug!("no markets configured, using the default market");
                self.state.markets = vec![fallback];
            }
            Err(err) => {
                warn!(error = %err, "market list fetch failed");
                self.state.error_message = Some(err.to_string());
                self.state.markets = vec![fallback];
            }
        }
        self.reapply_selected_market().await;
    }

    /// Switch to a new market. In order: record the market's codes and
    /// display fields, drop pending selections, discard the old cart and
    /// catalog entirely, create a fresh cart, reload the catalog bypassing
    /// the cache, and refresh shipping options.
    pub async fn select_market(&mut self, market: Market) {
        debug!(code = %market.code, currency = %market.currency_code, "switching market");
        self.state.selected_market = Some(market.clone());
        self.state.currency = market.currency_code.clone();
        self.state.country = market.code.clone();
        self.state.apply_market_display(&market);

        self.reset_for_market_change();

        self.create_cart().await;
        self.load_products(None, None, false).await;
        self.refresh_shipping_options().await;
    }

    /// Drop every piece of state tied to the previous market. Also bumps
    /// the catalog generation so an in-flight load for the old market is
    /// discarded when it completes.
    fn reset_for_market_change(&mut self) {
        self.state.pending_shipping.clear();
        self.state.items.clear();
        self.state.products.clear();
        self.state.cart_id = None;
        self.state.checkout_id = None;
        self.state.last_discount_code = None;
        self.state.last_discount_id = None;
        self.state.last_loaded_catalog = None;
        self.state.error_message = None;
        self.state.products_error = None;
        self.state.recompute_totals();
        self.catalog_generation = self.catalog_generation.next();
    }

    /// Keep the selection pointing at a market that exists in the loaded
    /// list. When nothing actually changed, only the display fields are
    /// re-applied; otherwise a full switch runs.
    async fn reapply_selected_market(&mut self) {
        let chosen = self
            .state
            .selected_market
            .clone()
            .filter(|selected| self.state.markets.iter().any(|m| m.code == selected.code))
            .or_else(|| self.state.markets.first().cloned())
            .unwrap_or_else(|| self.config.default_market.clone());

        let unchanged = self
            .state
            .selected_market
            .as_ref()
            .is_some_and(|selected| selected.code == chosen.code)
            && self.state.cart_id.is_some();

        if unchanged {
            self.state.apply_market_display(&chosen);
        } else {
            self.select_market(chosen).await;
        }
    }
}
