//! Discount code lifecycle.
//!
//! The main entry point is [`CartSession::apply_or_create_discount`], which
//! drives the apply, lookup, create, re-apply chain. A code is only ever
//! recorded as applied when the backend reports it executed.

use chrono::{Duration, Utc};
use seagrape_client::CommerceBackend;
use tracing::{debug, warn};

use crate::engine::CartSession;

/// Default discount type used when creating codes on the fly.
const DEFAULT_DISCOUNT_TYPE_ID: i64 = 2;

/// Codes are compared and stored trimmed and uppercased. Empty codes are
/// rejected before any network call.
fn normalize_code(code: &str) -> Option<String> {
    let normalized = code.trim().to_uppercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

impl<B: CommerceBackend> CartSession<B> {
    /// Apply an existing discount code to the cart. Returns true when the
    /// backend reports the discount executed.
    pub async fn apply_discount(&mut self, code: &str) -> bool {
        let Some(code) = normalize_code(code) else {
            self.state.error_message = Some("discount code is empty".to_string());
            return false;
        };
        let Some(cart_id) = self.ensure_cart().await else {
            return false;
        };
        self.apply_once(&code, &cart_id).await
    }

    /// Apply `code`, creating it when it does not exist anywhere.
    ///
    /// Chain: apply; on a non-executed outcome, look the code up in the
    /// channel list then the full list; if found, re-apply once; otherwise
    /// create the code and re-apply exactly once more. Returns true only
    /// when some apply step reported executed.
    pub async fn apply_or_create_discount(
        &mut self,
        code: &str,
        percentage: i64,
        start_date: Option<&str>,
        end_date: Option<&str>,
        type_id: Option<i64>,
    ) -> bool {
        let Some(code) = normalize_code(code) else {
            self.state.error_message = Some("discount code is empty".to_string());
            return false;
        };
        let Some(cart_id) = self.ensure_cart().await else {
            return false;
        };

        if self.apply_once(&code, &cart_id).await {
            return true;
        }

        if let Some(discount_id) = self.lookup_discount_id(&code).await {
            debug!(discount_id, "code exists, retrying apply");
            self.state.last_discount_id = Some(discount_id);
            return self.apply_once(&code, &cart_id).await;
        }

        let start = start_date.map_or_else(|| Utc::now().to_rfc3339(), str::to_string);
        let end = end_date
            .map_or_else(|| (Utc::now() + Duration::days(7)).to_rfc3339(), str::to_string);
        match self
            .backend
            .discount_add(
                &code,
                percentage,
                &start,
                &end,
                type_id.unwrap_or(DEFAULT_DISCOUNT_TYPE_ID),
            )
            .await
        {
            Ok(created) => {
                self.state.last_discount_id = Some(created.id);
                self.apply_once(&code, &cart_id).await
            }
            Err(err) => {
                warn!(error = %err, "discount creation failed");
                self.state.error_message = Some(err.to_string());
                false
            }
        }
    }

    /// Remove an applied code from the cart. Falls back to the last applied
    /// code when none is given.
    pub async fn remove_applied_discount(&mut self, code: Option<&str>) -> bool {
        let code = code
            .map(str::to_string)
            .or_else(|| self.state.last_discount_code.clone());
        let Some(code) = code.as_deref().and_then(normalize_code) else {
            return false;
        };
        let Some(cart_id) = self.ensure_cart().await else {
            return false;
        };
        match self.backend.discount_delete_applied(&code, &cart_id).await {
            Ok(outcome) if outcome.executed => {
                if self.state.last_discount_code.as_deref() == Some(code.as_str()) {
                    self.state.last_discount_code = None;
                }
                true
            }
            Ok(outcome) => {
                self.state.error_message = Some(outcome.message);
                false
            }
            Err(err) => {
                self.state.error_message = Some(err.to_string());
                false
            }
        }
    }

    /// Delete a discount by id, independent of any cart.
    pub async fn delete_discount(&mut self, discount_id: i64) -> bool {
        match self.backend.discount_delete(discount_id).await {
            Ok(outcome) if outcome.executed => {
                if self.state.last_discount_id == Some(discount_id) {
                    self.state.last_discount_id = None;
                }
                true
            }
            Ok(outcome) => {
                self.state.error_message = Some(outcome.message);
                false
            }
            Err(err) => {
                self.state.error_message = Some(err.to_string());
                false
            }
        }
    }

    async fn apply_once(&mut self, code: &str, cart_id: &str) -> bool {
        match self.backend.discount_apply(code, cart_id).await {
            Ok(outcome) if outcome.executed => {
                self.state.last_discount_code = Some(code.to_string());
                self.state.error_message = None;
                true
            }
            Ok(outcome) => {
                debug!(code, message = %outcome.message, "discount not executed");
                false
            }
            Err(err) => {
                self.state.error_message = Some(err.to_string());
                false
            }
        }
    }

    /// Resolve an existing discount id by code: channel-scoped list first,
    /// then the full list, case-insensitively.
    async fn lookup_discount_id(&mut self, code: &str) -> Option<i64> {
        let matches = |candidate: &Option<String>| {
            candidate
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(code))
        };

        if let Ok(discounts) = self.backend.discounts_by_channel().await
            && let Some(found) = discounts.iter().find(|d| matches(&d.code))
        {
            return Some(found.id);
        }
        match self.backend.discounts().await {
            Ok(discounts) => discounts.iter().find(|d| matches(&d.code)).map(|d| d.id),
            Err(err) => {
                warn!(error = %err, "discount lookup failed");
                None
            }
        }
    }
}
