//! Cancellable catalog loading.
//!
//! Each load captures a [`Generation`] token; a newer load supersedes an
//! older in-flight one, whose completion is then discarded instead of
//! overwriting fresher data. The begin/finish split exists so callers (and
//! tests) can interleave completions; [`CartSession::load_products`] is the
//! one-shot composition.

use seagrape_client::payloads::{ProductPayload, ProductQuery};
use seagrape_client::{CommerceBackend, CommerceError};
use tracing::{debug, warn};

use crate::engine::CartSession;

/// Monotonic request token. Only the most recently issued generation may
/// publish its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

impl Generation {
    pub(crate) const fn initial() -> Self {
        Self(0)
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// A catalog load in flight.
#[derive(Debug, Clone)]
pub struct CatalogRequest {
    generation: Generation,
    pub currency: String,
    pub country: String,
    /// Whether the backend-side cache may serve this request. Only true
    /// when the caller asked for it and the (currency, country) pair
    /// matches the last successful load.
    pub use_cache: bool,
}

impl<B: CommerceBackend> CartSession<B> {
    /// Start a catalog load, superseding any older in-flight load.
    /// Currency and country default to the active market's values.
    pub fn begin_catalog_load(
        &mut self,
        currency: Option<&str>,
        country: Option<&str>,
        use_cache: bool,
    ) -> CatalogRequest {
        self.catalog_generation = self.catalog_generation.next();
        let currency = currency.unwrap_or(&self.state.currency).to_string();
        let country = country.unwrap_or(&self.state.country).to_string();
        let cache_key_matches = self
            .state
            .last_loaded_catalog
            .as_ref()
            .is_some_and(|(c, k)| c == &currency && k == &country);
        CatalogRequest {
            generation: self.catalog_generation,
            currency,
            country,
            use_cache: use_cache && cache_key_matches,
        }
    }

    /// Publish the result of a catalog load. Returns false when the request
    /// was superseded and its result discarded. A failed load clears the
    /// product list so stale products from another market are never shown.
    pub fn finish_catalog_load(
        &mut self,
        request: &CatalogRequest,
        result: Result<Vec<ProductPayload>, CommerceError>,
    ) -> bool {
        if request.generation != self.catalog_generation {
            debug!(
                currency = %request.currency,
                country = %request.country,
                "discarding superseded catalog result"
            );
            return false;
        }
        match result {
            Ok(products) => {
                debug!(count = products.len(), "catalog loaded");
                self.state.products = products;
                self.state.products_error = None;
                self.state.last_loaded_catalog =
                    Some((request.currency.clone(), request.country.clone()));
            }
            Err(err) => {
                warn!(error = %err, "catalog load failed");
                self.state.products.clear();
                self.state.products_error = Some(err.to_string());
                self.state.last_loaded_catalog = None;
            }
        }
        true
    }

    /// Load the catalog for the given (or active) market. Returns true only
    /// when the load succeeded and was not superseded mid-flight.
    pub async fn load_products(
        &mut self,
        currency: Option<&str>,
        country: Option<&str>,
        use_cache: bool,
    ) -> bool {
        let request = self.begin_catalog_load(currency, country, use_cache);
        let query = ProductQuery {
            currency: request.currency.clone(),
            shipping_country: request.country.clone(),
            image_size: self.config.image_size.clone(),
            use_cache: request.use_cache,
        };
        let result = self.backend.products(&query).await;
        let succeeded = result.is_ok();
        self.finish_catalog_load(&request, result) && succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::testing::OfflineBackend;
    use seagrape_core::Market;
    use serde_json::json;

    fn session() -> CartSession<OfflineBackend> {
        let market = Market::new("US", "United States", "USD", "$", "+1");
        CartSession::new(OfflineBackend, SessionConfig::new(market, "seagrape"))
    }

    fn products(title: &str) -> Vec<ProductPayload> {
        vec![serde_json::from_value(json!({
            "id": 1,
            "title": title,
            "price": { "amount": 10.0, "currency_code": "USD" }
        }))
        .expect("product payload")]
    }

    #[test]
    fn later_request_supersedes_earlier_one() {
        let mut session = session();
        let first = session.begin_catalog_load(Some("USD"), Some("US"), false);
        let second = session.begin_catalog_load(Some("NOK"), Some("NO"), false);

        assert!(session.finish_catalog_load(&second, Ok(products("Norwegian"))));
        assert!(!session.finish_catalog_load(&first, Ok(products("American"))));

        assert_eq!(session.state().products[0].title, "Norwegian");
        assert_eq!(
            session.state().last_loaded_catalog,
            Some(("NOK".to_string(), "NO".to_string()))
        );
    }

    #[test]
    fn cache_only_honored_for_matching_market() {
        let mut session = session();
        let request = session.begin_catalog_load(None, None, true);
        assert!(!request.use_cache);

        session.finish_catalog_load(&request, Ok(products("First")));

        let same_market = session.begin_catalog_load(None, None, true);
        assert!(same_market.use_cache);

        let other_market = session.begin_catalog_load(Some("NOK"), Some("NO"), true);
        assert!(!other_market.use_cache);
    }

    #[test]
    fn failed_load_clears_products() {
        let mut session = session();
        let request = session.begin_catalog_load(None, None, false);
        session.finish_catalog_load(&request, Ok(products("First")));

        let retry = session.begin_catalog_load(None, None, false);
        session.finish_catalog_load(
            &retry,
            Err(CommerceError::EmptyResponse("products")),
        );

        assert!(session.state().products.is_empty());
        assert!(session.state().products_error.is_some());
        assert_eq!(session.state().last_loaded_catalog, None);
    }
}
