//! Market payloads.

use seagrape_core::Market;
use serde::{Deserialize, Serialize};

/// Currency block on a market record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CurrencyPayload {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// An available market as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MarketPayload {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub official: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub phone_code: Option<String>,
    #[serde(default)]
    pub currency: Option<CurrencyPayload>,
}

impl MarketPayload {
    /// Convert to a domain [`Market`], filling gaps from a fallback market.
    ///
    /// A payload without a country code is unusable and yields `None`.
    #[must_use]
    pub fn to_market(&self, fallback: &Market) -> Option<Market> {
        let code = self.code.as_deref().filter(|c| !c.is_empty())?;
        let currency = self.currency.clone().unwrap_or_default();
        Some(Market {
            code: code.to_string(),
            name: self
                .name
                .clone()
                .or_else(|| self.official.clone())
                .unwrap_or_else(|| code.to_string()),
            currency_code: currency
                .code
                .unwrap_or_else(|| fallback.currency_code.clone()),
            currency_symbol: currency
                .symbol
                .unwrap_or_else(|| fallback.currency_symbol.clone()),
            phone_code: self
                .phone_code
                .clone()
                .unwrap_or_else(|| fallback.phone_code.clone()),
            flag_url: self.flag.clone(),
        })
    }
}
