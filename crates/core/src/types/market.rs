//! Market (country + currency) selection.

use serde::{Deserialize, Serialize};

/// A sales market: a country paired with the currency it prices in.
///
/// Exactly one market is selected per session; it determines the currency
/// and shipping country of the cart, plus the display-only metadata the
/// presentation layer reads (symbol, phone code, flag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// ISO 3166-1 alpha-2 country code (e.g., "NO").
    pub code: String,
    /// Display name (e.g., "Norway").
    pub name: String,
    /// ISO 4217 currency code (e.g., "NOK").
    pub currency_code: String,
    /// Currency symbol for display (e.g., "kr").
    pub currency_symbol: String,
    /// International dialling prefix (e.g., "+47").
    pub phone_code: String,
    /// Flag image URL, when the backend provides one.
    pub flag_url: Option<String>,
}

impl Market {
    /// A minimal market for configuration defaults.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        currency_code: impl Into<String>,
        currency_symbol: impl Into<String>,
        phone_code: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            currency_code: currency_code.into(),
            currency_symbol: currency_symbol.into(),
            phone_code: phone_code.into(),
            flag_url: None,
        }
    }
}
