//! Money and taxed-amount handling backed by decimal arithmetic.
//!
//! The backend delivers monetary amounts as JSON numbers, usually in a base
//! and an optional tax-inclusive form. Derived totals are kept in
//! [`rust_decimal::Decimal`] so repeated summation stays exact.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// A monetary amount with its ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g., "USD", "NOK").
    pub currency_code: String,
}

impl Money {
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// Zero in the given currency.
    #[must_use]
    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }
}

/// A wire amount that may carry a tax-inclusive variant.
///
/// The tax-inclusive field wins whenever it is present, *including* an
/// explicit `0.0` (free shipping / zero-tax lines); the base amount is used
/// only when the field is entirely absent. Presence is modelled with
/// `Option`, so the distinction survives deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxedAmount {
    pub amount: Option<f64>,
    pub amount_incl_taxes: Option<f64>,
}

impl TaxedAmount {
    #[must_use]
    pub const fn new(amount: Option<f64>, amount_incl_taxes: Option<f64>) -> Self {
        Self {
            amount,
            amount_incl_taxes,
        }
    }

    /// The amount the customer actually pays, if any amount is known.
    #[must_use]
    pub fn effective(&self) -> Option<f64> {
        self.amount_incl_taxes.or(self.amount)
    }

    /// Like [`Self::effective`], defaulting to zero when nothing is known.
    #[must_use]
    pub fn effective_or_zero(&self) -> f64 {
        self.effective().unwrap_or(0.0)
    }
}

/// Convert a wire `f64` into a `Decimal`, mapping non-finite input to zero.
///
/// Uses the shortest-representation conversion so `19.99` comes out as the
/// decimal `19.99`, not the full binary expansion.
#[must_use]
pub fn decimal_from_wire(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxed_amount_prefers_inclusive() {
        let t = TaxedAmount::new(Some(10.0), Some(12.5));
        assert_eq!(t.effective(), Some(12.5));
    }

    #[test]
    fn explicit_zero_inclusive_beats_base() {
        // Free-shipping lines report amount_incl_taxes = 0.0 alongside a
        // non-zero base amount; the zero must win.
        let t = TaxedAmount::new(Some(4.99), Some(0.0));
        assert_eq!(t.effective(), Some(0.0));
    }

    #[test]
    fn absent_inclusive_falls_back_to_base() {
        let t = TaxedAmount::new(Some(4.99), None);
        assert_eq!(t.effective(), Some(4.99));
        assert_eq!(TaxedAmount::default().effective(), None);
        assert_eq!(TaxedAmount::default().effective_or_zero(), 0.0);
    }

    #[test]
    fn wire_decimal_conversion() {
        assert_eq!(decimal_from_wire(10.5), Decimal::new(105, 1));
        assert_eq!(decimal_from_wire(f64::NAN), Decimal::ZERO);
    }
}
