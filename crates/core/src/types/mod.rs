//! Core types for Seagrape.

pub mod market;
pub mod money;
pub mod status;

pub use market::Market;
pub use money::{Money, TaxedAmount, decimal_from_wire};
pub use status::PaymentStatus;
