//! Discount payloads.

use serde::{Deserialize, Serialize};

/// A discount record (from list or create operations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountPayload {
    pub id: i64,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub percentage: Option<i64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Outcome of apply/remove/delete discount mutations.
///
/// `executed == false` is a non-error "nothing happened" (e.g., the code
/// does not exist); callers must never treat it as success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountActionPayload {
    pub executed: bool,
    #[serde(default)]
    pub message: String,
}
