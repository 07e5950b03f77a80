//! Observable payment status for redirect-style providers.

use serde::{Deserialize, Serialize};

/// Status of an externally-completed payment (e.g., Vipps).
///
/// Redirect providers report completion through an inbound return URL; until
/// a trusted URL arrives the status stays [`Self::InProgress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unknown,
    InProgress,
    Success,
    Cancelled,
    Failed,
}

impl PaymentStatus {
    /// Parse the `status` query parameter of a provider return URL.
    #[must_use]
    pub fn from_return_param(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "cancelled" | "cancel" => Self::Cancelled,
            "failed" | "error" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_param_parsing() {
        assert_eq!(
            PaymentStatus::from_return_param("SUCCESS"),
            PaymentStatus::Success
        );
        assert_eq!(
            PaymentStatus::from_return_param("cancel"),
            PaymentStatus::Cancelled
        );
        assert_eq!(
            PaymentStatus::from_return_param("error"),
            PaymentStatus::Failed
        );
        assert_eq!(
            PaymentStatus::from_return_param("something-else"),
            PaymentStatus::Unknown
        );
    }
}
