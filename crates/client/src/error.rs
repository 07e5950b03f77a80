//! Typed errors for backend operations.

use thiserror::Error;

/// Errors that can occur when talking to the commerce backend.
///
/// `Api` carries the backend's machine code (e.g., `NOT_FOUND`) and HTTP
/// status when present; `NotFound` is split out because callers branch on it
/// (market loading falls back silently instead of surfacing an error).
#[derive(Debug, Error)]
pub enum CommerceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend reported an operation error.
    #[error("API error [{}]: {message}", format_code(.code))]
    Api {
        message: String,
        /// Machine code from the error's extensions (e.g., "NOT_FOUND").
        code: Option<String>,
        /// HTTP status, when the error maps to one.
        status: Option<u16>,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A required field was missing from an otherwise successful response.
    #[error("Empty response in {0}")]
    EmptyResponse(&'static str),
}

fn format_code(code: &Option<String>) -> &str {
    code.as_deref().unwrap_or("UNKNOWN")
}

impl CommerceError {
    /// Whether this error means "the resource legitimately does not exist"
    /// rather than a transient or server failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Api { code, status, .. } => {
                code.as_deref() == Some("NOT_FOUND") || *status == Some(404)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        assert!(CommerceError::NotFound("market".into()).is_not_found());
        assert!(
            CommerceError::Api {
                message: "no markets".into(),
                code: Some("NOT_FOUND".into()),
                status: None,
            }
            .is_not_found()
        );
        assert!(
            CommerceError::Api {
                message: "gone".into(),
                code: None,
                status: Some(404),
            }
            .is_not_found()
        );
        assert!(
            !CommerceError::Api {
                message: "boom".into(),
                code: Some("INTERNAL".into()),
                status: Some(500),
            }
            .is_not_found()
        );
    }

    #[test]
    fn api_error_display_includes_code() {
        let err = CommerceError::Api {
            message: "nope".into(),
            code: Some("VALIDATION".into()),
            status: None,
        };
        assert_eq!(err.to_string(), "API error [VALIDATION]: nope");
        let plain = CommerceError::Api {
            message: "nope".into(),
            code: None,
            status: None,
        };
        assert_eq!(plain.to_string(), "API error [UNKNOWN]: nope");
    }
}
