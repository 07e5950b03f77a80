//! GraphQL-over-HTTP transport.
//!
//! Posts `{ query, variables }` envelopes with `reqwest` and maps the
//! response envelope into [`CommerceError`]. Parsing is split out of the
//! transport so it can be unit-tested without a server.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::error::CommerceError;

/// Raw transport for GraphQL operations.
pub(crate) struct GraphqlTransport {
    http: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

impl GraphqlTransport {
    pub(crate) fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Execute one operation and return the envelope's `data` value.
    pub(crate) async fn execute(
        &self,
        document: &str,
        variables: Value,
    ) -> Result<Value, CommerceError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", self.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .json(&json!({ "query": document, "variables": variables }))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CommerceError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(CommerceError::Api {
                message: format!(
                    "HTTP {status}: {}",
                    body.chars().take(200).collect::<String>()
                ),
                code: None,
                status: Some(status.as_u16()),
            });
        }

        parse_envelope(&body)
    }
}

/// Parse a GraphQL response envelope, surfacing the first reported error.
///
/// Backend errors carry a machine code and sometimes an HTTP status under
/// `extensions`; `NOT_FOUND` / 404 maps to [`CommerceError::NotFound`] so
/// callers can branch on it.
pub(crate) fn parse_envelope(body: &str) -> Result<Value, CommerceError> {
    let envelope: Value = serde_json::from_str(body).map_err(|e| {
        error!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse GraphQL response"
        );
        CommerceError::Parse(e)
    })?;

    if let Some(errors) = envelope.get("errors").and_then(Value::as_array)
        && let Some(first) = errors.first()
    {
        debug!(errors = %first, "GraphQL errors in response");
        let message = first
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        let extensions = first.get("extensions");
        let code = extensions
            .and_then(|e| e.get("code"))
            .and_then(Value::as_str)
            .map(ToString::to_string);
        let status = extensions
            .and_then(|e| e.get("status"))
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok());

        if code.as_deref() == Some("NOT_FOUND") || status == Some(404) {
            return Err(CommerceError::NotFound(message));
        }
        return Err(CommerceError::Api {
            message,
            code,
            status,
        });
    }

    envelope
        .get("data")
        .filter(|data| !data.is_null())
        .cloned()
        .ok_or(CommerceError::EmptyResponse("response data"))
}

/// Walk `data` along `path` and deserialize what sits there.
pub(crate) fn pick<T: DeserializeOwned>(
    data: &Value,
    path: &[&str],
    operation: &'static str,
) -> Result<T, CommerceError> {
    let mut current = data;
    for segment in path {
        match current.get(segment) {
            Some(next) if !next.is_null() => current = next,
            _ => return Err(CommerceError::EmptyResponse(operation)),
        }
    }
    serde_json::from_value(current.clone()).map_err(CommerceError::Parse)
}
