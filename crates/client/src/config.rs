//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SEAGRAPE_API_URL` - GraphQL endpoint of the commerce backend
//! - `SEAGRAPE_API_KEY` - API key for the backend
//!
//! ## Optional
//! - `SEAGRAPE_IMAGE_SIZE` - Catalog image size requested (default: large)

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Commerce backend client configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint URL.
    pub api_url: String,
    /// Backend API key.
    pub api_key: SecretString,
    /// Catalog image size requested from the backend.
    pub image_size: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("image_size", &self.image_size)
            .finish()
    }
}

impl ClientConfig {
    /// Build a config directly, mainly for tests and embedding apps that
    /// manage their own settings.
    #[must_use]
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: SecretString::from(api_key.into()),
            image_size: "large".to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = require_env("SEAGRAPE_API_URL")?;
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::InvalidEnvVar(
                "SEAGRAPE_API_URL".to_string(),
                "must be an http(s) URL".to_string(),
            ));
        }
        let api_key = require_env("SEAGRAPE_API_KEY")?;
        let image_size =
            std::env::var("SEAGRAPE_IMAGE_SIZE").unwrap_or_else(|_| "large".to_string());

        Ok(Self {
            api_url,
            api_key: SecretString::from(api_key),
            image_size,
        })
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}
