//! Configuration management for deskplan.
//!
//! This module handles loading the API client configuration from
//! environment variables, with validation to ensure all required values
//! are present.

use crate::error::DeskError;
use std::env;
use url::Url;

/// Configuration for connecting to the helpdesk API.
///
/// All fields are required and loaded from environment variables.
/// The API token is stored but never logged or exposed in error messages.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the helpdesk account (e.g., `https://acme.zendesk.com`).
    pub base_url: String,

    /// Agent email the API token belongs to.
    pub email: String,

    /// API token for authentication.
    /// This value must never be logged or included in error messages.
    api_token: String,
}

impl Config {
    /// Builds a configuration from explicit values, applying the same
    /// validation as [`Config::from_env`].
    pub fn new(
        base_url: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self, DeskError> {
        let base_url = Self::validate_base_url(base_url.into())?;
        let api_token = api_token.into();
        Self::validate_api_token(&api_token)?;

        Ok(Config {
            base_url,
            email: email.into(),
            api_token,
        })
    }

    /// Loads configuration from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `HELPDESK_URL`: The base URL of the helpdesk account
    /// - `HELPDESK_EMAIL`: The agent email used for token authentication
    /// - `HELPDESK_API_TOKEN`: The API token for authentication
    ///
    /// # Errors
    ///
    /// Returns `DeskError::Config` if any required variable is missing
    /// or if values fail validation.
    pub fn from_env() -> Result<Self, DeskError> {
        let base_url = Self::get_required_env("HELPDESK_URL")?;
        let email = Self::get_required_env("HELPDESK_EMAIL")?;
        let api_token = Self::get_required_env("HELPDESK_API_TOKEN")?;

        Self::new(base_url, email, api_token)
    }

    /// Returns the API token. Only the HTTP client should call this.
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, DeskError> {
        env::var(name)
            .map_err(|_| DeskError::missing_env(name))
            .and_then(|value| {
                if value.trim().is_empty() {
                    Err(DeskError::missing_env(name))
                } else {
                    Ok(value)
                }
            })
    }

    /// Validates and normalizes the base URL.
    fn validate_base_url(url: String) -> Result<String, DeskError> {
        let url = url.trim().trim_end_matches('/').to_string();

        let parsed = Url::parse(&url).map_err(|e| {
            DeskError::invalid_config(format!("HELPDESK_URL is not a valid URL: {}", e))
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(DeskError::invalid_config(
                "HELPDESK_URL must start with http:// or https://",
            ));
        }

        Ok(url)
    }

    /// Validates the API token is not a placeholder value.
    fn validate_api_token(token: &str) -> Result<(), DeskError> {
        let token_lower = token.to_lowercase();
        let placeholder_patterns = [
            "your_api_token",
            "your_token",
            "placeholder",
            "xxx",
            "changeme",
        ];

        for pattern in placeholder_patterns {
            if token_lower.contains(pattern) {
                return Err(DeskError::invalid_config(
                    "HELPDESK_API_TOKEN appears to be a placeholder value",
                ));
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}
