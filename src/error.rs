//! Error types for deskplan.
//!
//! This module defines `DeskError`, the error type returned by the API
//! client and the lower-level conversions. The orchestration layer turns
//! these into diagnostics for the configuration engine.
//!
//! # Security
//!
//! All error messages are sanitized to ensure API tokens are never leaked
//! in logs or diagnostics. Use `sanitize_message()` when constructing
//! error messages from external sources.

use thiserror::Error;

/// Unified error type for all deskplan operations.
#[derive(Error, Debug)]
pub enum DeskError {
    /// Configuration error - missing or invalid environment variables.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request failed during transmission.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// HTTP response returned a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The response body, potentially containing error details.
        body: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A response body did not carry the expected envelope key.
    #[error("unexpected response: missing {envelope:?} envelope")]
    MissingEnvelope {
        /// The envelope key that was expected.
        envelope: &'static str,
    },

    /// Requested resource was not found.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Collection the lookup was made against.
        resource: String,
        /// The ID of the resource that was not found.
        id: String,
    },

    /// Authentication failed - likely an invalid API token.
    #[error("authentication failed - check HELPDESK_EMAIL and HELPDESK_API_TOKEN")]
    Authentication,

    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// A wire field name carried a custom-field prefix with a malformed id.
    #[error("invalid custom field reference {field:?}: {reason}")]
    FieldReference {
        /// The wire field name as received.
        field: String,
        /// Why the id could not be recovered.
        reason: String,
    },
}

impl DeskError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        DeskError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        DeskError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        DeskError::Validation(message.into())
    }

    /// Creates a not found error.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        DeskError::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Creates a malformed custom-field reference error.
    pub fn field_reference(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DeskError::FieldReference {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the remote object does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, DeskError::NotFound { .. })
            || matches!(self, DeskError::HttpStatus { status, .. } if status.as_u16() == 404)
    }

    /// Sanitizes an error message to remove any occurrence of the API token.
    ///
    /// API tokens must never appear in logs, error messages, or diagnostics.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to sanitize
    /// * `api_token` - The API token to strip from the message
    ///
    /// # Returns
    ///
    /// The message with any occurrence of the token replaced with `[REDACTED]`
    #[must_use]
    pub fn sanitize_message(message: &str, api_token: &str) -> String {
        if api_token.is_empty() {
            return message.to_string();
        }
        message.replace(api_token, "[REDACTED]")
    }

    /// Creates a sanitized version of this error's display message.
    #[must_use]
    pub fn sanitized_display(&self, api_token: &str) -> String {
        Self::sanitize_message(&self.to_string(), api_token)
    }
}
