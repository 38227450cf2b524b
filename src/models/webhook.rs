//! Webhook models.
//!
//! Webhooks are the one resource with a string identity. Their
//! authentication is a closed union keyed by `type`; the API never echoes
//! secrets back, so `data` is usually partial or absent on reads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ApiResource;

/// Supported webhook authentication schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationType {
    /// HTTP basic auth.
    BasicAuth,
    /// `Authorization: Bearer` token.
    BearerToken,
    /// A custom header carrying a key.
    ApiKey,
}

impl AuthenticationType {
    /// Wire name of the scheme.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthenticationType::BasicAuth => "basic_auth",
            AuthenticationType::BearerToken => "bearer_token",
            AuthenticationType::ApiKey => "api_key",
        }
    }
}

impl fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthenticationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic_auth" => Ok(AuthenticationType::BasicAuth),
            "bearer_token" => Ok(AuthenticationType::BearerToken),
            "api_key" => Ok(AuthenticationType::ApiKey),
            other => Err(format!(
                "expected one of basic_auth, bearer_token, api_key, got {other:?}"
            )),
        }
    }
}

/// Credential payload. The variant is recognized by its keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthenticationData {
    /// Basic auth credentials; the password is write-only.
    Basic {
        /// User name.
        username: String,
        /// Password.
        #[serde(default, skip_serializing_if = "String::is_empty")]
        password: String,
    },
    /// Header name and key.
    ApiKey {
        /// Header name.
        name: String,
        /// Header value.
        #[serde(default, skip_serializing_if = "String::is_empty")]
        value: String,
    },
    /// Bearer token.
    Bearer {
        /// The token.
        token: String,
    },
}

/// Authentication block of a webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAuthentication {
    /// Scheme.
    #[serde(rename = "type")]
    pub kind: AuthenticationType,

    /// Where the credential goes; the API only supports `header`.
    #[serde(default = "default_add_position")]
    pub add_position: String,

    /// Credentials; absent or partial on reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AuthenticationData>,
}

fn default_add_position() -> String {
    "header".to_string()
}

/// A webhook.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Webhook {
    /// Unique webhook ID (opaque string).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Webhook name.
    pub name: String,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Target URL.
    pub endpoint: String,

    /// HTTP verb (`GET`, `POST`, ...).
    pub http_method: String,

    /// Body encoding (`json`, `xml`, `form_encoded`).
    pub request_format: String,

    /// `active` or `inactive`.
    pub status: String,

    /// Event subscriptions (`conditional_ticket_events`, ...).
    #[serde(default)]
    pub subscriptions: Vec<String>,

    /// Authentication, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<WebhookAuthentication>,

    /// Creation timestamp.
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,

    /// Last update timestamp.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl ApiResource for Webhook {
    type Id = String;
    const COLLECTION: &'static str = "webhooks";
    const ENVELOPE: &'static str = "webhook";
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_without_secret_data() {
        let json = r#"{"type": "bearer_token", "add_position": "header"}"#;
        let auth: WebhookAuthentication = serde_json::from_str(json).unwrap();
        assert_eq!(auth.kind, AuthenticationType::BearerToken);
        assert_eq!(auth.data, None);
    }

    #[test]
    fn test_basic_auth_without_password() {
        let json = r#"{
            "type": "basic_auth",
            "add_position": "header",
            "data": {"username": "bot"}
        }"#;
        let auth: WebhookAuthentication = serde_json::from_str(json).unwrap();
        assert_eq!(
            auth.data,
            Some(AuthenticationData::Basic {
                username: "bot".to_string(),
                password: String::new(),
            })
        );
    }

    #[test]
    fn test_api_key_is_not_mistaken_for_basic() {
        let json = r#"{"type": "api_key", "data": {"name": "X-Key", "value": "k"}}"#;
        let auth: WebhookAuthentication = serde_json::from_str(json).unwrap();
        assert_eq!(auth.add_position, "header");
        assert!(matches!(auth.data, Some(AuthenticationData::ApiKey { .. })));
    }

    #[test]
    fn test_authentication_type_parse() {
        assert_eq!(
            "api_key".parse::<AuthenticationType>().unwrap(),
            AuthenticationType::ApiKey
        );
        assert!("oauth".parse::<AuthenticationType>().is_err());
    }
}
