//! HTTP client for the helpdesk REST API.
//!
//! This module provides [`HelpdeskClient`], the reqwest-backed
//! implementation of [`ResourceApi`] for every wire record.
//!
//! # Security
//!
//! The API token is never logged. Error bodies are redacted before they
//! are returned or logged.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};

use crate::config::Config;
use crate::crud::ResourceApi;
use crate::error::DeskError;
use crate::models::ApiResource;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// API path prefix below the account URL.
const API_PREFIX: &str = "/api/v2";

/// Maximum length for HTTP error response bodies.
const MAX_ERROR_BODY_LEN: usize = 500;

/// HTTP client for the helpdesk API.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let client = HelpdeskClient::new(&config)?;
///
/// let trigger: Trigger = client.read(&360001).await?;
/// ```
#[derive(Clone)]
pub struct HelpdeskClient {
    /// The underlying HTTP client (cloning is cheap).
    http: Client,

    /// Account URL with the API prefix, e.g. `https://acme.zendesk.com/api/v2`.
    base_url: String,

    /// Agent email the token belongs to.
    email: String,

    /// SECURITY: Never log this value!
    api_token: String,
}

impl HelpdeskClient {
    /// Creates a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, DeskError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(DeskError::HttpClient)?;

        Ok(Self {
            http,
            base_url: Self::normalize_base_url(&config.base_url),
            email: config.email.clone(),
            api_token: config.api_token().to_string(),
        })
    }

    /// Ensures the base URL ends with the API prefix exactly once.
    fn normalize_base_url(url: &str) -> String {
        let url = url.trim_end_matches('/');
        if url.ends_with(API_PREFIX) {
            url.to_string()
        } else {
            format!("{url}{API_PREFIX}")
        }
    }

    fn collection_url<A: ApiResource>(&self) -> String {
        format!("{}/{}", self.base_url, A::COLLECTION)
    }

    fn record_url<A: ApiResource>(&self, id: &A::Id) -> String {
        format!(
            "{}/{}",
            self.collection_url::<A>(),
            urlencoding::encode(&id.to_string())
        )
    }

    /// Wraps a record in its envelope: `{"<envelope>": {...}}`.
    fn wrap<A: ApiResource>(record: &A) -> Result<serde_json::Value, DeskError> {
        let mut envelope = serde_json::Map::new();
        envelope.insert(A::ENVELOPE.to_string(), serde_json::to_value(record)?);
        Ok(serde_json::Value::Object(envelope))
    }

    /// Takes the record out of its envelope.
    fn unwrap<A: ApiResource>(mut body: serde_json::Value) -> Result<A, DeskError> {
        let record = body
            .get_mut(A::ENVELOPE)
            .map(serde_json::Value::take)
            .ok_or(DeskError::MissingEnvelope {
                envelope: A::ENVELOPE,
            })?;
        Ok(serde_json::from_value(record)?)
    }

    /// Sends one request and returns the parsed body, if any.
    ///
    /// `id` names the record for not-found errors.
    async fn send<A: ApiResource>(
        &self,
        method: Method,
        url: String,
        id: Option<&A::Id>,
        body: Option<serde_json::Value>,
    ) -> Result<Option<serde_json::Value>, DeskError> {
        tracing::debug!(
            method = %method,
            collection = A::COLLECTION,
            "Making helpdesk API request"
        );

        let mut req = self
            .http
            .request(method, &url)
            .basic_auth(format!("{}/token", self.email), Some(&self.api_token))
            .header("Accept", "application/json");
        if let Some(body) = body {
            req = req.json(&body);
        }

        let response = req.send().await.map_err(DeskError::Http)?;
        let status = response.status();
        if !status.is_success() {
            let id = id.map(ToString::to_string).unwrap_or_default();
            return Err(self.handle_http_error::<A>(status, response, id).await);
        }

        let text = response.text().await.map_err(DeskError::Http)?;
        tracing::trace!(body = %text, "Helpdesk API response");
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Converts a non-success response into a `DeskError`.
    async fn handle_http_error<A: ApiResource>(
        &self,
        status: StatusCode,
        response: reqwest::Response,
        id: String,
    ) -> DeskError {
        let body = response.text().await.unwrap_or_default();
        let body = DeskError::sanitize_message(&body, &self.api_token);
        let body = if body.chars().count() > MAX_ERROR_BODY_LEN {
            let head: String = body.chars().take(MAX_ERROR_BODY_LEN).collect();
            format!("{head}...[truncated]")
        } else {
            body
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::warn!(status = %status, "Helpdesk API rejected credentials");
                DeskError::Authentication
            }
            StatusCode::NOT_FOUND => DeskError::not_found(A::COLLECTION, id),
            _ => {
                tracing::warn!(
                    status = %status,
                    collection = A::COLLECTION,
                    "Helpdesk API request failed"
                );
                DeskError::HttpStatus { status, body }
            }
        }
    }

    async fn fetch_record<A: ApiResource>(
        &self,
        method: Method,
        url: String,
        id: Option<&A::Id>,
        body: Option<serde_json::Value>,
    ) -> Result<A, DeskError> {
        let body = self
            .send::<A>(method, url, id, body)
            .await?
            .ok_or(DeskError::MissingEnvelope {
                envelope: A::ENVELOPE,
            })?;
        Self::unwrap(body)
    }
}

#[async_trait]
impl<A: ApiResource> ResourceApi<A> for HelpdeskClient {
    async fn create(&self, record: A) -> Result<A, DeskError> {
        let body = Self::wrap(&record)?;
        self.fetch_record(Method::POST, self.collection_url::<A>(), None, Some(body))
            .await
    }

    async fn read(&self, id: &A::Id) -> Result<A, DeskError> {
        self.fetch_record(Method::GET, self.record_url::<A>(id), Some(id), None)
            .await
    }

    async fn update(&self, id: &A::Id, record: A) -> Result<A, DeskError> {
        let body = Self::wrap(&record)?;
        self.fetch_record(Method::PUT, self.record_url::<A>(id), Some(id), Some(body))
            .await
    }

    async fn delete(&self, id: &A::Id) -> Result<(), DeskError> {
        self.send::<A>(Method::DELETE, self.record_url::<A>(id), Some(id), None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Group, Webhook};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn client() -> HelpdeskClient {
        let config = Config::new("https://acme.zendesk.com/", "agent@acme.test", "s3cr3t").unwrap();
        HelpdeskClient::new(&config).unwrap()
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            HelpdeskClient::normalize_base_url("https://acme.zendesk.com"),
            "https://acme.zendesk.com/api/v2"
        );
        assert_eq!(
            HelpdeskClient::normalize_base_url("https://acme.zendesk.com/api/v2/"),
            "https://acme.zendesk.com/api/v2"
        );
    }

    #[test]
    fn test_record_url_encodes_id() {
        let client = client();
        assert_eq!(
            client.record_url::<Group>(&42),
            "https://acme.zendesk.com/api/v2/groups/42"
        );
        assert_eq!(
            client.record_url::<Webhook>(&"01G/X Y".to_string()),
            "https://acme.zendesk.com/api/v2/webhooks/01G%2FX%20Y"
        );
    }

    #[test]
    fn test_envelope_round_trip() {
        let group = Group {
            name: "Tier 2".to_string(),
            ..Default::default()
        };
        let wrapped = HelpdeskClient::wrap(&group).unwrap();
        assert_eq!(wrapped["group"]["name"], "Tier 2");
        let back: Group = HelpdeskClient::unwrap(wrapped).unwrap();
        assert_eq!(back, group);
    }

    #[test]
    fn test_missing_envelope() {
        let err = HelpdeskClient::unwrap::<Group>(json!({"groups": []})).unwrap_err();
        assert!(matches!(err, DeskError::MissingEnvelope { envelope: "group" }));
    }
}
