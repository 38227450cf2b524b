//! Webhooks and their authentication.
//!
//! The API never returns secrets. Reads keep the password, token, or key
//! value already held in state so a refresh does not report drift.

use serde::{Deserialize, Serialize};

use super::{optional, required};
use crate::crud::ResourceModel;
use crate::framework::{AttributePath, Diagnostic, Diagnostics, Value};
use crate::models::{AuthenticationData, AuthenticationType, Webhook, WebhookAuthentication};

const HTTP_METHODS: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];
const REQUEST_FORMATS: [&str; 3] = ["json", "xml", "form_encoded"];

/// User name and password for HTTP basic auth.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BasicAuthModel {
    /// User name.
    #[serde(default)]
    pub username: Value<String>,

    /// Password. Write-only.
    #[serde(default)]
    pub password: Value<String>,
}

/// A token sent as `Authorization: Bearer`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BearerTokenModel {
    /// Token value. Write-only.
    #[serde(default)]
    pub token: Value<String>,
}

/// An API key sent as a named header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiKeyModel {
    /// Header name.
    #[serde(default)]
    pub name: Value<String>,

    /// Key value. Write-only.
    #[serde(default)]
    pub value: Value<String>,
}

/// How the helpdesk authenticates to the webhook endpoint.
///
/// Exactly one of the credential blocks must be set, matching `type`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WebhookAuthenticationModel {
    /// `basic_auth`, `bearer_token` or `api_key`.
    #[serde(rename = "type", default)]
    pub kind: Value<String>,

    /// Where credentials go. Only `header` is supported by the API.
    #[serde(default)]
    pub add_position: Value<String>,

    /// Credentials for `basic_auth`.
    #[serde(default)]
    pub basic_auth: Value<BasicAuthModel>,

    /// Credentials for `bearer_token`.
    #[serde(default)]
    pub bearer_token: Value<BearerTokenModel>,

    /// Credentials for `api_key`.
    #[serde(default)]
    pub api_key: Value<ApiKeyModel>,
}

/// Configuration of a webhook.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WebhookModel {
    /// Server-assigned id. Webhook ids are opaque strings.
    #[serde(default)]
    pub id: Value<String>,

    /// Webhook name.
    #[serde(default)]
    pub name: Value<String>,

    /// Free-text description.
    #[serde(default)]
    pub description: Value<String>,

    /// URL the helpdesk calls.
    #[serde(default)]
    pub endpoint: Value<String>,

    /// HTTP method, e.g. `POST`.
    #[serde(default)]
    pub http_method: Value<String>,

    /// Body format: `json`, `xml` or `form_encoded`.
    #[serde(default)]
    pub request_format: Value<String>,

    /// `active` or `inactive`.
    #[serde(default)]
    pub status: Value<String>,

    /// Event subscriptions, e.g. `conditional_ticket_events`.
    #[serde(default)]
    pub subscriptions: Value<Vec<String>>,

    /// Credentials sent with each call. `Null` for none.
    #[serde(default)]
    pub authentication: Value<WebhookAuthenticationModel>,
}

fn one_of(value: String, allowed: &[&str], name: &str) -> Result<String, Diagnostic> {
    if allowed.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(Diagnostic::attribute_error(
            AttributePath::root(name),
            format!("Invalid {name}"),
            format!("expected one of {}, got {value:?}", allowed.join(", ")),
        ))
    }
}

/// Fails when a credential block other than the selected one is set.
fn reject_block<T>(
    block: &Value<T>,
    path: &AttributePath,
    kind: AuthenticationType,
) -> Result<(), Diagnostic> {
    if block.is_null() {
        return Ok(());
    }
    Err(Diagnostic::attribute_error(
        path.clone(),
        "Conflicting authentication",
        format!("only the {kind} block may be set when type is {kind}"),
    ))
}

fn authentication_to_api(
    model: &WebhookAuthenticationModel,
    path: &AttributePath,
) -> Result<WebhookAuthentication, Diagnostic> {
    let kind_path = path.attr("type");
    let kind = model
        .kind
        .require(&kind_path)?
        .parse::<AuthenticationType>()
        .map_err(|e| Diagnostic::attribute_error(kind_path, "Invalid authentication type", e))?;
    let add_position = model
        .add_position
        .resolve_cloned(&path.attr("add_position"))?
        .unwrap_or_else(|| "header".to_string());

    let basic_path = path.attr("basic_auth");
    let bearer_path = path.attr("bearer_token");
    let key_path = path.attr("api_key");
    let data = match kind {
        AuthenticationType::BasicAuth => {
            reject_block(&model.bearer_token, &bearer_path, kind)?;
            reject_block(&model.api_key, &key_path, kind)?;
            let basic = model.basic_auth.require(&basic_path)?;
            AuthenticationData::Basic {
                username: basic.username.require(&basic_path.attr("username"))?.clone(),
                password: basic
                    .password
                    .resolve_cloned(&basic_path.attr("password"))?
                    .unwrap_or_default(),
            }
        }
        AuthenticationType::BearerToken => {
            reject_block(&model.basic_auth, &basic_path, kind)?;
            reject_block(&model.api_key, &key_path, kind)?;
            let bearer = model.bearer_token.require(&bearer_path)?;
            AuthenticationData::Bearer {
                token: bearer.token.require(&bearer_path.attr("token"))?.clone(),
            }
        }
        AuthenticationType::ApiKey => {
            reject_block(&model.basic_auth, &basic_path, kind)?;
            reject_block(&model.bearer_token, &bearer_path, kind)?;
            let key = model.api_key.require(&key_path)?;
            AuthenticationData::ApiKey {
                name: key.name.require(&key_path.attr("name"))?.clone(),
                value: key
                    .value
                    .resolve_cloned(&key_path.attr("value"))?
                    .unwrap_or_default(),
            }
        }
    };

    Ok(WebhookAuthentication {
        kind,
        add_position,
        data: Some(data),
    })
}

/// Keeps `prior` when the API left a secret out.
fn keep_secret(received: String, prior: Option<&Value<String>>) -> Value<String> {
    if received.is_empty() {
        prior.cloned().unwrap_or(Value::Null)
    } else {
        Value::Known(received)
    }
}

fn authentication_from_api(
    api: WebhookAuthentication,
    prior: Option<&WebhookAuthenticationModel>,
) -> WebhookAuthenticationModel {
    let mut model = WebhookAuthenticationModel {
        kind: Value::Known(api.kind.to_string()),
        add_position: Value::Known(api.add_position),
        ..Default::default()
    };
    let prior_basic = prior.and_then(|p| p.basic_auth.as_known());
    let prior_bearer = prior.and_then(|p| p.bearer_token.as_known());
    let prior_key = prior.and_then(|p| p.api_key.as_known());

    match (api.kind, api.data) {
        (_, Some(AuthenticationData::Basic { username, password })) => {
            model.basic_auth = Value::Known(BasicAuthModel {
                username: Value::Known(username),
                password: keep_secret(password, prior_basic.map(|b| &b.password)),
            });
        }
        (_, Some(AuthenticationData::Bearer { token })) => {
            model.bearer_token = Value::Known(BearerTokenModel {
                token: keep_secret(token, prior_bearer.map(|b| &b.token)),
            });
        }
        (_, Some(AuthenticationData::ApiKey { name, value })) => {
            model.api_key = Value::Known(ApiKeyModel {
                name: Value::Known(name),
                value: keep_secret(value, prior_key.map(|k| &k.value)),
            });
        }
        (AuthenticationType::BasicAuth, None) => {
            model.basic_auth = Value::from_option(prior_basic.cloned());
        }
        (AuthenticationType::BearerToken, None) => {
            model.bearer_token = Value::from_option(prior_bearer.cloned());
        }
        (AuthenticationType::ApiKey, None) => {
            model.api_key = Value::from_option(prior_key.cloned());
        }
    }
    model
}

impl WebhookModel {
    fn build(&self) -> Result<Webhook, Diagnostic> {
        let authentication = match self
            .authentication
            .resolve(&AttributePath::root("authentication"))?
        {
            Some(auth) => Some(authentication_to_api(
                auth,
                &AttributePath::root("authentication"),
            )?),
            None => None,
        };
        Ok(Webhook {
            name: required(&self.name, "name")?,
            description: optional(&self.description, "description")?,
            endpoint: required(&self.endpoint, "endpoint")?,
            http_method: one_of(
                required(&self.http_method, "http_method")?,
                &HTTP_METHODS,
                "http_method",
            )?,
            request_format: one_of(
                required(&self.request_format, "request_format")?,
                &REQUEST_FORMATS,
                "request_format",
            )?,
            status: one_of(required(&self.status, "status")?, &["active", "inactive"], "status")?,
            subscriptions: optional(&self.subscriptions, "subscriptions")?.unwrap_or_default(),
            authentication,
            ..Default::default()
        })
    }
}

impl ResourceModel for WebhookModel {
    type Api = Webhook;
    const TYPE_NAME: &'static str = "webhook";

    fn to_api_model(&self, diags: &mut Diagnostics) -> Option<Webhook> {
        diags.capture(self.build())
    }

    fn from_api_model(&mut self, api: Webhook, _diags: &mut Diagnostics) {
        self.id = Value::from_option(api.id);
        self.name = Value::Known(api.name);
        self.description = Value::from_option(api.description);
        self.endpoint = Value::Known(api.endpoint);
        self.http_method = Value::Known(api.http_method);
        self.request_format = Value::Known(api.request_format);
        self.status = Value::Known(api.status);
        self.subscriptions = Value::from_non_empty(api.subscriptions);
        let prior = self.authentication.as_known();
        self.authentication = match api.authentication {
            Some(auth) => Value::Known(authentication_from_api(auth, prior)),
            None => Value::Null,
        };
    }

    fn id(&self) -> Option<String> {
        self.id.as_known().cloned()
    }
}
