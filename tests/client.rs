//! HTTP client behavior against a mock helpdesk.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use deskplan::client::HelpdeskClient;
use deskplan::config::Config;
use deskplan::crud::{self, ImportResourceStateRequest, ResourceApi};
use deskplan::error::DeskError;
use deskplan::models::{Group, Webhook};
use deskplan::resources::{self, GroupModel, ResourceKind};

// base64("agent@acme.test/token:s3cr3t")
const AUTH_HEADER: &str = "Basic YWdlbnRAYWNtZS50ZXN0L3Rva2VuOnMzY3IzdA==";

fn client_for(server: &MockServer) -> HelpdeskClient {
    let config = Config::new(server.uri(), "agent@acme.test", "s3cr3t").unwrap();
    HelpdeskClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_create_wraps_and_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/groups"))
        .and(header("authorization", AUTH_HEADER))
        .and(body_json(json!({"group": {"name": "Tier 2"}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "group": {"id": 7, "name": "Tier 2", "created_at": "2026-01-01T00:00:00Z"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let group = Group {
        name: "Tier 2".to_string(),
        ..Default::default()
    };
    let created: Group = client.create(group).await.unwrap();
    assert_eq!(created.id, Some(7));
    assert_eq!(created.name, "Tier 2");
}

#[tokio::test]
async fn test_read_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/groups/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "RecordNotFound"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = ResourceApi::<Group>::read(&client, &404).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "groups not found: 404");
}

#[tokio::test]
async fn test_unauthorized_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/groups/1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = ResourceApi::<Group>::read(&client, &1).await.unwrap_err();
    assert!(matches!(err, DeskError::Authentication));
}

#[tokio::test]
async fn test_server_error_body_is_redacted() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v2/groups/3"))
        .respond_with(ResponseTemplate::new(422).set_body_string("token s3cr3t rejected"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let group = Group {
        name: "Tier 3".to_string(),
        ..Default::default()
    };
    let err = client.update(&3, group).await.unwrap_err();
    match err {
        DeskError::HttpStatus { status, body } => {
            assert_eq!(status.as_u16(), 422);
            assert_eq!(body, "token [REDACTED] rejected");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/webhooks/01GXYZ"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    ResourceApi::<Webhook>::delete(&client, &"01GXYZ".to_string())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_import_group_through_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/groups/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "group": {"id": 12, "name": "Billing", "is_public": true}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = crud::import::<GroupModel, _>(
        &client,
        ImportResourceStateRequest {
            id: "12".to_string(),
        },
    )
    .await;
    assert!(response.diagnostics.is_empty());
    let state = response.state.unwrap();
    assert_eq!(state.as_json()["name"], "Billing");
    assert_eq!(state.as_json()["id"], 12);
}

#[tokio::test]
async fn test_import_kind_dispatches_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/webhooks/01GXYZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "webhook": {
                "id": "01GXYZ",
                "name": "Notify ops",
                "endpoint": "https://ops.example.com/hook",
                "http_method": "POST",
                "request_format": "json",
                "status": "active",
                "subscriptions": ["conditional_ticket_events"]
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let kind: ResourceKind = "webhook".parse().unwrap();
    let response = resources::import_kind(&client, kind, "01GXYZ").await;
    assert!(response.diagnostics.is_empty());
    assert_eq!(response.state.unwrap().as_json()["id"], "01GXYZ");
}
