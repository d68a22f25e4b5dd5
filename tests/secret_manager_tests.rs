//! Secret Manager REST client tests against a wiremock server.

use auth_url_service::vault::{SecretManagerClient, SecretStore, VaultConfig, VaultError};
use base64::Engine;
use std::collections::HashMap;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn b64(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

async fn client_for(server: &MockServer) -> SecretManagerClient {
    let config = VaultConfig::new("test-project")
        .with_endpoint(server.uri())
        .with_access_token("static-test-token")
        .with_timeout(Duration::from_secs(5));
    SecretManagerClient::new(config).unwrap()
}

#[tokio::test]
async fn get_secret_parses_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/test-project/secrets/auth_url_42"))
        .and(header("authorization", "Bearer static-test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "projects/test-project/secrets/auth_url_42",
            "createTime": "2024-01-01T00:00:00Z",
            "expireTime": "2024-01-08T00:00:00Z",
            "labels": {"type": "auth_url", "provider": "google"}
        })))
        .mount(&server)
        .await;

    let record = client_for(&server)
        .await
        .get_secret("auth_url_42")
        .await
        .unwrap();

    assert_eq!(record.secret_id, "auth_url_42");
    assert_eq!(record.labels["provider"], "google");
    let expire = record.expire_time.unwrap();
    assert_eq!(expire.to_rfc3339(), "2024-01-08T00:00:00+00:00");
}

#[tokio::test]
async fn get_secret_maps_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .get_secret("auth_url_1")
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::SecretNotFound(_)));
}

#[tokio::test]
async fn get_secret_maps_403_to_permission_denied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .get_secret("auth_url_1")
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::PermissionDenied(_)));
}

#[tokio::test]
async fn server_errors_map_to_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .get_secret("auth_url_1")
        .await
        .unwrap_err();
    match err {
        VaultError::Unavailable(msg) => assert!(msg.contains("500")),
        other => panic!("expected Unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn create_secret_sends_ttl_and_labels() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/test-project/secrets"))
        .and(query_param("secretId", "auth_url_42"))
        .and(body_partial_json(serde_json::json!({
            "replication": {"automatic": {}},
            "ttl": "604800s",
            "labels": {"type": "auth_url", "provider": "google"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "projects/test-project/secrets/auth_url_42"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let labels = HashMap::from([
        ("type".to_string(), "auth_url".to_string()),
        ("provider".to_string(), "google".to_string()),
    ]);
    client_for(&server)
        .await
        .create_secret("auth_url_42", Duration::from_secs(604_800), labels)
        .await
        .unwrap();
}

#[tokio::test]
async fn create_conflict_maps_to_already_exists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .create_secret("auth_url_42", Duration::from_secs(1), HashMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::AlreadyExists(_)));
}

#[tokio::test]
async fn put_value_base64_encodes_payload() {
    let server = MockServer::start().await;
    let url = "https://app.example.com/auth/google/start?client_id=42";
    Mock::given(method("POST"))
        .and(path("/v1/projects/test-project/secrets/auth_url_42:addVersion"))
        .and(body_partial_json(serde_json::json!({
            "payload": {"data": b64(url.as_bytes())}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "projects/test-project/secrets/auth_url_42/versions/1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .await
        .put_value("auth_url_42", url.as_bytes())
        .await
        .unwrap();
}

#[tokio::test]
async fn get_value_decodes_latest_version() {
    let server = MockServer::start().await;
    let url = "https://app.example.com/auth/google/start?client_id=42";
    Mock::given(method("GET"))
        .and(path(
            "/v1/projects/test-project/secrets/auth_url_42/versions/latest:access",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "projects/test-project/secrets/auth_url_42/versions/1",
            "payload": {"data": b64(url.as_bytes())}
        })))
        .mount(&server)
        .await;

    let value = client_for(&server)
        .await
        .get_value("auth_url_42")
        .await
        .unwrap();
    assert_eq!(value, url.as_bytes());
}

#[tokio::test]
async fn token_is_minted_from_metadata_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/computeMetadata/v1/instance/service-accounts/default/token",
        ))
        .and(header("Metadata-Flavor", "Google"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "minted-token",
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/projects/test-project/secrets/auth_url_1"))
        .and(header("authorization", "Bearer minted-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "projects/test-project/secrets/auth_url_1"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let config = VaultConfig::new("test-project")
        .with_endpoint(server.uri())
        .with_metadata_host(server.uri())
        .with_timeout(Duration::from_secs(5));
    let client = SecretManagerClient::new(config).unwrap();

    // Two calls, one token mint: the cached token is reused.
    client.get_secret("auth_url_1").await.unwrap();
    client.get_secret("auth_url_1").await.unwrap();
}
