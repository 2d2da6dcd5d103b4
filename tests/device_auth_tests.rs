mod support;

use chrono::{Duration, Utc};
use coremind::auth::{
    AuthConfig, AuthError, Credential, CredentialStore, DeviceAuthClient, DeviceAuthSession,
    TokenPollResponse,
};
use support::InMemoryCredentialStore;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> DeviceAuthClient {
    DeviceAuthClient::new(AuthConfig {
        server_url: server.uri(),
        client_id: "cid_1".to_string(),
        scope: "openid profile email".to_string(),
    })
}

fn active_session(interval_secs: u64) -> DeviceAuthSession {
    DeviceAuthSession {
        device_code: "D1".to_string(),
        user_code: "ABCD-1234".to_string(),
        verification_uri: "https://example.com/device".to_string(),
        verification_uri_complete: None,
        interval_secs,
        expires_at: Utc::now() + Duration::minutes(10),
    }
}

#[tokio::test]
async fn request_device_code_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/device/code"))
        .and(body_string_contains("client_id=cid_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "D1",
            "user_code": "ABCD-1234",
            "verification_uri": "https://example.com/device",
            "verification_uri_complete": "https://example.com/device?code=ABCD-1234",
            "interval": 5,
            "expires_in": 600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = client_for(&server)
        .request_device_code()
        .await
        .expect("device code");

    assert_eq!(session.device_code, "D1");
    assert_eq!(session.user_code, "ABCD-1234");
    assert_eq!(session.interval_secs, 5);
    assert_eq!(
        session.verification_target(),
        "https://example.com/device?code=ABCD-1234"
    );
    assert!(session.expires_at > Utc::now());
    assert!(session.expires_at <= Utc::now() + Duration::seconds(601));
}

#[tokio::test]
async fn request_device_code_defaults_interval() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/device/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "D1",
            "user_code": "ABCD-1234",
            "verification_uri": "https://example.com/device",
            "expires_in": 600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = client_for(&server)
        .request_device_code()
        .await
        .expect("device code");
    assert_eq!(session.interval_secs, 5);
    assert!(session.verification_uri_complete.is_none());
}

#[tokio::test]
async fn request_device_code_rejection_is_invalid_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/device/code"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "unknown client id"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).request_device_code().await;
    assert!(
        matches!(result, Err(AuthError::InvalidRequest(message)) if message.contains("unknown client id"))
    );
}

#[tokio::test]
async fn request_device_code_transport_failure_is_provider_unavailable() {
    let client = DeviceAuthClient::new(AuthConfig {
        // Port 9 (discard) refuses connections on loopback.
        server_url: "http://127.0.0.1:9".to_string(),
        client_id: "cid_1".to_string(),
        scope: "openid".to_string(),
    });
    let result = client.request_device_code().await;
    assert!(matches!(result, Err(AuthError::ProviderUnavailable(_))));
}

#[tokio::test]
async fn poll_once_maps_pending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/device/token"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Adevice_code",
        ))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "authorization_pending"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .poll_once(&active_session(5))
        .await
        .expect("pending");
    assert!(matches!(result, TokenPollResponse::Pending));
}

#[tokio::test]
async fn poll_once_maps_slow_down() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/device/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "slow_down"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .poll_once(&active_session(5))
        .await
        .expect("slow down");
    assert!(matches!(result, TokenPollResponse::SlowDown));
}

#[tokio::test]
async fn poll_once_maps_access_denied() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/device/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "access_denied"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .poll_once(&active_session(5))
        .await
        .expect("denied");
    assert!(matches!(result, TokenPollResponse::AccessDenied));
}

#[tokio::test]
async fn poll_once_maps_expired_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/device/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "expired_token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .poll_once(&active_session(5))
        .await
        .expect("expired");
    assert!(matches!(result, TokenPollResponse::ExpiredToken));
}

#[tokio::test]
async fn poll_once_maps_unknown_error_with_description() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/device/token"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "server_error",
            "error_description": "temporary outage"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .poll_once(&active_session(5))
        .await
        .expect("other");
    match result {
        TokenPollResponse::Other { error, description } => {
            assert_eq!(error, "server_error");
            assert_eq!(description.as_deref(), Some("temporary outage"));
        }
        other => panic!("expected Other, got {other:?}"),
    }
}

#[tokio::test]
async fn poll_once_rejects_body_without_token_or_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/device/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).poll_once(&active_session(5)).await;
    assert!(matches!(result, Err(AuthError::InvalidResponse(_))));
}

#[tokio::test(start_paused = true)]
async fn poll_for_token_waits_out_pending_then_yields_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/device/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "authorization_pending"
        })))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/device/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok_abc",
            "token_type": "Bearer",
            "scope": "openid profile email",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let grant = client_for(&server)
        .poll_for_token(&active_session(5))
        .await
        .expect("grant");
    assert_eq!(grant.access_token, "tok_abc");

    let now = Utc::now();
    let credential = Credential::from_grant(grant, now);
    assert_eq!(credential.expires_at, Some(now + Duration::seconds(3600)));
    assert!(!credential.is_expired(now));
    server.verify().await;
}

#[tokio::test(start_paused = true)]
async fn poll_for_token_slow_down_then_denied_leaves_store_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/device/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "slow_down"
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/device/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "access_denied"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = InMemoryCredentialStore::new();

    let result = client_for(&server).poll_for_token(&active_session(5)).await;
    assert!(matches!(result, Err(AuthError::AccessDenied)));
    assert!(store.load().unwrap().is_none());
    server.verify().await;
}

#[tokio::test(start_paused = true)]
async fn poll_for_token_expired_session_terminates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/device/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "expired_token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).poll_for_token(&active_session(5)).await;
    assert!(matches!(result, Err(AuthError::Expired)));
}

#[tokio::test(start_paused = true)]
async fn poll_for_token_unknown_error_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/device/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "unsupported_grant_type"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).poll_for_token(&active_session(5)).await;
    assert!(
        matches!(result, Err(AuthError::Provider { error, .. }) if error == "unsupported_grant_type")
    );
}
