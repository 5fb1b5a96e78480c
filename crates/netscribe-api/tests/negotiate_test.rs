#![allow(clippy::unwrap_used)]
// Integration tests for dialect negotiation using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netscribe_api::{
    ApiDialect, Credential, DialectSelection, NegotiateError, NegotiationTarget, resolve,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn target(server: &MockServer, selection: DialectSelection) -> NegotiationTarget {
    target_with(
        server,
        selection,
        Credential::Password {
            username: "admin".into(),
            password: SecretString::from("test-password".to_string()),
        },
    )
}

fn target_with(
    server: &MockServer,
    selection: DialectSelection,
    credential: Credential,
) -> NegotiationTarget {
    NegotiationTarget {
        url: Url::parse(&server.uri()).unwrap(),
        credential,
        site: "default".into(),
        transport: netscribe_api::TransportConfig::default(),
        selection,
    }
}

// ── Pinned dialect ──────────────────────────────────────────────────

#[tokio::test]
async fn test_pinned_v5_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_partial_json(json!({ "remember": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let session = resolve(&target(&server, DialectSelection::Pinned(ApiDialect::V5)))
        .await
        .unwrap();

    assert_eq!(session.dialect(), ApiDialect::V5);
}

#[tokio::test]
async fn test_pinned_failure_has_no_fallback() {
    let server = MockServer::start().await;

    // Reject the pinned dialect's login -- even though unified-os would
    // have succeeded, a pinned selection must not fall back to it.
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let result = resolve(&target(&server, DialectSelection::Pinned(ApiDialect::V5))).await;

    assert!(
        matches!(
            result,
            Err(NegotiateError::Authentication {
                dialect: ApiDialect::V5,
                ..
            })
        ),
        "expected pinned Authentication error, got: {result:?}"
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "pinned selection must attempt exactly once");
}

// ── API-key authentication ──────────────────────────────────────────

#[tokio::test]
async fn test_api_key_verified_with_bearer_probe() {
    let server = MockServer::start().await;

    // No login endpoint at all: an API key must never hit the password
    // handshake, only the identity probe with a Bearer header.
    Mock::given(method("GET"))
        .and(path("/api/self"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let target = target_with(
        &server,
        DialectSelection::Pinned(ApiDialect::V5),
        Credential::ApiKey(SecretString::from("test-key".to_string())),
    );
    let session = resolve(&target).await.unwrap();

    assert_eq!(session.dialect(), ApiDialect::V5);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/api/self");
}

#[tokio::test]
async fn test_rejected_api_key_is_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/self"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let target = target_with(
        &server,
        DialectSelection::Pinned(ApiDialect::V5),
        Credential::ApiKey(SecretString::from("bad-key".to_string())),
    );
    let result = resolve(&target).await;

    assert!(
        matches!(
            result,
            Err(NegotiateError::Authentication {
                dialect: ApiDialect::V5,
                ..
            })
        ),
        "expected Authentication error, got: {result:?}"
    );
}

// ── Auto-detection ──────────────────────────────────────────────────

#[tokio::test]
async fn test_auto_detect_short_circuits_on_unified_os() {
    let server = MockServer::start().await;

    // Only the unified-os handshake is accepted: /api/auth/login with a
    // `remember` body. The v5 path is unmounted (404), and the v6 body
    // shape (`rememberMe`) would be rejected if it were ever sent.
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({ "remember": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let session = resolve(&target(&server, DialectSelection::Auto))
        .await
        .unwrap();

    assert_eq!(session.dialect(), ApiDialect::UnifiedOs);

    // Short-circuit law: one failed v5 probe, one successful unified-os
    // probe, and nothing after it (legacy-v4 / v6 never attempted).
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url.path(), "/api/login");
    assert_eq!(requests[1].url.path(), "/api/auth/login");
}

#[tokio::test]
async fn test_auto_detect_exhaustion_carries_per_dialect_reasons() {
    let server = MockServer::start().await;

    // Nothing mounted: every handshake fails with 404.
    let result = resolve(&target(&server, DialectSelection::Auto)).await;

    let Err(NegotiateError::NoCompatibleDialect { attempts }) = result else {
        panic!("expected NoCompatibleDialect, got: {result:?}");
    };

    let tried: Vec<ApiDialect> = attempts.iter().map(|a| a.dialect).collect();
    assert_eq!(tried, ApiDialect::AUTO_PRIORITY.to_vec());
    assert!(attempts.iter().all(|a| !a.reason.is_empty()));
}

#[tokio::test]
async fn test_auto_detect_prefers_v5_when_both_accept() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let session = resolve(&target(&server, DialectSelection::Auto))
        .await
        .unwrap();

    assert_eq!(session.dialect(), ApiDialect::V5);
}
