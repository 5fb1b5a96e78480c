// End-to-end pipeline behavior against mock controllers: isolation
// between controllers, category-level degradation, and session-expiry
// escalation.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::time::Duration;

use netscribe_api::{ApiDialect, Credential, DialectSelection};
use netscribe_core::config::{ControllerProfile, TlsVerification};
use netscribe_core::output::{OutputManager, read_status};
use netscribe_core::pipeline::{HealthStatus, RunOptions, classify, run_once};
use netscribe_core::render::OutputFormat;
use netscribe_core::{Category, PipelineError};
use secrecy::SecretString;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ok_envelope() -> serde_json::Value {
    json!({ "meta": { "rc": "ok" }, "data": [] })
}

fn profile(name: &str, server: &MockServer) -> ControllerProfile {
    profile_with(name, server, Credential::Password {
        username: "admin".to_string(),
        password: SecretString::from("secret".to_string()),
    })
}

fn profile_with(name: &str, server: &MockServer, credential: Credential) -> ControllerProfile {
    ControllerProfile {
        name: name.to_string(),
        url: server.uri().parse().unwrap(),
        credential,
        site: "default".to_string(),
        tls: TlsVerification::DangerAcceptInvalid,
        timeout: Duration::from_secs(5),
        dialect: DialectSelection::Pinned(ApiDialect::V5),
    }
}

async fn healthy_controller() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    // every data category answers with an empty, well-formed envelope
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope()))
        .with_priority(10)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn failures_stay_per_controller() {
    let good = healthy_controller().await;
    let bad = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.Invalid" }, "data": []
        })))
        .mount(&bad)
        .await;

    let dir = TempDir::new().unwrap();
    let output = OutputManager::new(dir.path()).unwrap();
    let profiles = vec![profile("alpha", &good), profile("beta", &bad)];

    let results = run_once(&profiles, &output, &RunOptions::default()).await;

    assert_eq!(results.len(), 2);
    assert!(results[0].outcome.is_ok());
    assert!(matches!(
        results[1].outcome,
        Err(PipelineError::Authentication { .. })
    ));
    assert_eq!(classify(&results), HealthStatus::Degraded);

    // alpha's document landed; beta produced only a failure record
    assert!(dir.path().join("alpha-latest.md").exists());
    assert!(!dir.path().join("beta-latest.md").exists());
    let ledger = read_status(dir.path()).unwrap();
    assert!(ledger["alpha"].success);
    assert!(!ledger["beta"].success);
}

#[tokio::test]
async fn failed_category_degrades_instead_of_failing() {
    let server = healthy_controller().await;
    Mock::given(method("GET"))
        .and(path("/api/s/default/rest/firewallrule"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = OutputManager::new(dir.path()).unwrap();
    let profiles = vec![profile("lab", &server)];

    let results = run_once(&profiles, &output, &RunOptions::default()).await;

    let success = results[0].outcome.as_ref().unwrap();
    assert_eq!(success.collection_warnings.len(), 1);
    assert_eq!(success.collection_warnings[0].category, Category::FirewallRules);

    // the document still exists, with the section present but empty
    let doc = fs::read_to_string(dir.path().join("lab-latest.md")).unwrap();
    assert!(doc.contains("## Firewall Rules"));
    assert!(doc.contains("_None configured._"));
}

#[tokio::test]
async fn session_expiry_aborts_the_controller() {
    let server = healthy_controller().await;
    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/device"))
        .respond_with(ResponseTemplate::new(401))
        .with_priority(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = OutputManager::new(dir.path()).unwrap();
    let profiles = vec![profile("lab", &server)];

    let results = run_once(&profiles, &output, &RunOptions::default()).await;

    assert!(matches!(results[0].outcome, Err(PipelineError::SessionExpired)));
    assert_eq!(classify(&results), HealthStatus::Unhealthy);
    // partial data is discarded, nothing committed
    assert!(!dir.path().join("lab-latest.md").exists());
}

#[tokio::test]
async fn api_key_controller_documents_without_login() {
    let server = MockServer::start().await;
    // identity probe instead of a login handshake; the key rides on
    // every data fetch as a Bearer header
    Mock::given(method("GET"))
        .and(path("/api/self"))
        .and(wiremock::matchers::header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(wiremock::matchers::header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope()))
        .with_priority(10)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = OutputManager::new(dir.path()).unwrap();
    let credential = Credential::ApiKey(SecretString::from("test-key".to_string()));
    let profiles = vec![profile_with("lab", &server, credential)];

    let results = run_once(&profiles, &output, &RunOptions::default()).await;

    assert!(results[0].outcome.is_ok(), "got: {:?}", results[0].outcome);
    assert!(dir.path().join("lab-latest.md").exists());
    // no password handshake was ever attempted
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/api/login"));
}

#[tokio::test]
async fn both_formats_are_committed_when_requested() {
    let server = healthy_controller().await;
    let dir = TempDir::new().unwrap();
    let output = OutputManager::new(dir.path()).unwrap();
    let profiles = vec![profile("lab", &server)];
    let options = RunOptions {
        formats: vec![OutputFormat::Markdown, OutputFormat::Json],
        ..Default::default()
    };

    let results = run_once(&profiles, &output, &options).await;

    let success = results[0].outcome.as_ref().unwrap();
    assert_eq!(success.paths.len(), 2);
    assert!(dir.path().join("lab-latest.md").exists());
    assert!(dir.path().join("lab-latest.json").exists());

    // the json document round-trips into an equal snapshot
    let bytes = fs::read(dir.path().join("lab-latest.json")).unwrap();
    let snapshot: netscribe_core::SiteSnapshot = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(snapshot.controller.name, "lab");
    assert_eq!(snapshot.controller.dialect, "v5");
}

#[tokio::test]
async fn cancellation_skips_remaining_controllers() {
    let server = healthy_controller().await;
    let dir = TempDir::new().unwrap();
    let output = OutputManager::new(dir.path()).unwrap();
    let profiles = vec![profile("alpha", &server), profile("beta", &server)];

    let options = RunOptions::default();
    options.cancel.cancel();

    let results = run_once(&profiles, &output, &options).await;
    assert!(results.is_empty());
}
