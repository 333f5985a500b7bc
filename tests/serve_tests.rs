mod auth_support;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use loophole::api::{GatewayClient, RequestErrorKind};
use loophole::error::LoopholeError;
use loophole::tunnel::{
    self, BasicAuth, ExposeHttpConfig, LocalEndpoint, RemoteEndpointSpecs, TunnelSession,
    TunnelTransport,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_support::{config_for, CountingRefresher, InMemoryTokenStore};

#[derive(Default)]
struct RecordingTransport {
    sessions: Mutex<Vec<TunnelSession>>,
}

#[async_trait]
impl TunnelTransport for RecordingTransport {
    async fn establish(&self, session: TunnelSession) -> Result<(), LoopholeError> {
        self.sessions.lock().unwrap().push(session);
        Ok(())
    }
}

fn expose(dir: &TempDir, hostname: Option<&str>) -> ExposeHttpConfig {
    ExposeHttpConfig {
        local: LocalEndpoint::http("127.0.0.1", 3000),
        remote: RemoteEndpointSpecs::new(dir.path().join(".ssh").join("id_ed25519"))
            .with_site_id(hostname.map(str::to_string))
            .with_basic_auth(Some(BasicAuth {
                username: "admin".to_string(),
                password: "hunter2".to_string(),
            })),
    }
}

#[tokio::test]
async fn serve_registers_site_and_hands_session_to_transport() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register-site"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "siteId": "myapp1" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&server);
    let store = Arc::new(InMemoryTokenStore::seeded("at0", Some("rt0")));
    let refresher = Arc::new(CountingRefresher::succeeding(store.clone()));
    let gateway = GatewayClient::new(&config, store, refresher).unwrap();
    let transport = RecordingTransport::default();
    let request = expose(&dir, Some("myapp1"));
    let tunnel_id = request.remote.tunnel_id;

    tunnel::serve(&config, &gateway, &transport, request)
        .await
        .expect("serve");

    let sessions = transport.sessions.lock().unwrap();
    assert_eq!(sessions.len(), 1);
    let session = &sessions[0];
    assert_eq!(session.site_id, "myapp1");
    assert_eq!(session.site_url, "https://myapp1.loophole.site");
    assert_eq!(session.tunnel_id, tunnel_id);
    assert_eq!(session.local.uri(), "http://127.0.0.1:3000");
    assert_eq!(session.gateway, config.gateway);
    assert_eq!(
        session.basic_auth.as_ref().map(|auth| auth.username.as_str()),
        Some("admin")
    );
    assert!(dir.path().join(".ssh").join("id_ed25519").exists());

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["id"], "myapp1");
    assert!(body["key"].as_str().unwrap().starts_with("ssh-ed25519 "));
}

#[tokio::test]
async fn serve_does_not_touch_transport_when_registration_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register-site"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "message": "taken" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&server);
    let store = Arc::new(InMemoryTokenStore::seeded("at0", Some("rt0")));
    let refresher = Arc::new(CountingRefresher::succeeding(store.clone()));
    let gateway = GatewayClient::new(&config, store, refresher).unwrap();
    let transport = RecordingTransport::default();

    let err = tunnel::serve(&config, &gateway, &transport, expose(&dir, Some("taken1")))
        .await
        .unwrap_err();

    match err {
        LoopholeError::Request(ref request) => assert_eq!(request.kind, RequestErrorKind::Conflict),
        ref other => panic!("expected request error, got {other:?}"),
    }
    assert_eq!(err.details(), Some("taken"));
    assert!(transport.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn serve_reuses_existing_identity_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register-site"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "siteId": "auto-1" })))
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&server);
    let store = Arc::new(InMemoryTokenStore::seeded("at0", Some("rt0")));
    let refresher = Arc::new(CountingRefresher::succeeding(store.clone()));
    let gateway = GatewayClient::new(&config, store, refresher).unwrap();
    let transport = RecordingTransport::default();

    tunnel::serve(&config, &gateway, &transport, expose(&dir, None))
        .await
        .unwrap();
    tunnel::serve(&config, &gateway, &transport, expose(&dir, None))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let keys: Vec<serde_json::Value> = requests
        .iter()
        .map(|r| serde_json::from_slice::<serde_json::Value>(&r.body).unwrap()["key"].clone())
        .collect();
    assert_eq!(keys[0], keys[1]);
    let sessions = transport.sessions.lock().unwrap();
    assert_ne!(sessions[0].tunnel_id, sessions[1].tunnel_id);
}
