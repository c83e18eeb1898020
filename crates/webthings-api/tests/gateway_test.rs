#![allow(clippy::unwrap_used)]
// End-to-end tests for `Gateway`: real TCP probing against a wiremock
// gateway on loopback, then the `/things` fetch.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use webthings_api::{Error, Gateway, GatewayConfig, Resolution, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

/// `.invalid` is reserved and never resolves.
const DEAD_DOMAIN: &str = "gateway.invalid";

async fn mock_gateway() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "lamp-1", "title": "Desk Lamp" },
            { "id": "plug-2", "title": "Coffee Maker" }
        ])))
        .mount(&server)
        .await;
    server
}

fn config(domain: &str, fallback: &str, port: u16) -> GatewayConfig {
    GatewayConfig::new(domain, SecretString::from("test-token".to_string()))
        .with_tls(false)
        .with_port(port)
        .with_fallback_domain(fallback)
        .with_probe_timeout(Duration::from_millis(500))
}

fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

// ── Resolution ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_primary_endpoint_is_used() {
    let server = mock_gateway().await;
    let port = server.address().port();
    let gateway =
        Gateway::new(config("127.0.0.1", DEAD_DOMAIN, port), TransportConfig::default()).unwrap();

    let resolution = gateway.resolve().await;
    assert!(matches!(resolution, Resolution::Primary(_)), "{resolution:?}");

    let things = gateway.fetch_things().await.unwrap();
    assert_eq!(things.len(), 2);
    assert_eq!(things[0].display_name(), Some("Desk Lamp"));
    assert_eq!(things[1].display_name(), Some("Coffee Maker"));
}

#[tokio::test]
async fn test_fallback_endpoint_when_primary_does_not_resolve() {
    let server = mock_gateway().await;
    let port = server.address().port();
    let gateway =
        Gateway::new(config(DEAD_DOMAIN, "127.0.0.1", port), TransportConfig::default()).unwrap();

    let resolution = gateway.resolve().await;
    assert_eq!(
        resolution.url().map(url::Url::as_str),
        Some(format!("http://127.0.0.1:{port}/").as_str())
    );
    assert!(matches!(resolution, Resolution::Fallback(_)), "{resolution:?}");

    let things = gateway.fetch_things().await.unwrap();
    assert_eq!(things.len(), 2);
}

#[tokio::test]
async fn test_unreachable_surfaces_as_error() {
    let port = closed_port();
    let gateway =
        Gateway::new(config(DEAD_DOMAIN, "127.0.0.1", port), TransportConfig::default()).unwrap();

    assert_eq!(gateway.resolve().await, Resolution::Unreachable);

    let result = gateway.fetch_things().await;
    match result {
        Err(Error::Unreachable { primary, fallback }) => {
            assert_eq!(primary, format!("http://gateway.invalid:{port}/"));
            assert_eq!(fallback, format!("http://127.0.0.1:{port}/"));
        }
        other => panic!("expected Unreachable, got: {other:?}"),
    }
}

// ── Fetch failures through the facade ───────────────────────────────

#[tokio::test]
async fn test_gateway_http_error_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let port = server.address().port();
    let gateway =
        Gateway::new(config("127.0.0.1", DEAD_DOMAIN, port), TransportConfig::default()).unwrap();

    let err = gateway.fetch_things().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_unusable_fallback_does_not_block_primary() {
    let server = mock_gateway().await;
    let port = server.address().port();
    let gateway =
        Gateway::new(config("127.0.0.1", "my_gateway.lan", port), TransportConfig::default())
            .unwrap();

    assert!(gateway.resolver().fallback_url().is_none());
    assert!(matches!(gateway.resolve().await, Resolution::Primary(_)));
    assert_eq!(gateway.fetch_things().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_unusable_fallback_reported_when_primary_down() {
    let port = closed_port();
    let gateway =
        Gateway::new(config("127.0.0.1", "my_gateway.lan", port), TransportConfig::default())
            .unwrap();

    match gateway.fetch_things().await {
        Err(Error::Unreachable { fallback, .. }) => {
            assert_eq!(fallback, "my_gateway.lan (invalid address)");
        }
        other => panic!("expected Unreachable, got: {other:?}"),
    }
}

#[test]
fn test_invalid_domain_is_rejected_up_front() {
    let result = Gateway::new(
        config("gateway example com", "gateway.local", 80),
        TransportConfig::default(),
    );
    assert!(matches!(result, Err(Error::InvalidAddress { .. })));
}
