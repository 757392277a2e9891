//! Shared utilities for integration tests.

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{Request, Response};
use axum::Router;
use httpmock::MockServer;
use ideas_relay::config::{AppConfig, DisguiseConfig};
use ideas_relay::HttpServer;
use tower::ServiceExt;

/// Two easily matched disguises instead of the real browser strings.
#[allow(dead_code)]
pub fn test_disguises() -> Vec<DisguiseConfig> {
    vec![
        DisguiseConfig {
            name: "first".into(),
            user_agent: "agent-one".into(),
            referer: None,
            accept: "image/*".into(),
        },
        DisguiseConfig {
            name: "second".into(),
            user_agent: "agent-two".into(),
            referer: Some("https://site.example/".into()),
            accept: "image/*".into(),
        },
    ]
}

/// Config whose every upstream lives on `server`.
#[allow(dead_code)]
pub fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.upstream.ideas_url = server.url("/api/ideas");
    config.upstream.logo_url = server.url("/logo.png");
    config.image_proxy.allowed_prefixes = vec![server.url("/img/")];
    config.image_proxy.disguises = test_disguises();
    config.image_proxy.placeholder_url = server.url("/placeholder.svg");
    config.image_proxy.attempt_timeout_ms = 2_000;
    config
}

pub fn app(config: AppConfig) -> Router {
    HttpServer::new(config).unwrap().router()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    to_bytes(response.into_body(), usize::MAX).await.unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// `/api/image-proxy?url=...` with the target percent-encoded.
#[allow(dead_code)]
pub fn proxy_uri(target: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("/api/image-proxy?url={encoded}")
}
