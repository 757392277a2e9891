//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, security headers)
//! - Hold the shared upstream client and the swappable config snapshot
//! - Apply config reloads while serving
//! - Serve plain TCP or TLS with graceful shutdown

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{extract::Request, http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{AppConfig, ListenerConfig};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::{assets, ideas, image_proxy};
use crate::net::tls::load_tls_config;
use crate::security;
use crate::security::allow_list::redirect_policy;

/// Time kept back from the request timeout so upstream deadlines fire first.
const RESPONSE_HEADROOM: Duration = Duration::from_millis(250);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ArcSwap<AppConfig>>,
    /// Client for the ideas API and the logo.
    pub client: reqwest::Client,
    /// Client for image hosts; only follows redirects that pass the allow-list.
    pub image_client: reqwest::Client,
    /// Router-wide timeout, fixed when the router is built.
    pub request_timeout: Duration,
}

impl AppState {
    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<AppConfig> {
        self.config.load_full()
    }

    /// How long a handler may spend on upstream calls and still answer
    /// before the request timeout does.
    pub fn upstream_budget(&self) -> Duration {
        self.request_timeout.saturating_sub(RESPONSE_HEADROOM)
    }
}

/// HTTP server for the ideas relay.
pub struct HttpServer {
    router: Router,
    listener_config: ListenerConfig,
    config: Arc<ArcSwap<AppConfig>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let connect_timeout = Duration::from_secs(config.timeouts.connect_secs);
        let request_timeout = Duration::from_secs(config.timeouts.request_secs);
        let listener_config = config.listener.clone();
        let shared = Arc::new(ArcSwap::from_pointee(config));

        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        let image_client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .redirect(redirect_policy(shared.clone()))
            .build()?;

        let state = AppState {
            config: shared.clone(),
            client,
            image_client,
            request_timeout,
        };

        let router = build_router(state);
        Ok(Self {
            router,
            listener_config,
            config: shared,
        })
    }

    /// The fully layered router, for serving or for driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get the current config snapshot.
    pub fn config(&self) -> Arc<AppConfig> {
        self.config.load_full()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<AppConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        spawn_config_applier(self.config.clone(), config_updates);

        let app = self.router.into_make_service();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS using the configured certificate and key.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        config_updates: mpsc::UnboundedReceiver<AppConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let tls = self.listener_config.tls.clone().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "TLS is not configured")
        })?;
        let rustls = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;

        spawn_config_applier(self.config.clone(), config_updates);

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received");
            shutdown_handle.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        tracing::info!(address = %addr, "HTTPS server starting");
        axum_server::bind_rustls(addr, rustls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    let snapshot = state.config();
    let request_timeout = state.request_timeout;

    let router = Router::new()
        .route("/api/ideas", get(ideas::list_ideas))
        .route("/api/image-proxy", get(image_proxy::proxy_image))
        .route("/api/banner", get(assets::get_banner))
        .route("/api/logo-proxy", get(assets::get_logo))
        .route("/health", get(assets::get_status))
        .with_state(state);

    let router = if snapshot.security.enable_headers {
        security::headers::apply(router)
    } else {
        router
    };

    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %request_id(request),
            )
        }))
        .layer(set_request_id_layer())
}

fn spawn_config_applier(
    target: Arc<ArcSwap<AppConfig>>,
    mut updates: mpsc::UnboundedReceiver<AppConfig>,
) {
    tokio::spawn(async move {
        while let Some(config) = updates.recv().await {
            tracing::info!(
                allowed_prefixes = ?config.image_proxy.allowed_prefixes,
                disguises = config.image_proxy.disguises.len(),
                "Applying reloaded configuration"
            );
            target.store(Arc::new(config));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reload_replaces_snapshot() {
        let server = HttpServer::new(AppConfig::default()).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        spawn_config_applier(server.config.clone(), rx);

        let mut updated = AppConfig::default();
        updated.banner.title = "Reloaded".into();
        tx.send(updated).unwrap();

        for _ in 0..50 {
            if server.config().banner.title == "Reloaded" {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("config was not swapped");
    }

    #[test]
    fn upstream_budget_stays_inside_request_timeout() {
        let state = AppState {
            config: Arc::new(ArcSwap::from_pointee(AppConfig::default())),
            client: reqwest::Client::new(),
            image_client: reqwest::Client::new(),
            request_timeout: Duration::from_secs(1),
        };
        assert_eq!(state.upstream_budget(), Duration::from_millis(750));
    }
}
