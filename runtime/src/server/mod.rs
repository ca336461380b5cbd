//! HTTP server: extraction API, image proxy, pages and static files.

pub mod pages;
pub mod routes;

use crate::assets::AssetProvisioner;
use crate::config::GatewayConfig;
use crate::error::ProxyError;
use crate::extraction::ExtractionInvoker;
use crate::proxy::ImageProxy;
use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub invoker: Arc<ExtractionInvoker>,
    pub proxy: ImageProxy,
}

impl AppState {
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ProxyError> {
        let provisioner = AssetProvisioner::new(Arc::new(config.assets.clone()));
        let invoker =
            ExtractionInvoker::new(Arc::new(provisioner)).with_timeout(config.extract_timeout);
        Ok(Self {
            invoker: Arc::new(invoker),
            proxy: ImageProxy::new(config.proxy_timeout)?,
        })
    }
}

/// Build the full route table. Unmatched paths are served from `public_dir`.
pub fn router(state: AppState, public_dir: &Path) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/docs", get(pages::docs))
        .route("/ytdl", get(routes::ytdl_get).post(routes::ytdl_post))
        .route("/proxy", get(routes::proxy_image))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The gateway HTTP server.
pub struct Server {
    config: GatewayConfig,
    state: AppState,
    shutdown: Arc<Notify>,
}

impl Server {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let state = AppState::from_config(&config).context("failed to build HTTP client")?;
        Ok(Self {
            config,
            state,
            shutdown: Arc::new(Notify::new()),
        })
    }

    /// Notify this handle to stop accepting connections and drain.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn start(self) -> Result<()> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port))
            .await
            .with_context(|| format!("failed to bind {}:{}", self.config.host, self.config.port))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until shutdown.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr().context("listener has no local address")?;
        info!("server is running on http://{addr}");

        let app = router(self.state, &self.config.public_dir);
        let shutdown = self.shutdown;
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.notified().await })
            .await
            .context("HTTP server failed")?;

        info!("server stopped");
        Ok(())
    }
}
