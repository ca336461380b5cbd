//! `ytdl-gateway serve` — run the HTTP server until interrupted.

use crate::cli::output::{self, Styled};
use crate::config::GatewayConfig;
use crate::server::Server;
use anyhow::Result;
use tracing::info;

/// Start the server, applying command-line overrides to `config`.
pub async fn run(mut config: GatewayConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    info!("starting ytdl-gateway v{}", env!("CARGO_PKG_VERSION"));
    info!("yt-dlp path: {}", config.assets.binary_path.display());
    if config.extract_timeout.is_none() {
        info!("no extraction timeout configured; a stuck yt-dlp run blocks its request");
    }

    if !output::is_quiet() {
        let s = Styled::new();
        eprintln!(
            "  {} ytdl-gateway v{} listening on http://{}:{}",
            s.ok_sym(),
            env!("CARGO_PKG_VERSION"),
            config.host,
            config.port
        );
    }

    let server = Server::new(config)?;
    let shutdown = server.shutdown_handle();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("received shutdown signal");
        shutdown.notify_one();
    });

    server.start().await
}
