//! Command-line interface for the `ytdl-gateway` binary.

pub mod doctor;
pub mod install_cmd;
pub mod output;
pub mod serve;

use crate::config::GatewayConfig;
use crate::logging;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ytdl-gateway", version, about = "yt-dlp metadata over HTTP")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Machine-readable output for install and doctor.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress human-oriented output.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default).
    Serve {
        /// Address to listen on (overrides HOST).
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides PORT).
        #[arg(long, short)]
        port: Option<u16>,
    },
    /// Download yt-dlp and cookies.txt now.
    Install {
        /// Download again even if the files exist.
        #[arg(long)]
        force: bool,
    },
    /// Check the tool and server configuration.
    Doctor,
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_json)?;
    output::init(output::OutputFlags {
        json: cli.json,
        quiet: cli.quiet,
    });

    let config = GatewayConfig::from_env().context("invalid configuration")?;

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::Serve { host, port } => serve::run(config, host, port).await,
        Commands::Install { force } => install_cmd::run_with_force(&config, force).await,
        Commands::Doctor => doctor::run(&config).await,
    }
}
