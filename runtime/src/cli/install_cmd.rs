//! `ytdl-gateway install` — download yt-dlp and the cookie jar up front.

use crate::assets::AssetProvisioner;
use crate::cli::output::{self, Styled};
use crate::config::GatewayConfig;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Provision assets now instead of on the first request.
pub async fn run_with_force(config: &GatewayConfig, force: bool) -> Result<()> {
    let s = Styled::new();
    let provisioner = AssetProvisioner::new(Arc::new(config.assets.clone()));
    let locations = provisioner.locations();

    // Check if already installed (unless --force)
    if !force && !provisioner.status().needs_download() {
        if output::is_json() {
            output::print_json(&serde_json::json!({
                "installed": true,
                "path": locations.binary_path.display().to_string(),
                "message": "yt-dlp is already installed. Use --force to reinstall."
            }));
        } else if !output::is_quiet() {
            eprintln!(
                "  {} yt-dlp is already installed at {}",
                s.ok_sym(),
                locations.binary_path.display()
            );
            eprintln!("  Use --force to reinstall.");
        }
        return Ok(());
    }

    if !output::is_json() && !output::is_quiet() {
        output::print_header(&s);
        eprintln!("  Downloading from {}", locations.binary_url);
    }

    let report = provisioner
        .provision(force)
        .await
        .context("failed to provision yt-dlp")?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "installed": true,
            "path": locations.binary_path.display().to_string(),
            "report": report,
            "status": provisioner.status(),
        }));
        return Ok(());
    }

    if !output::is_quiet() {
        if report.binary_downloaded {
            let size = std::fs::metadata(&locations.binary_path)
                .map(|m| output::format_size(m.len()))
                .unwrap_or_else(|_| "unknown size".to_string());
            output::print_check(
                s.ok_sym(),
                "yt-dlp:",
                &format!("{size} at {}", locations.binary_path.display()),
            );
        }
        match (&locations.cookie_url, report.cookies_downloaded) {
            (Some(_), true) => output::print_check(
                s.ok_sym(),
                "cookies.txt:",
                &locations.cookie_path.display().to_string(),
            ),
            (Some(_), false) => output::print_check(s.ok_sym(), "cookies.txt:", "already present"),
            (None, _) => {
                output::print_check(s.warn_sym(), "cookies.txt:", "skipped");
                output::print_detail("Set COOKIE_FILE to a cookies.txt URL to enable it.");
            }
        }
    }

    Ok(())
}
