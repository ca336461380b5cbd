//! Environment readiness check.
//!
//! Reports on the extraction tool, the cookie jar and the server settings.
//! Every failure includes a fix instruction.

use crate::assets::AssetProvisioner;
use crate::cli::output::{self, Styled};
use crate::config::GatewayConfig;
use crate::extraction::ExtractionInvoker;
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything the doctor found out.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub version: &'static str,
    pub os: &'static str,
    pub arch: &'static str,
    pub binary_path: PathBuf,
    pub binary_present: bool,
    pub binary_size_bytes: Option<u64>,
    pub binary_executable: bool,
    pub tool_version: Option<String>,
    pub cookie_path: PathBuf,
    pub cookies_configured: bool,
    pub cookies_present: bool,
    pub public_dir: PathBuf,
    pub public_dir_present: bool,
    pub listen: String,
    pub extract_timeout_secs: Option<u64>,
}

impl DoctorReport {
    /// A missing tool is fine, it is fetched on first use. A present tool
    /// that does not run is not.
    pub fn ready(&self) -> bool {
        !self.binary_present || self.tool_version.is_some()
    }
}

/// Inspect the environment described by `config`.
pub async fn collect(config: &GatewayConfig) -> DoctorReport {
    let provisioner = Arc::new(AssetProvisioner::new(Arc::new(config.assets.clone())));
    let status = provisioner.status();
    let binary_path = config.assets.binary_path.clone();

    let tool_version = if status.binary_present {
        ExtractionInvoker::new(provisioner).tool_version().await
    } else {
        None
    };

    DoctorReport {
        version: env!("CARGO_PKG_VERSION"),
        os: std::env::consts::OS,
        arch: std::env::consts::ARCH,
        binary_size_bytes: std::fs::metadata(&binary_path).ok().map(|m| m.len()),
        binary_executable: is_executable(&binary_path),
        binary_present: status.binary_present,
        binary_path,
        tool_version,
        cookie_path: config.assets.cookie_path.clone(),
        cookies_configured: status.cookies_configured,
        cookies_present: status.cookies_present,
        public_dir: config.public_dir.clone(),
        public_dir_present: config.public_dir.is_dir(),
        listen: format!("{}:{}", config.host, config.port),
        extract_timeout_secs: config.extract_timeout.map(|t| t.as_secs()),
    }
}

/// Run the doctor. Fails when the tool is present but unusable, so the
/// process exits non-zero.
pub async fn run(config: &GatewayConfig) -> Result<()> {
    let report = collect(config).await;

    if output::is_json() {
        output::print_json(&serde_json::to_value(&report)?);
    } else {
        print_report(&report);
    }

    if !report.ready() {
        anyhow::bail!("yt-dlp at {} does not run", report.binary_path.display());
    }
    Ok(())
}

fn print_report(report: &DoctorReport) {
    let s = Styled::new();
    let mut has_warning = false;

    output::print_header(&s);

    // ── Tool ────────────────────────────────────────────────────────────
    output::print_section(&s, "Tool");
    output::print_check(
        s.ok_sym(),
        "Platform:",
        &format!("{} ({})", report.os, report.arch),
    );

    if report.binary_present {
        let size = report
            .binary_size_bytes
            .map(output::format_size)
            .unwrap_or_else(|| "unknown size".to_string());
        match &report.tool_version {
            Some(version) => output::print_check(
                s.ok_sym(),
                "yt-dlp:",
                &format!("{version} ({size}) at {}", report.binary_path.display()),
            ),
            None => {
                output::print_check(
                    s.fail_sym(),
                    "yt-dlp:",
                    &format!("present at {} but does not run", report.binary_path.display()),
                );
                if !report.binary_executable {
                    output::print_detail("The file is not executable.");
                }
                output::print_detail("Fix: run 'ytdl-gateway install --force'");
            }
        }
    } else {
        output::print_check(s.warn_sym(), "yt-dlp:", "not downloaded yet");
        output::print_detail("It is fetched on the first request.");
        output::print_detail("Run 'ytdl-gateway install' to fetch it now.");
        has_warning = true;
    }

    match (report.cookies_configured, report.cookies_present) {
        (_, true) => output::print_check(
            s.ok_sym(),
            "cookies.txt:",
            &report.cookie_path.display().to_string(),
        ),
        (true, false) => {
            output::print_check(s.warn_sym(), "cookies.txt:", "configured, not downloaded yet");
            has_warning = true;
        }
        (false, false) => {
            output::print_check(s.warn_sym(), "cookies.txt:", "not configured");
            output::print_detail("Set COOKIE_FILE to a cookies.txt URL for sites that need login.");
            has_warning = true;
        }
    }

    eprintln!();

    // ── Server ──────────────────────────────────────────────────────────
    output::print_section(&s, "Server");
    output::print_check(s.ok_sym(), "Listen:", &report.listen);

    if report.public_dir_present {
        output::print_check(s.ok_sym(), "Static files:", &report.public_dir.display().to_string());
    } else {
        output::print_check(
            s.warn_sym(),
            "Static files:",
            &format!("{} does not exist", report.public_dir.display()),
        );
        has_warning = true;
    }

    match report.extract_timeout_secs {
        Some(secs) => output::print_check(s.ok_sym(), "Timeout:", &format!("{secs}s per extraction")),
        None => {
            output::print_check(s.warn_sym(), "Timeout:", "none");
            output::print_detail("Set YTDL_EXTRACT_TIMEOUT_SECS to bound stuck yt-dlp runs.");
            has_warning = true;
        }
    }

    if !report.ready() {
        output::print_status(&s, "NOT READY", "fix issues above");
    } else if has_warning {
        output::print_status(&s, "READY", "some warnings above");
    } else {
        output::print_status(&s, "READY", "start with 'ytdl-gateway serve'");
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
