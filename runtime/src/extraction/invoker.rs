//! Run the extraction tool against one URL and parse its output.

use crate::assets::AssetProvisioner;
use crate::error::ExtractError;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Fixed flags passed on every run, after the cookie jar.
const IGNORE_ERRORS_FLAG: &str = "--ignore-errors";
const DUMP_JSON_FLAG: &str = "--dump-json";

/// Invokes yt-dlp, provisioning it first if needed.
pub struct ExtractionInvoker {
    provisioner: Arc<AssetProvisioner>,
    timeout: Option<Duration>,
}

impl ExtractionInvoker {
    /// Create an invoker that waits for the tool as long as it takes.
    pub fn new(provisioner: Arc<AssetProvisioner>) -> Self {
        Self {
            provisioner,
            timeout: None,
        }
    }

    /// Bound each run. The child is killed when the bound expires.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provisioner(&self) -> &Arc<AssetProvisioner> {
        &self.provisioner
    }

    /// Extract metadata for `url`.
    ///
    /// `url` must be non-empty; callers validate it. Any output on stderr is
    /// a failure, even when the tool exits successfully.
    pub async fn extract(&self, url: &str) -> Result<serde_json::Value, ExtractError> {
        self.provisioner.ensure_assets().await?;

        let locations = self.provisioner.locations();
        let args = tool_args(&locations.cookie_path, url);
        let binary = &locations.binary_path;

        info!("running yt-dlp for {url}");

        let mut command = Command::new(binary);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(self.timeout.is_some());

        let run = command.output();
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("yt-dlp timed out after {limit:?} for {url}");
                    return Err(ExtractError::Timeout(limit));
                }
            },
            None => run.await,
        };

        let output = output.map_err(|source| {
            warn!("error executing yt-dlp: {source}");
            ExtractError::Launch {
                binary: binary.clone(),
                source,
            }
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            warn!("yt-dlp exited with {}: {}", output.status, stderr.trim_end());
            return Err(ExtractError::Exit {
                status: output.status,
                stderr,
            });
        }
        if !stderr.is_empty() {
            warn!("yt-dlp stderr output: {}", stderr.trim_end());
            return Err(ExtractError::Stderr(stderr));
        }

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).map_err(|e| {
            warn!("failed to parse JSON from yt-dlp output: {e}");
            ExtractError::Parse(e)
        })?;

        debug!("yt-dlp result: {value}");
        Ok(value)
    }

    /// Version string reported by the provisioned tool, if it runs.
    pub async fn tool_version(&self) -> Option<String> {
        let output = Command::new(&self.provisioner.locations().binary_path)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!version.is_empty()).then_some(version)
    }
}

/// Argument list in the order the tool expects:
/// `--cookies <jar> --ignore-errors --dump-json <url>`.
pub fn tool_args(cookie_path: &Path, url: &str) -> Vec<OsString> {
    vec![
        OsString::from("--cookies"),
        cookie_path.as_os_str().to_owned(),
        OsString::from(IGNORE_ERRORS_FLAG),
        OsString::from(DUMP_JSON_FLAG),
        OsString::from(url),
    ]
}
