//! Lazy, download-on-demand provisioning of the extraction tool.
//!
//! The check is pure existence: a file that is present is trusted, whatever
//! its content or age. Concurrent callers that find assets missing queue on
//! a single async mutex and re-check after acquiring it, so each file is
//! transferred at most once per process even under a burst of first requests.

use crate::assets::download::{download_file, make_executable};
use crate::config::AssetLocations;
use crate::error::ProvisionError;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Presence of the provisioned files on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssetStatus {
    pub binary_present: bool,
    pub cookies_present: bool,
    /// Whether a cookie source URL is configured at all.
    pub cookies_configured: bool,
}

impl AssetStatus {
    /// An unconfigured cookie jar never counts as missing.
    pub fn needs_download(&self) -> bool {
        !self.binary_present || (self.cookies_configured && !self.cookies_present)
    }
}

/// What a provisioning pass actually transferred.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub binary_downloaded: bool,
    pub cookies_downloaded: bool,
}

/// Ensures the tool and cookie jar exist before an extraction runs.
pub struct AssetProvisioner {
    locations: Arc<AssetLocations>,
    client: reqwest::Client,
    in_flight: Mutex<()>,
}

impl AssetProvisioner {
    pub fn new(locations: Arc<AssetLocations>) -> Self {
        Self::with_client(locations, reqwest::Client::new())
    }

    pub fn with_client(locations: Arc<AssetLocations>, client: reqwest::Client) -> Self {
        Self {
            locations,
            client,
            in_flight: Mutex::new(()),
        }
    }

    pub fn locations(&self) -> &AssetLocations {
        &self.locations
    }

    pub fn status(&self) -> AssetStatus {
        AssetStatus {
            binary_present: self.locations.binary_path.exists(),
            cookies_present: self.locations.cookie_path.exists(),
            cookies_configured: self.locations.cookie_url.is_some(),
        }
    }

    /// Download whatever is missing. A no-op once everything is on disk.
    pub async fn ensure_assets(&self) -> Result<(), ProvisionError> {
        if !self.status().needs_download() {
            return Ok(());
        }

        let _guard = self.in_flight.lock().await;
        if !self.status().needs_download() {
            // Another request finished provisioning while we waited.
            return Ok(());
        }

        info!("yt-dlp or cookies.txt not found, downloading");
        self.fetch(false).await.map(|_| ())
    }

    /// Provision explicitly. With `force`, present files are replaced.
    pub async fn provision(&self, force: bool) -> Result<ProvisionReport, ProvisionError> {
        let _guard = self.in_flight.lock().await;
        self.fetch(force).await
    }

    async fn fetch(&self, force: bool) -> Result<ProvisionReport, ProvisionError> {
        let locations = &self.locations;
        let mut report = ProvisionReport::default();

        if let Some(dir) = locations.asset_dir() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|e| ProvisionError::io(dir, e))?;
            }
        }

        if force || !locations.binary_path.exists() {
            info!("downloading yt-dlp");
            download_file(&self.client, &locations.binary_url, &locations.binary_path)
                .await
                .inspect_err(|e| warn!("error downloading yt-dlp: {e}"))?;
            make_executable(&locations.binary_path).await?;
            info!("yt-dlp downloaded to {}", locations.binary_path.display());
            report.binary_downloaded = true;
        }

        match &locations.cookie_url {
            Some(url) if force || !locations.cookie_path.exists() => {
                info!("downloading cookies.txt");
                download_file(&self.client, url, &locations.cookie_path)
                    .await
                    .inspect_err(|e| warn!("error downloading cookies.txt: {e}"))?;
                report.cookies_downloaded = true;
            }
            Some(_) => {}
            None => warn!("COOKIE_FILE not set; skipping cookies.txt download"),
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount(server: &MockServer, route: &str, body: &str, expected: u64) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(expected)
            .mount(server)
            .await;
    }

    fn provisioner(dir: &Path, server: &MockServer, with_cookies: bool) -> AssetProvisioner {
        let cookie_url = with_cookies.then(|| format!("{}/cookies.txt", server.uri()));
        let locations = AssetLocations::in_dir(
            &dir.join("bin"),
            format!("{}/yt-dlp", server.uri()),
            cookie_url,
        );
        AssetProvisioner::new(Arc::new(locations))
    }

    #[tokio::test]
    async fn test_provisions_binary_once() {
        let server = MockServer::start().await;
        mount(&server, "/yt-dlp", "#!/bin/sh\necho '{}'\n", 1).await;

        let dir = tempfile::tempdir().unwrap();
        let provisioner = provisioner(dir.path(), &server, false);
        assert!(provisioner.status().needs_download());

        provisioner.ensure_assets().await.unwrap();
        provisioner.ensure_assets().await.unwrap();

        let binary = &provisioner.locations().binary_path;
        assert!(binary.exists());
        assert!(!provisioner.locations().cookie_path.exists());
        assert!(!provisioner.status().needs_download());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(binary).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[tokio::test]
    async fn test_provisions_cookies_when_configured() {
        let server = MockServer::start().await;
        mount(&server, "/yt-dlp", "tool", 1).await;
        mount(&server, "/cookies.txt", "# Netscape HTTP Cookie File\n", 1).await;

        let dir = tempfile::tempdir().unwrap();
        let provisioner = provisioner(dir.path(), &server, true);

        provisioner.ensure_assets().await.unwrap();

        let cookies = std::fs::read_to_string(&provisioner.locations().cookie_path).unwrap();
        assert!(cookies.starts_with("# Netscape"));
        assert!(!provisioner.status().needs_download());
    }

    #[tokio::test]
    async fn test_only_missing_cookie_file_is_fetched() {
        let server = MockServer::start().await;
        mount(&server, "/yt-dlp", "tool", 0).await;
        mount(&server, "/cookies.txt", "cookies", 1).await;

        let dir = tempfile::tempdir().unwrap();
        let provisioner = provisioner(dir.path(), &server, true);
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::write(&provisioner.locations().binary_path, "existing").unwrap();

        provisioner.ensure_assets().await.unwrap();

        let binary = std::fs::read_to_string(&provisioner.locations().binary_path).unwrap();
        assert_eq!(binary, "existing");
        assert!(provisioner.locations().cookie_path.exists());
    }

    #[tokio::test]
    async fn test_transfer_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provisioner = provisioner(dir.path(), &server, false);

        let err = provisioner.ensure_assets().await.unwrap_err();
        assert!(matches!(err, ProvisionError::Transfer { .. }));
        assert!(!provisioner.locations().binary_path.exists());
    }

    #[tokio::test]
    async fn test_concurrent_first_requests_download_once() {
        let server = MockServer::start().await;
        mount(&server, "/yt-dlp", "tool", 1).await;

        let dir = tempfile::tempdir().unwrap();
        let provisioner = provisioner(dir.path(), &server, false);

        let (a, b, c) = tokio::join!(
            provisioner.ensure_assets(),
            provisioner.ensure_assets(),
            provisioner.ensure_assets()
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();

        assert!(provisioner.locations().binary_path.exists());
    }

    #[tokio::test]
    async fn test_forced_provision_replaces_files() {
        let server = MockServer::start().await;
        mount(&server, "/yt-dlp", "fresh", 1).await;
        mount(&server, "/cookies.txt", "fresh cookies", 1).await;

        let dir = tempfile::tempdir().unwrap();
        let provisioner = provisioner(dir.path(), &server, true);
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::write(&provisioner.locations().binary_path, "stale").unwrap();
        std::fs::write(&provisioner.locations().cookie_path, "stale").unwrap();

        let report = provisioner.provision(true).await.unwrap();

        assert!(report.binary_downloaded);
        assert!(report.cookies_downloaded);
        let binary = std::fs::read_to_string(&provisioner.locations().binary_path).unwrap();
        assert_eq!(binary, "fresh");
    }

    #[tokio::test]
    async fn test_unforced_provision_skips_present_files() {
        let server = MockServer::start().await;
        mount(&server, "/yt-dlp", "fresh", 0).await;

        let dir = tempfile::tempdir().unwrap();
        let provisioner = provisioner(dir.path(), &server, false);
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::write(&provisioner.locations().binary_path, "present").unwrap();

        let report = provisioner.provision(false).await.unwrap();
        assert_eq!(report, ProvisionReport::default());
    }
}
