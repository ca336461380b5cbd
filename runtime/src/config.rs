//! Gateway configuration, read once from the environment at startup.
//!
//! Nothing in here is mutated after construction. `main` builds a
//! [`GatewayConfig`] and hands `Arc`s of its parts to the components that
//! need them.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default listen address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default image proxy request timeout in seconds.
pub const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 30;

/// File name of the cookie jar handed to the tool.
pub const COOKIE_FILE_NAME: &str = "cookies.txt";

/// Local file name of the extraction tool on this platform.
pub fn binary_file_name() -> &'static str {
    if cfg!(windows) {
        "yt-dlp.exe"
    } else {
        "yt-dlp"
    }
}

/// Release URL of the extraction tool for this platform.
pub fn default_binary_url() -> &'static str {
    if cfg!(windows) {
        "https://github.com/yt-dlp/yt-dlp/releases/latest/download/yt-dlp.exe"
    } else {
        "https://github.com/yt-dlp/yt-dlp/releases/latest/download/yt-dlp"
    }
}

/// Where the provisioned assets live and where they come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocations {
    /// Path of the extraction tool executable.
    pub binary_path: PathBuf,
    /// Path of the cookie jar passed via `--cookies`.
    pub cookie_path: PathBuf,
    /// Remote URL the tool is downloaded from.
    pub binary_url: String,
    /// Remote URL of the cookie jar. `None` disables cookie provisioning.
    pub cookie_url: Option<String>,
}

impl AssetLocations {
    /// Lay out both assets inside `dir` using the platform file names.
    pub fn in_dir(dir: &Path, binary_url: impl Into<String>, cookie_url: Option<String>) -> Self {
        Self {
            binary_path: dir.join(binary_file_name()),
            cookie_path: dir.join(COOKIE_FILE_NAME),
            binary_url: binary_url.into(),
            cookie_url,
        }
    }

    /// Directory that holds the tool.
    pub fn asset_dir(&self) -> Option<&Path> {
        self.binary_path.parent()
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub assets: AssetLocations,
    /// Upper bound on a single tool run. `None` waits forever.
    pub extract_timeout: Option<Duration>,
    pub proxy_timeout: Duration,
    /// Static files served for unmatched paths.
    pub public_dir: PathBuf,
}

impl GatewayConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::WorkingDir)?;
        Self::from_lookup(&cwd, |key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Relative defaults (`bin/`, `public/`) are resolved against `base`.
    /// Empty values count as unset.
    pub fn from_lookup<F>(base: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(v) => parse_value::<u16>("PORT", &v)?,
            None => DEFAULT_PORT,
        };
        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let bin_dir = get("YTDL_BIN_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| base.join("bin"));
        let binary_url = match get("YTDL_BINARY_URL") {
            Some(v) => validate_url("YTDL_BINARY_URL", v)?,
            None => default_binary_url().to_string(),
        };
        let cookie_url = get("COOKIE_FILE")
            .map(|v| validate_url("COOKIE_FILE", v))
            .transpose()?;

        let extract_timeout = get("YTDL_EXTRACT_TIMEOUT_SECS")
            .map(|v| parse_value::<u64>("YTDL_EXTRACT_TIMEOUT_SECS", &v))
            .transpose()?
            .map(Duration::from_secs);
        let proxy_timeout = match get("PROXY_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_value::<u64>("PROXY_TIMEOUT_SECS", &v)?),
            None => Duration::from_secs(DEFAULT_PROXY_TIMEOUT_SECS),
        };

        let public_dir = get("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| base.join("public"));

        Ok(Self {
            host,
            port,
            assets: AssetLocations::in_dir(&bin_dir, binary_url, cookie_url),
            extract_timeout,
            proxy_timeout,
            public_dir,
        })
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn validate_url(key: &'static str, value: String) -> Result<String, ConfigError> {
    match url::Url::parse(value.trim()) {
        Ok(_) => Ok(value.trim().to_string()),
        Err(_) => Err(ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(Path::new("/srv/app"), |k| vars.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(
            config.assets.binary_path,
            Path::new("/srv/app/bin").join(binary_file_name())
        );
        assert_eq!(config.assets.cookie_path, Path::new("/srv/app/bin/cookies.txt"));
        assert_eq!(config.assets.binary_url, default_binary_url());
        assert!(config.assets.cookie_url.is_none());
        assert!(config.extract_timeout.is_none());
        assert_eq!(config.proxy_timeout, Duration::from_secs(30));
        assert_eq!(config.public_dir, Path::new("/srv/app/public"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("COOKIE_FILE", "https://example.com/cookies.txt"),
            ("YTDL_BIN_DIR", "/opt/tools"),
            ("YTDL_EXTRACT_TIMEOUT_SECS", "90"),
            ("PROXY_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.assets.cookie_url.as_deref(),
            Some("https://example.com/cookies.txt")
        );
        assert_eq!(config.assets.cookie_path, Path::new("/opt/tools/cookies.txt"));
        assert_eq!(config.extract_timeout, Some(Duration::from_secs(90)));
        assert_eq!(config.proxy_timeout, Duration::from_secs(5));
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_empty_cookie_url_disables_cookies() {
        let config = config_from(&[("COOKIE_FILE", "")]).unwrap();
        assert!(config.assets.cookie_url.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = config_from(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));

        let err = config_from(&[("COOKIE_FILE", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "COOKIE_FILE", .. }));
    }
}
