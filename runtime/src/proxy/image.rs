//! Fetch remote image bytes on behalf of the browser.

use crate::error::ProxyError;
use axum::body::Bytes;
use std::time::Duration;
use tracing::debug;

/// Content type attached to every relayed payload. It is not derived from
/// the upstream response.
pub const PROXY_CONTENT_TYPE: &str = "image/jpeg";

/// Bytes fetched from upstream, labelled for the client.
#[derive(Debug, Clone)]
pub struct ProxiedImage {
    pub content_type: &'static str,
    pub bytes: Bytes,
}

/// Relays remote images as raw bytes.
#[derive(Debug, Clone)]
pub struct ImageProxy {
    client: reqwest::Client,
}

impl ImageProxy {
    /// Build a proxy whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Fetch `url` and return its body labelled as JPEG.
    pub async fn fetch_image(&self, url: &str) -> Result<ProxiedImage, ProxyError> {
        if url.is_empty() {
            return Err(ProxyError::MissingUrl);
        }

        let response = self.client.get(url).send().await?.error_for_status()?;
        debug!(
            "proxying {url} (upstream content-type: {:?})",
            response.headers().get(reqwest::header::CONTENT_TYPE)
        );
        let bytes = response.bytes().await?;

        Ok(ProxiedImage {
            content_type: PROXY_CONTENT_TYPE,
            bytes,
        })
    }
}
