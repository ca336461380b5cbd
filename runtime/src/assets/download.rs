//! Streaming HTTP download straight into a destination file.

use crate::error::ProvisionError;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Download `url` into `dest`, chunk by chunk.
///
/// The destination is opened only after the server answered with a success
/// status, so a refused request leaves nothing behind. A transfer that breaks
/// midway leaves the partial file in place.
pub async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<u64, ProvisionError> {
    info!("starting download from {url}");

    let mut response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ProvisionError::transfer(url, e))?;

    info!("response status: {}", response.status());
    debug!("response headers: {:?}", response.headers());

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| ProvisionError::io(dest, e))?;

    let mut written = 0u64;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| ProvisionError::transfer(url, e))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| ProvisionError::io(dest, e))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| ProvisionError::io(dest, e))?;
    file.sync_all().await.map_err(|e| ProvisionError::io(dest, e))?;

    info!("downloaded {written} bytes to {}", dest.display());
    Ok(written)
}

/// Mark a downloaded tool as executable (`0o755`).
#[cfg(unix)]
pub async fn make_executable(path: &Path) -> Result<(), ProvisionError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .map_err(|e| ProvisionError::io(path, e))
}

/// Windows decides executability by extension.
#[cfg(not(unix))]
pub async fn make_executable(_path: &Path) -> Result<(), ProvisionError> {
    Ok(())
}
