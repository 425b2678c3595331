// gsim-net/src/fetch.rs
// Download-and-unpack primitive shared by every artifact resolver.
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use gsim_common::config::Config;
use gsim_common::error::{GsimError, Result};
use reqwest::Client;
use tempfile::NamedTempFile;
use tracing::{debug, error};

use crate::api::auth_headers;
use crate::extract::unzip_archive;

const DOWNLOAD_TIMEOUT_SECS: u64 = 300;
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Fetches an archive and unpacks it into a directory. The resolvers only
/// ever see this trait; the HTTP implementation below is swapped for stubs
/// in tests.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch_and_unpack(&self, url: &str, dest: &Path) -> Result<()>;
}

pub struct HttpArtifactFetcher {
    client: Client,
}

impl HttpArtifactFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .default_headers(auth_headers(config)?)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| GsimError::Api(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ArtifactFetcher for HttpArtifactFetcher {
    async fn fetch_and_unpack(&self, url: &str, dest: &Path) -> Result<()> {
        download_and_unpack(&self.client, url, dest).await
    }
}

/// GETs `url` into a temporary file next to `dest` and unpacks it there, so
/// the destination never sees a partial archive.
pub async fn download_and_unpack(client: &Client, url: &str, dest: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dest).await?;

    debug!("Downloading archive from {}", url);
    let response = client.get(url).send().await.map_err(|e| {
        debug!("HTTP request failed for {url}: {e}");
        GsimError::DownloadError(artifact_name(dest), url.to_string(), e.to_string())
    })?;
    let status = response.status();
    debug!("Received HTTP status: {} for {}", status, url);
    if !status.is_success() {
        error!("HTTP error {} while downloading {}", status, url);
        return Err(GsimError::DownloadError(
            artifact_name(dest),
            url.to_string(),
            format!("response failed with {status}"),
        ));
    }

    let content = response
        .bytes()
        .await
        .map_err(|e| GsimError::DownloadError(artifact_name(dest), url.to_string(), e.to_string()))?;

    let parent = dest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dest.to_path_buf());
    let mut archive = NamedTempFile::new_in(&parent)?;
    archive.write_all(&content)?;
    archive.flush()?;
    debug!(
        "Wrote {} bytes to {}, unpacking into {}",
        content.len(),
        archive.path().display(),
        dest.display()
    );

    unzip_archive(archive.path(), dest).await
}

fn artifact_name(dest: &Path) -> String {
    dest.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| dest.display().to_string())
}
