// gsim-core/src/registry/gsp.rs
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use gsim_common::error::{GsimError, Result};
use gsim_common::model::{GspPaths, Platform};
use gsim_net::fetch::ArtifactFetcher;
use tracing::debug;

use super::locate;

/// Resolves garden-simulator packets. Unlike the other artifacts this
/// bypasses the bundle-type catalog entirely: packets are addressed
/// directly by serial number + platform.
pub struct GspRegistry {
    cache_dir: PathBuf,
    base_url: String,
    fetcher: Arc<dyn ArtifactFetcher>,
}

impl GspRegistry {
    pub fn new(cache_dir: PathBuf, base_url: &str, fetcher: Arc<dyn ArtifactFetcher>) -> Self {
        Self {
            cache_dir,
            base_url: base_url.trim_end_matches('/').to_string(),
            fetcher,
        }
    }

    pub async fn get_gsp(&self, serial_number: &str, platform: &Platform) -> Result<GspPaths> {
        if let Some(gsp) = self.cached_gsp(serial_number)? {
            debug!("Using cached GSP");
            return Ok(gsp);
        }

        let url = format!("{}/packet/{}/{}", self.base_url, serial_number, platform);
        let dir = self.cache_dir.join(serial_number);
        debug!("Downloading GSP from {}", url);
        self.fetcher.fetch_and_unpack(&url, &dir).await?;

        locate::locate_gsp_paths(&dir, serial_number)
    }

    /// The per-serial directory existing at all is the cache-hit signal; a
    /// present-but-incomplete packet is corrupt, not a miss.
    pub fn cached_gsp(&self, serial_number: &str) -> Result<Option<GspPaths>> {
        let dir = self.cache_dir.join(serial_number);
        match std::fs::metadata(&dir) {
            Ok(_) => locate::locate_gsp_paths(&dir, serial_number).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GsimError::Cache(format!(
                "Failed to stat {}: {}",
                dir.display(),
                e
            ))),
        }
    }
}
