// gsim-core/src/registry/winmower.rs
use std::path::PathBuf;
use std::sync::Arc;

use gsim_common::error::{GsimError, Result};
use gsim_common::model::Platform;
use gsim_net::api::BundleCatalog;
use gsim_net::fetch::ArtifactFetcher;
use gsim_net::filter_bundle_types;
use tracing::debug;

use super::locate;

/// A resolved device-control build, ready to launch.
#[derive(Debug)]
pub struct WinMower {
    pub path: PathBuf,
}

/// Resolves winmower builds: cache first, then catalog query →
/// fetch-and-unpack → re-scan. Stateless apart from the cache directory on
/// disk.
pub struct WinMowerRegistry {
    cache_dir: PathBuf,
    catalog: Arc<dyn BundleCatalog>,
    fetcher: Arc<dyn ArtifactFetcher>,
}

impl WinMowerRegistry {
    pub fn new(
        cache_dir: PathBuf,
        catalog: Arc<dyn BundleCatalog>,
        fetcher: Arc<dyn ArtifactFetcher>,
    ) -> Self {
        Self {
            cache_dir,
            catalog,
            fetcher,
        }
    }

    pub async fn get_win_mower(&self, platform: &Platform) -> Result<WinMower> {
        if let Some(wm) = self.cached_win_mower(platform)? {
            debug!("Using cached winmower");
            return Ok(wm);
        }

        let types = self.catalog.bundle_types().await?;
        debug!("Found {} bundle types", types.len());

        let matching = filter_bundle_types(&types, platform);
        if matching.is_empty() {
            return Err(GsimError::NoBundleForPlatform(platform.to_string()));
        }
        debug!(
            "Found {} bundle types for platform {}",
            matching.len(),
            platform
        );

        // The catalog returns types sorted by recency, newest first. That
        // ordering is the catalog's contract; we do not re-sort.
        let latest_type = &matching[0];
        debug!("Latest bundle type: {}", latest_type.name);

        let release = self.catalog.latest_release(&latest_type.name).await?;
        let blob_url = self.catalog.blob_url(&release);
        debug!("Latest build: {}", blob_url);

        let dir = self.cache_dir.join(platform.as_str());
        debug!("Downloading and unpacking winmower...");
        self.fetcher.fetch_and_unpack(&blob_url, &dir).await?;

        match locate::locate_executable(&dir)? {
            Some(path) => Ok(WinMower { path }),
            None => Err(GsimError::CorruptArtifact(
                format!("winmower {platform}"),
                format!(
                    "unpack succeeded but no entry point was found under {}",
                    dir.display()
                ),
            )),
        }
    }

    /// Cache-first lookup. `Ok(None)` is a miss and a normal fallback
    /// trigger; the cache is trusted without any freshness check.
    pub fn cached_win_mower(&self, platform: &Platform) -> Result<Option<WinMower>> {
        let dir = match locate::find_dir_named(&self.cache_dir, platform.as_str())? {
            Some(dir) => dir,
            None => return Ok(None),
        };
        Ok(locate::locate_executable(&dir)?.map(|path| WinMower { path }))
    }
}
