// gsim-core/src/registry/simulator.rs
use std::path::PathBuf;
use std::sync::Arc;

use gsim_common::error::{GsimError, Result};
use gsim_net::api::BundleCatalog;
use gsim_net::fetch::ArtifactFetcher;
use tracing::debug;

use super::locate;

/// The simulator is a single bundle type, not platform-keyed.
const SIMULATOR_BUNDLE_TYPE: &str = "GardenSimulator";
const SIMULATOR_EXECUTABLE: &str = "GardenSimulator.exe";

#[derive(Debug)]
pub struct Simulator {
    pub path: PathBuf,
}

pub struct SimulatorRegistry {
    cache_dir: PathBuf,
    catalog: Arc<dyn BundleCatalog>,
    fetcher: Arc<dyn ArtifactFetcher>,
}

impl SimulatorRegistry {
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

    pub async fn get_simulator(&self) -> Result<Simulator> {
        if let Some(sim) = self.cached_simulator()? {
            debug!("Using cached simulator");
            return Ok(sim);
        }

        debug!("Fetching simulator...");
        let release = self.catalog.latest_release(SIMULATOR_BUNDLE_TYPE).await?;
        let blob_url = self.catalog.blob_url(&release);
        debug!("Latest simulator build: {}", blob_url);

        debug!("Downloading and unpacking simulator...");
        self.fetcher
            .fetch_and_unpack(&blob_url, &self.cache_dir)
            .await?;

        match self.cached_simulator()? {
            Some(sim) => Ok(sim),
            None => Err(GsimError::CorruptArtifact(
                "simulator".to_string(),
                format!(
                    "unpack succeeded but {SIMULATOR_EXECUTABLE} was not found under {}",
                    self.cache_dir.display()
                ),
            )),
        }
    }

    /// A simulator cache directory that does not exist yet is an ordinary
    /// miss, unlike the platform cache: nothing has ever been unpacked.
    pub fn cached_simulator(&self) -> Result<Option<Simulator>> {
        if !self.cache_dir.exists() {
            return Ok(None);
        }
        Ok(locate::find_file_named(&self.cache_dir, SIMULATOR_EXECUTABLE)?
            .map(|path| Simulator { path }))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::atomic::Ordering;

    use tempfile::TempDir;

    use super::super::stubs::{ScriptedFetcher, StaticCatalog, UnreachableCatalog, UnreachableFetcher};
    use super::*;

    #[tokio::test]
    async fn cached_simulator_resolves_without_network() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("simulator");
        fs::create_dir_all(dir.join("GardenSimulator_Data")).unwrap();
        fs::write(dir.join("GardenSimulator.exe"), b"").unwrap();

        let registry = SimulatorRegistry::new(
            dir.clone(),
            Arc::new(UnreachableCatalog),
            Arc::new(UnreachableFetcher),
        );
        let sim = registry.get_simulator().await.unwrap();
        assert_eq!(sim.path, dir.join("GardenSimulator.exe"));
    }

    #[tokio::test]
    async fn missing_cache_dir_is_a_miss_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("simulator");
        let catalog = Arc::new(StaticCatalog::single("GardenSimulator", "sim-blob"));
        let fetcher = Arc::new(ScriptedFetcher::creating(&["GardenSimulator.exe"]));

        let registry = SimulatorRegistry::new(
            dir.clone(),
            catalog,
            Arc::clone(&fetcher) as Arc<dyn ArtifactFetcher>,
        );
        let sim = registry.get_simulator().await.unwrap();

        assert_eq!(sim.path, dir.join("GardenSimulator.exe"));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unpack_without_simulator_exe_is_corrupt() {
        let tmp = TempDir::new().unwrap();
        let catalog = Arc::new(StaticCatalog::single("GardenSimulator", "sim-blob"));
        // Wrong executable name: the scanner wants GardenSimulator.exe
        // specifically, not any .exe.
        let fetcher = Arc::new(ScriptedFetcher::creating(&["Launcher.exe"]));

        let registry =
            SimulatorRegistry::new(tmp.path().join("simulator"), catalog, fetcher);
        let err = registry.get_simulator().await.unwrap_err();
        assert!(matches!(err, GsimError::CorruptArtifact(_, _)));
    }
}
