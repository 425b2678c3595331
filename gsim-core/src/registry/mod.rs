// gsim-core/src/registry/mod.rs
// Artifact resolution: cache-first lookups with a catalog/fetch fallback.
pub mod gsp;
pub mod locate;
pub mod simulator;
pub mod winmower;

pub use gsp::GspRegistry;
pub use simulator::{Simulator, SimulatorRegistry};
pub use winmower::{WinMower, WinMowerRegistry};

#[cfg(test)]
pub(crate) mod stubs {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use gsim_common::error::Result;
    use gsim_common::model::{BundleType, Release};
    use gsim_net::api::BundleCatalog;
    use gsim_net::fetch::ArtifactFetcher;

    /// Fails the test the moment any catalog method runs; proves that a
    /// cache hit makes no network call.
    pub struct UnreachableCatalog;

    #[async_trait]
    impl BundleCatalog for UnreachableCatalog {
        async fn bundle_types(&self) -> Result<Vec<BundleType>> {
            panic!("catalog must not be queried on a cache hit");
        }

        async fn latest_release(&self, _bundle_type: &str) -> Result<Release> {
            panic!("catalog must not be queried on a cache hit");
        }

        fn blob_url(&self, _release: &Release) -> String {
            panic!("catalog must not be queried on a cache hit");
        }
    }

    pub struct UnreachableFetcher;

    #[async_trait]
    impl ArtifactFetcher for UnreachableFetcher {
        async fn fetch_and_unpack(&self, _url: &str, _dest: &Path) -> Result<()> {
            panic!("nothing must be downloaded on a cache hit");
        }
    }

    /// Catalog serving a fixed type list and a single release, counting
    /// every query.
    pub struct StaticCatalog {
        pub types: Vec<BundleType>,
        pub release: Release,
        pub list_calls: AtomicUsize,
        pub release_calls: AtomicUsize,
        pub requested_releases: Mutex<Vec<String>>,
    }

    impl StaticCatalog {
        pub fn single(type_name: &str, blob: &str) -> Self {
            Self::with_types(&[type_name], blob)
        }

        pub fn with_types(type_names: &[&str], blob: &str) -> Self {
            Self {
                types: type_names
                    .iter()
                    .map(|name| BundleType {
                        id: name.to_lowercase(),
                        name: name.to_string(),
                        description: String::new(),
                    })
                    .collect(),
                release: Release {
                    id: "build-1".to_string(),
                    blob: blob.to_string(),
                },
                list_calls: AtomicUsize::new(0),
                release_calls: AtomicUsize::new(0),
                requested_releases: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl BundleCatalog for StaticCatalog {
        async fn bundle_types(&self) -> Result<Vec<BundleType>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.types.clone())
        }

        async fn latest_release(&self, bundle_type: &str) -> Result<Release> {
            self.release_calls.fetch_add(1, Ordering::SeqCst);
            self.requested_releases
                .lock()
                .unwrap()
                .push(bundle_type.to_string());
            Ok(self.release.clone())
        }

        fn blob_url(&self, release: &Release) -> String {
            format!("stub://blob/{}", release.blob)
        }
    }

    /// Fetcher that materializes a fixed set of files under `dest` instead
    /// of downloading anything, recording every request.
    pub struct ScriptedFetcher {
        pub files: Vec<String>,
        pub calls: AtomicUsize,
        pub urls: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        pub fn creating(files: &[&str]) -> Self {
            Self {
                files: files.iter().map(|f| f.to_string()).collect(),
                calls: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ArtifactFetcher for ScriptedFetcher {
        async fn fetch_and_unpack(&self, url: &str, dest: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            for relative in &self.files {
                let path = dest.join(relative);
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, b"stub artifact")?;
            }
            Ok(())
        }
    }
}
