// gsim-net/src/lib.rs
pub mod api;
pub mod extract;
pub mod fetch;

pub use api::{auth_headers, filter_bundle_types, BundleCatalog, BundleRegistry};
pub use fetch::{download_and_unpack, ArtifactFetcher, HttpArtifactFetcher};
