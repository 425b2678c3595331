// gsim-net/src/api.rs
// HTTP client for the remote bundle catalog.
use std::time::Duration;

use async_trait::async_trait;
use gsim_common::config::Config;
use gsim_common::error::{GsimError, Result};
use gsim_common::model::{BundleType, Platform, Release};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use tracing::debug;
use url::Url;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
pub const TOKEN_HEADER: &str = "token";

const USER_AGENT_STRING: &str = "gsim session launcher (Rust)";

/// Read-side view of the remote bundle catalog. [`BundleRegistry`] is the
/// HTTP implementation; tests substitute in-memory stubs so resolution can
/// be exercised without a network.
#[async_trait]
pub trait BundleCatalog: Send + Sync {
    /// List every bundle type the catalog offers.
    async fn bundle_types(&self) -> Result<Vec<BundleType>>;

    /// Fetch the latest build of a bundle type. Fails with
    /// [`GsimError::NotFound`] when the listing is empty.
    async fn latest_release(&self, bundle_type: &str) -> Result<Release>;

    /// Resolve a release's relative blob reference to an absolute URL.
    fn blob_url(&self, release: &Release) -> String;
}

/// Returns the subset of `types` whose name carries the platform marker
/// (`"-<platform>-Win"`). The catalog encodes platforms as a naming
/// convention rather than structured metadata; keeping the match here means
/// swapping it out later only touches this function.
pub fn filter_bundle_types(types: &[BundleType], platform: &Platform) -> Vec<BundleType> {
    let marker = platform.marker();
    types
        .iter()
        .filter(|t| t.name.contains(&marker))
        .cloned()
        .collect()
}

/// Builds the three fixed auth headers every catalog and download request
/// carries. Missing credentials are sent as absent headers; the server is
/// the one that rejects them.
pub fn auth_headers(config: &Config) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    if let Some(api_key) = &config.api_key {
        headers.insert(API_KEY_HEADER, parse_header_value(API_KEY_HEADER, api_key)?);
    }
    if let Some(subscription_key) = &config.subscription_key {
        headers.insert(
            SUBSCRIPTION_KEY_HEADER,
            parse_header_value(SUBSCRIPTION_KEY_HEADER, subscription_key)?,
        );
    }
    if let Some(token) = &config.token {
        headers.insert(TOKEN_HEADER, parse_header_value(TOKEN_HEADER, token)?);
    }
    Ok(headers)
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| GsimError::Config(format!("Invalid value for header '{name}': {e}")))
}

pub struct BundleRegistry {
    base_url: String,
    client: Client,
}

impl BundleRegistry {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.bundle_api_base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| GsimError::Config(format!("Invalid bundle API base URL '{base_url}': {e}")))?;

        let client = Client::builder()
            .timeout(config.catalog_timeout)
            .default_headers(auth_headers(config)?)
            .build()
            .map_err(|e| GsimError::Api(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, client })
    }

    /// Construct a registry against an explicit base URL with a custom
    /// timeout. Used by callers that already validated their configuration.
    pub fn with_base_url(
        base_url: &str,
        timeout: Duration,
        headers: HeaderMap,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| GsimError::Api(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GsimError::Api(format!(
                "Request to {url} failed with {status}"
            )));
        }
        let parsed = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}

#[async_trait]
impl BundleCatalog for BundleRegistry {
    async fn bundle_types(&self) -> Result<Vec<BundleType>> {
        let url = format!("{}/bundles/types", self.base_url);
        let types: Vec<BundleType> = self.get_json(&url).await?;
        debug!("Catalog returned {} bundle types", types.len());
        Ok(types)
    }

    async fn latest_release(&self, bundle_type: &str) -> Result<Release> {
        let url = format!("{}/bundles/indexes/{}?count=1", self.base_url, bundle_type);
        let mut builds: Vec<Release> = self.get_json(&url).await?;
        if builds.is_empty() {
            return Err(GsimError::NotFound(format!(
                "No builds found for bundle type '{bundle_type}'"
            )));
        }
        Ok(builds.remove(0))
    }

    fn blob_url(&self, release: &Release) -> String {
        format!("{}/bundles/blob/{}", self.base_url, release.blob)
    }
}
