// gsim-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use tracing::debug;

use crate::error::{GsimError, Result};
use crate::model::Platform;

const DEFAULT_BUNDLE_API: &str = "https://hqvrobotics.azure-api.net";
const DEFAULT_PACKET_API: &str = "https://hqvrobotics.azure-api.net/gardensimulatorpacket";

/// UX-latency bound on catalog listings, not a correctness bound.
const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(2);
const DEFAULT_DEVICE_TCP_ADDRESS: &str = "127.0.0.1:4250";
const DEFAULT_DEVICE_SETTLE: Duration = Duration::from_secs(3);

/// Runtime configuration, constructed once at startup and passed by
/// reference to every component constructor. Nothing in the workspace reads
/// process environment after this has been built.
#[derive(Debug, Clone)]
pub struct Config {
    pub cache_root: PathBuf,
    pub bundle_api_base_url: String,
    pub packet_api_base_url: String,
    /// Path to the TifConsole test-bundle executor.
    pub tif_console: PathBuf,
    /// Optional fixed validation bundle run at the end of a session.
    pub validation_bundle: Option<PathBuf>,
    /// TCP endpoint the device program listens on for test traffic.
    pub device_tcp_address: String,
    /// Grace period between device start and the first test-bundle run.
    pub device_settle: Duration,
    pub catalog_timeout: Duration,
    pub api_key: Option<String>,
    pub subscription_key: Option<String>,
    pub token: Option<String>,
    pub simulator: SimulatorSettings,
}

#[derive(Debug, Clone)]
pub struct SimulatorSettings {
    pub log: bool,
    pub time_scale: u32,
    pub screen_width: u32,
    pub screen_height: u32,
    pub quality_level: u32,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            log: true,
            time_scale: 1,
            screen_width: 1280,
            screen_height: 720,
            quality_level: 6,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading gsim configuration");

        let base_dirs = BaseDirs::new().ok_or_else(|| {
            GsimError::Config("Could not determine the user cache directory".to_string())
        })?;
        let user_cache_dir = base_dirs.cache_dir().to_path_buf();

        let cache_root = env::var("GSIM_CACHE_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| user_cache_dir.join("gsim"));
        debug!("Effective cache root: {}", cache_root.display());

        let bundle_api_base_url = env::var("GSIM_BUNDLE_API")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BUNDLE_API.to_string());
        let packet_api_base_url = env::var("GSIM_PACKET_API")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PACKET_API.to_string());

        let tif_console = env::var("GSIM_TIF_CONSOLE")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| user_cache_dir.join("TifApp").join("TifConsole.Auto.exe"));

        let validation_bundle = env::var("GSIM_VALIDATION_BUNDLE")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let device_tcp_address = env::var("GSIM_DEVICE_TCP")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DEVICE_TCP_ADDRESS.to_string());

        let catalog_timeout = match env::var("GSIM_CATALOG_TIMEOUT") {
            Ok(raw) if !raw.is_empty() => humantime::parse_duration(&raw).map_err(|e| {
                GsimError::Config(format!("Invalid GSIM_CATALOG_TIMEOUT '{raw}': {e}"))
            })?,
            _ => DEFAULT_CATALOG_TIMEOUT,
        };

        let device_settle = match env::var("GSIM_DEVICE_SETTLE") {
            Ok(raw) if !raw.is_empty() => humantime::parse_duration(&raw).map_err(|e| {
                GsimError::Config(format!("Invalid GSIM_DEVICE_SETTLE '{raw}': {e}"))
            })?,
            _ => DEFAULT_DEVICE_SETTLE,
        };

        // Credentials are forwarded verbatim; a missing value is the
        // server's problem to reject, not ours to validate.
        let api_key = env::var("GSIM_API_KEY").ok().filter(|s| !s.is_empty());
        let subscription_key = env::var("GSIM_SUBSCRIPTION_KEY")
            .ok()
            .filter(|s| !s.is_empty());
        let token = env::var("GSIM_TOKEN").ok().filter(|s| !s.is_empty());

        debug!("Configuration loaded successfully.");
        Ok(Self {
            cache_root,
            bundle_api_base_url,
            packet_api_base_url,
            tif_console,
            validation_bundle,
            device_tcp_address,
            device_settle,
            catalog_timeout,
            api_key,
            subscription_key,
            token,
            simulator: SimulatorSettings::default(),
        })
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    pub fn winmower_dir(&self) -> PathBuf {
        self.cache_root.join("winmower")
    }

    pub fn winmower_platform_dir(&self, platform: &Platform) -> PathBuf {
        self.winmower_dir().join(platform.as_str())
    }

    pub fn winmower_fs_root(&self) -> PathBuf {
        self.cache_root.join("winmower-filesystems")
    }

    /// Per-platform filesystem sandbox the device program runs inside.
    pub fn winmower_fs_dir(&self, platform: &Platform) -> PathBuf {
        self.winmower_fs_root().join(platform.as_str())
    }

    pub fn gsp_dir(&self) -> PathBuf {
        self.cache_root.join("gsp")
    }

    pub fn gsp_serial_dir(&self, serial_number: &str) -> PathBuf {
        self.gsp_dir().join(serial_number)
    }

    pub fn simulator_dir(&self) -> PathBuf {
        self.cache_root.join("simulator")
    }
}
