use std::sync::Arc;

use clap::Args;
use gsim_common::config::Config;
use gsim_common::error::Result;
use gsim_common::model::{LogLevel, LogRecord, Platform};
use gsim_core::registry::{GspRegistry, SimulatorRegistry, WinMowerRegistry};
use gsim_core::runner::LogSink;
use gsim_core::Session;
use gsim_net::api::{BundleCatalog, BundleRegistry};
use gsim_net::fetch::{ArtifactFetcher, HttpArtifactFetcher};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Args, Debug)]
pub struct LaunchArgs {
    /// Serial number of the device
    #[arg(short = 's', long)]
    pub serial_number: String,

    /// Platform of the device
    #[arg(short = 'p', long, default_value = "P25")]
    pub platform: String,
}

/// Re-emits classified process output through tracing, tagged with the
/// process it came from so the interleaved streams stay readable.
struct TracingSink {
    prefix: &'static str,
}

impl LogSink for TracingSink {
    fn record(&self, record: LogRecord) {
        match record.level {
            LogLevel::Error => error!(proc = self.prefix, "{}", record.text),
            LogLevel::Warning => warn!(proc = self.prefix, "{}", record.text),
            LogLevel::Info => info!(proc = self.prefix, "{}", record.text),
            LogLevel::Debug => debug!(proc = self.prefix, "{}", record.text),
        }
    }
}

impl LaunchArgs {
    pub async fn run(&self, config: &Config, cancel: CancellationToken) -> Result<()> {
        let platform = Platform::new(self.platform.clone());

        let catalog: Arc<dyn BundleCatalog> = Arc::new(BundleRegistry::new(config)?);
        let fetcher: Arc<dyn ArtifactFetcher> = Arc::new(HttpArtifactFetcher::new(config)?);

        let session = Session::new(
            config.clone(),
            WinMowerRegistry::new(
                config.winmower_dir(),
                Arc::clone(&catalog),
                Arc::clone(&fetcher),
            ),
            SimulatorRegistry::new(
                config.simulator_dir(),
                Arc::clone(&catalog),
                Arc::clone(&fetcher),
            ),
            GspRegistry::new(
                config.gsp_dir(),
                &config.packet_api_base_url,
                Arc::clone(&fetcher),
            ),
            Arc::new(TracingSink { prefix: "winmower" }),
            Arc::new(TracingSink {
                prefix: "tifconsole",
            }),
        );

        session.run(&self.serial_number, &platform, &cancel).await
    }
}
