// gsim-core/src/session.rs
// The fixed launch pipeline: resolve → start device → test → simulator →
// validate, with guaranteed device shutdown on every exit path.
use std::fs;
use std::sync::Arc;

use gsim_common::config::Config;
use gsim_common::error::{GsimError, Result};
use gsim_common::model::Platform;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::registry::{GspRegistry, SimulatorRegistry, WinMowerRegistry};
use crate::runner::{launch_simulator, LogSink, TestBundleRunner, WinMowerRunner};

pub struct Session {
    config: Config,
    winmowers: WinMowerRegistry,
    simulators: SimulatorRegistry,
    gsps: GspRegistry,
    device_sink: Arc<dyn LogSink>,
    test_sink: Arc<dyn LogSink>,
}

impl Session {
    pub fn new(
        config: Config,
        winmowers: WinMowerRegistry,
        simulators: SimulatorRegistry,
        gsps: GspRegistry,
        device_sink: Arc<dyn LogSink>,
        test_sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            config,
            winmowers,
            simulators,
            gsps,
            device_sink,
            test_sink,
        }
    }

    /// Run the full launch sequence for one device. Cancelling `cancel`
    /// aborts whatever step is in flight; the device process, once started,
    /// is stopped before this returns no matter how the sequence ends.
    /// Already-unpacked cache artifacts are left warm for the next run.
    pub async fn run(
        &self,
        serial_number: &str,
        platform: &Platform,
        cancel: &CancellationToken,
    ) -> Result<()> {
        // The platform cache root must exist before resolution: an absent
        // root is a fault, not a miss.
        fs::create_dir_all(self.config.winmower_dir())?;

        info!("Resolving winmower for platform {}", platform);
        let win_mower = run_cancellable(cancel, self.winmowers.get_win_mower(platform)).await??;

        let sandbox = self.config.winmower_fs_dir(platform);
        fs::create_dir_all(&sandbox)?;

        let mut runner = WinMowerRunner::new(
            sandbox,
            win_mower.path.clone(),
            Arc::clone(&self.device_sink),
        );
        info!("Starting winmower...");
        runner.start()?;

        let steps = run_cancellable(cancel, self.run_steps(serial_number, platform)).await;

        info!("Stopping winmower...");
        let stopped = runner.stop().await;

        match steps {
            Err(cancelled) => Err(cancelled),
            Ok(Err(step_error)) => Err(step_error),
            Ok(Ok(())) => stopped,
        }
    }

    async fn run_steps(&self, serial_number: &str, platform: &Platform) -> Result<()> {
        // Give the device program time to open its control port.
        tokio::time::sleep(self.config.device_settle).await;

        info!("Fetching the garden simulator packet...");
        let gsp = self.gsps.get_gsp(serial_number, platform).await?;

        let tests =
            TestBundleRunner::new(self.config.tif_console.clone(), Arc::clone(&self.test_sink));
        let tcp_args = ["-tcpAddress", self.config.device_tcp_address.as_str()];

        info!("Running test bundle...");
        tests.run(&gsp.test_bundle_file, &tcp_args).await?;

        info!("Resolving simulator...");
        let simulator = self.simulators.get_simulator().await?;
        info!("Launching simulator...");
        launch_simulator(&simulator.path, &gsp.map_file, &self.config.simulator)?;

        match &self.config.validation_bundle {
            Some(bundle) => {
                info!("Running validation test bundle...");
                tests.run(bundle, &tcp_args).await?;
            }
            None => warn!("No validation bundle configured, skipping the validation run"),
        }
        Ok(())
    }
}

async fn run_cancellable<F>(cancel: &CancellationToken, future: F) -> Result<F::Output>
where
    F: std::future::Future,
{
    match cancel.run_until_cancelled(future).await {
        Some(output) => Ok(output),
        None => Err(GsimError::Cancelled("launch session".to_string())),
    }
}
