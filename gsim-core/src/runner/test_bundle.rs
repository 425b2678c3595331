// gsim-core/src/runner/test_bundle.rs
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use gsim_common::error::{GsimError, Result};
use tokio::process::Command;
use tracing::debug;

use super::{drain_child_output, LogSink};

/// Runs test bundles through the TifConsole executor and waits for them to
/// finish. Short-lived by design; there is no stop operation.
pub struct TestBundleRunner {
    tif_console: PathBuf,
    sink: Arc<dyn LogSink>,
}

impl TestBundleRunner {
    pub fn new(tif_console: PathBuf, sink: Arc<dyn LogSink>) -> Self {
        Self { tif_console, sink }
    }

    /// Launch the executor with the bundle path plus `args`, classify its
    /// output until the pipes close, and fail on a non-zero exit status.
    pub async fn run(&self, bundle: &Path, args: &[&str]) -> Result<()> {
        debug!(
            "Running test bundle {} via {}",
            bundle.display(),
            self.tif_console.display()
        );
        let mut child = Command::new(&self.tif_console)
            .arg(bundle)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GsimError::ProcessStart(format!("{}: {}", self.tif_console.display(), e))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GsimError::ProcessStart("stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| GsimError::ProcessStart("stderr was not captured".to_string()))?;
        let drain = tokio::spawn(drain_child_output(stdout, stderr, Arc::clone(&self.sink)));

        let status = child.wait().await.map_err(|e| {
            GsimError::ProcessFailed(self.tif_console.display().to_string(), e.to_string())
        })?;
        let _ = drain.await;

        if !status.success() {
            return Err(GsimError::ProcessFailed(
                self.tif_console.display().to_string(),
                status.to_string(),
            ));
        }
        Ok(())
    }
}
