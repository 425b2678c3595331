// gsim-core/src/runner/winmower.rs
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use gsim_common::error::{GsimError, Result};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::debug;

use super::{drain_child_output, LogSink};

/// Supervises the long-lived device-control process. Holds at most one live
/// child; `stop` is idempotent, and `kill_on_drop` backstops every exit
/// path the caller forgets about, panics included.
pub struct WinMowerRunner {
    dir: PathBuf,
    exe: PathBuf,
    sink: Arc<dyn LogSink>,
    child: Option<Child>,
    drain: Option<JoinHandle<()>>,
}

impl WinMowerRunner {
    pub fn new(dir: PathBuf, exe: PathBuf, sink: Arc<dyn LogSink>) -> Self {
        Self {
            dir,
            exe,
            sink,
            child: None,
            drain: None,
        }
    }

    /// Spawn the device program inside its filesystem sandbox. Returns as
    /// soon as the OS confirms the process image is running, not when it
    /// exits. Starting a runner that is already running is a programming
    /// error, not a recoverable condition.
    pub fn start(&mut self) -> Result<()> {
        assert!(
            self.child.is_none(),
            "winmower runner already holds a live process"
        );
        debug!(
            "Starting winmower {} in {}",
            self.exe.display(),
            self.dir.display()
        );
        let mut child = Command::new(&self.exe)
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| GsimError::ProcessStart(format!("{}: {}", self.exe.display(), e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GsimError::ProcessStart("stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| GsimError::ProcessStart("stderr was not captured".to_string()))?;
        self.drain = Some(tokio::spawn(drain_child_output(
            stdout,
            stderr,
            Arc::clone(&self.sink),
        )));
        self.child = Some(child);
        Ok(())
    }

    /// Terminate the process and wait for its output drain to finish.
    /// Stopping an already-stopped runner is a no-op.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        debug!("Stopping winmower");
        child
            .kill()
            .await
            .map_err(|e| GsimError::ProcessStop(e.to_string()))?;
        if let Some(drain) = self.drain.take() {
            let _ = drain.await;
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }
}
