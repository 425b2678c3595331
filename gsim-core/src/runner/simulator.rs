// gsim-core/src/runner/simulator.rs
use std::path::Path;
use std::process::Stdio;

use gsim_common::config::SimulatorSettings;
use gsim_common::error::{GsimError, Result};
use tokio::process::Command;
use tracing::debug;

/// Launch the simulator against a packet map and return without waiting.
/// The simulator owns its own window and lifetime; nothing supervises it.
pub fn launch_simulator(
    exe: &Path,
    map_file: &Path,
    settings: &SimulatorSettings,
) -> Result<()> {
    debug!(
        "Launching simulator {} with map {}",
        exe.display(),
        map_file.display()
    );
    Command::new(exe)
        .arg("-config")
        .arg(map_file)
        .arg("-log")
        .arg(if settings.log { "true" } else { "false" })
        .arg("-time-scale")
        .arg(settings.time_scale.to_string())
        .arg("-screen-width")
        .arg(settings.screen_width.to_string())
        .arg("-screen-height")
        .arg(settings.screen_height.to_string())
        .arg("-quality-level")
        .arg(settings.quality_level.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| GsimError::ProcessStart(format!("{}: {}", exe.display(), e)))?;
    Ok(())
}
