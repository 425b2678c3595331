// gsim-net/src/extract.rs
// Handles archive extraction off the async runtime.
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use gsim_common::error::{GsimError, Result};
use tracing::debug;
use zip::ZipArchive;

/// Unpack a zip archive into `target_dir`, rejecting entries that would
/// escape it. Runs the blocking extraction on the blocking thread pool.
pub async fn unzip_archive(archive_path: &Path, target_dir: &Path) -> Result<()> {
    let archive_path = archive_path.to_path_buf();
    let target_dir = target_dir.to_path_buf();
    tokio::task::spawn_blocking(move || unzip_sync(&archive_path, &target_dir))
        .await
        .map_err(|e| GsimError::Generic(format!("Extraction task failed: {e}")))?
}

fn unzip_sync(archive_path: &Path, target_dir: &Path) -> Result<()> {
    debug!(
        "Extracting {} to {}",
        archive_path.display(),
        target_dir.display()
    );
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        GsimError::Generic(format!(
            "Failed to open ZIP {}: {}",
            archive_path.display(),
            e
        ))
    })?;
    fs::create_dir_all(target_dir)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| {
            GsimError::Generic(format!(
                "Error reading ZIP entry from {}: {}",
                archive_path.display(),
                e
            ))
        })?;

        // enclosed_name() refuses absolute paths and `..` traversal.
        let relative: PathBuf = match entry.enclosed_name() {
            Some(p) => p,
            None => {
                return Err(GsimError::Generic(format!(
                    "{}: illegal file path in archive",
                    entry.name()
                )))
            }
        };
        let output_path = target_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&output_path)?;
            continue;
        }
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut output = File::create(&output_path)?;
        io::copy(&mut entry, &mut output)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&output_path, fs::Permissions::from_mode(mode))?;
        }
    }
    Ok(())
}
