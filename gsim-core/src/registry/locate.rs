// gsim-core/src/registry/locate.rs
// Directory-walk lookups over the artifact cache. Presence on disk is the
// only cache-hit signal; there is no manifest or checksum.
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use gsim_common::error::{GsimError, Result};
use gsim_common::model::GspPaths;
use walkdir::WalkDir;

/// Extension marking the runnable entry point inside an unpacked artifact.
/// The artifacts are Windows builds regardless of host OS.
const ENTRY_POINT_EXTENSION: &str = "exe";

/// Depth-first walk with entries sorted lexicographically by file name, so
/// "first match" below is stable across filesystems.
fn sorted_walk(root: &Path) -> walkdir::IntoIter {
    WalkDir::new(root).sort_by_file_name().into_iter()
}

fn walk_error(err: walkdir::Error) -> GsimError {
    GsimError::Cache(err.to_string())
}

/// Find the first directory named exactly `name` under `root`.
///
/// An absent `root` is a real filesystem fault, not a miss: the caller is
/// expected to have created the cache roots before resolution runs.
pub fn find_dir_named(root: &Path, name: &str) -> Result<Option<PathBuf>> {
    if !root.exists() {
        return Err(GsimError::Cache(format!(
            "Cache root {} does not exist",
            root.display()
        )));
    }
    for entry in sorted_walk(root) {
        let entry = entry.map_err(walk_error)?;
        if entry.file_type().is_dir() && entry.file_name() == OsStr::new(name) {
            return Ok(Some(entry.into_path()));
        }
    }
    Ok(None)
}

/// First entry-point executable beneath `dir` in sorted depth-first order.
/// `Ok(None)` when the tree holds none.
pub fn locate_executable(dir: &Path) -> Result<Option<PathBuf>> {
    for entry in sorted_walk(dir) {
        let entry = entry.map_err(walk_error)?;
        if entry.file_type().is_file()
            && entry.path().extension() == Some(OsStr::new(ENTRY_POINT_EXTENSION))
        {
            return Ok(Some(entry.into_path()));
        }
    }
    Ok(None)
}

/// First file named exactly `name` beneath `dir`.
pub fn find_file_named(dir: &Path, name: &str) -> Result<Option<PathBuf>> {
    for entry in sorted_walk(dir) {
        let entry = entry.map_err(walk_error)?;
        if entry.file_type().is_file() && entry.file_name() == OsStr::new(name) {
            return Ok(Some(entry.into_path()));
        }
    }
    Ok(None)
}

/// Locate the map file and the serial-suffixed test bundle inside an
/// unpacked garden-simulator packet. Both must exist.
pub fn locate_gsp_paths(dir: &Path, serial_number: &str) -> Result<GspPaths> {
    let bundle_suffix = format!("{serial_number}.zip");
    let mut map_file = None;
    let mut test_bundle_file = None;

    for entry in sorted_walk(dir) {
        let entry = entry.map_err(walk_error)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name == "map.json" {
            map_file = Some(entry.into_path());
        } else if name.ends_with(&bundle_suffix) {
            test_bundle_file = Some(entry.into_path());
        }
    }

    match (map_file, test_bundle_file) {
        (Some(map_file), Some(test_bundle_file)) => Ok(GspPaths {
            map_file,
            test_bundle_file,
        }),
        _ => Err(GsimError::CorruptArtifact(
            format!("gsp {serial_number}"),
            format!(
                "map.json or *{bundle_suffix} missing under {}",
                dir.display()
            ),
        )),
    }
}
