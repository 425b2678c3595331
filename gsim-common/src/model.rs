// gsim-common/src/model.rs
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Short product code identifying a target device variant (e.g. "P25").
/// Used both as a catalog filter substring and as a cache directory key.
/// Case-sensitive, and expected to be non-empty whenever resolution runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform(String);

impl Platform {
    pub fn new(code: impl Into<String>) -> Self {
        Platform(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The substring convention the catalog encodes platforms with.
    /// Bundle type names look like "40.x_Main-App-P25-Win_master_...".
    pub fn marker(&self) -> String {
        format!("-{}-Win", self.0)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Platform {
    fn from(code: &str) -> Self {
        Platform(code.to_string())
    }
}

/// A named artifact family offered by the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BundleType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// The latest build of a bundle type. `blob` is a reference relative to the
/// catalog's blob endpoint and must be resolved before download.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub id: String,
    pub blob: String,
}

/// Locations inside an unpacked garden-simulator packet. Both files must be
/// present for a packet to be usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GspPaths {
    pub map_file: PathBuf,
    pub test_bundle_file: PathBuf,
}

/// Severity of a classified process output line. Derived purely from line
/// content; the originating stream carries no severity information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

/// One logical line of supervised process output, tagged with a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub text: String,
}
