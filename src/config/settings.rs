//! Probe settings and their on-disk location.
//!
//! Settings only supply defaults for the command line; the scanner itself
//! takes everything from its [`ScanRequest`](crate::scanner::ScanRequest).

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the settings file following the platform conventions
/// (`~/.config/portprobe/settings.json` on Linux).
pub fn default_settings_path() -> ConfigResult<PathBuf> {
    let project =
        ProjectDirs::from("com", "portprobe", "portprobe").ok_or(ConfigError::DirectoryNotFound)?;
    Ok(project.config_dir().join("settings.json"))
}

/// Defaults applied when a command-line flag is not given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Maximum probes in flight.
    pub default_concurrency: usize,
    /// Per-probe timeout in milliseconds.
    pub default_timeout_ms: u64,
    /// Probe dispatches per second, 0 for unlimited.
    pub default_rate_limit: u32,
    /// One of "plain", "json", "csv".
    pub default_output_format: String,
    /// List unreachable ports in plain output.
    pub show_unreachable: bool,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            default_concurrency: 50,
            default_timeout_ms: 1000,
            default_rate_limit: 0,
            default_output_format: "plain".to_string(),
            show_unreachable: false,
        }
    }
}

impl ProbeSettings {
    /// Load settings from the default location, falling back to defaults
    /// when there is no file or no home directory.
    pub fn load() -> ConfigResult<Self> {
        let file = match default_settings_path() {
            Ok(file) => file,
            Err(ConfigError::DirectoryNotFound) => return Ok(Self::default()),
            Err(e) => return Err(e),
        };
        if !file.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&file)
    }

    /// Load settings from a specific file. A missing file is an error.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }
}
