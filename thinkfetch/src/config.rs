//! Persistent user configuration.
//!
//! Settings live in an INI file under the platform config directory
//! (`~/.config/thinkfetch/config.ini` on Linux). Everything has a
//! default; a missing file is not an error.

use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::debug;

/// Default number of concurrent download workers.
pub const DEFAULT_WORKERS: usize = 4;

/// Default per-request download timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Errors loading or saving the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine the user configuration directory")]
    NoConfigDir,

    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Path of the configuration file inside the platform config directory.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("thinkfetch").join("config.ini"))
}

/// The persisted settings, with defaults applied for anything unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// `[download] workers` - concurrent download workers.
    pub workers: usize,

    /// `[download] timeout_secs` - per-request timeout.
    pub timeout_secs: u64,

    /// `[download] output_dir` - fixed output directory. When unset, the
    /// output directory is derived from the serial number at run time.
    pub output_dir: Option<PathBuf>,

    /// `[catalog] base_url` - support-site base URL.
    pub base_url: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_dir: None,
            base_url: crate::catalog::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ConfigFile {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path()?)
    }

    /// Load from an explicit path. A missing file yields defaults;
    /// unknown keys are ignored, malformed values fall back to defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let defaults = Self::default();
        let download = ini.section(Some("download"));
        let catalog = ini.section(Some("catalog"));

        Ok(Self {
            workers: download
                .and_then(|s| s.get("workers"))
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.workers),
            timeout_secs: download
                .and_then(|s| s.get("timeout_secs"))
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            output_dir: download
                .and_then(|s| s.get("output_dir"))
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            base_url: catalog
                .and_then(|s| s.get("base_url"))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .unwrap_or(defaults.base_url),
        })
    }

    /// Save to the default location, creating parent directories.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path()?)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let mut ini = Ini::new();
        let mut download = ini.with_section(Some("download"));
        download
            .set("workers", self.workers.to_string())
            .set("timeout_secs", self.timeout_secs.to_string());
        if let Some(dir) = &self.output_dir {
            download.set("output_dir", dir.display().to_string());
        }
        ini.with_section(Some("catalog"))
            .set("base_url", self.base_url.clone());

        ini.write_to_file(path).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
