//! The download manifest written alongside fetched drivers.
//!
//! One `driver_manifest.json` per output directory, recording the machine,
//! the resolved product, and the full driver list as the catalog reported
//! it (before any category filtering), so a later run or a human can see
//! what was available at download time.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{DriverRecord, ProductDescriptor};

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILE_NAME: &str = "driver_manifest.json";

/// Errors while writing or reading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to write manifest at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Snapshot of one download session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub serial_number: String,
    pub product: ProductDescriptor,
    pub drivers: Vec<DriverRecord>,
    pub download_date: String,
}

impl Manifest {
    /// Build a manifest stamped with the current local time.
    pub fn new(serial_number: &str, product: &ProductDescriptor, drivers: &[DriverRecord]) -> Self {
        Self {
            serial_number: serial_number.to_string(),
            product: product.clone(),
            drivers: drivers.to_vec(),
            download_date: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Write the manifest as pretty-printed JSON into `dir`.
    ///
    /// Called before any transfer starts, so the manifest exists even when
    /// every subsequent download fails.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, ManifestError> {
        let path = dir.join(MANIFEST_FILE_NAME);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| ManifestError::Write {
            path: path.clone(),
            source: e,
        })?;
        info!(path = %path.display(), drivers = self.drivers.len(), "manifest written");
        Ok(path)
    }
}
