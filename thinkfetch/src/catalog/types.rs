//! Core catalog data types.
//!
//! These types are the normalized model every endpoint response shape is
//! converted into. They are created by the resolver, consumed by the
//! selection layer and the transfer engine, and persisted in the run
//! manifest.

use serde::{Deserialize, Serialize};

/// A resolved vendor product.
///
/// Immutable once resolved; held for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDescriptor {
    /// Opaque vendor product id (machine type).
    pub id: String,
    /// Display name.
    pub name: String,
}

/// A single downloadable file belonging to a driver record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Remote URL. Always non-empty for entries that survive normalization.
    pub url: String,
    /// Declared content name. Display only — these are often locale-specific
    /// descriptions and are never used for local file naming.
    pub name: String,
    /// Declared size in bytes; 0 means unknown.
    pub size: u64,
    /// Declared integrity digest, when the catalog provides one.
    pub sha256: Option<String>,
}

impl FileEntry {
    /// Human-readable size for listings.
    pub fn size_display(&self) -> String {
        if self.size == 0 {
            "unknown size".to_string()
        } else {
            format_size(self.size)
        }
    }
}

/// A driver package as listed in the vendor catalog.
///
/// Invariant: a record with zero files is filtered out at resolution time
/// and never emitted to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRecord {
    /// Package title.
    pub title: String,
    /// Free-text category label (e.g. "BIOS", "Audio").
    pub category: String,
    /// Version string as published; not assumed to be semver.
    pub version: String,
    /// Release timestamp as published (free-form).
    pub release_date: String,
    /// Downloadable files, in catalog order.
    pub files: Vec<FileEntry>,
}

impl DriverRecord {
    /// Total number of downloadable files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Format a byte count as a short human-readable string (e.g. "1.5 MB").
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b >= GB => format!("{:.1} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}
