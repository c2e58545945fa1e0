//! Download tasks, outcomes, and destination naming rules.

use std::path::PathBuf;

use crate::catalog::FileEntry;

use super::error::TransferError;

/// A single unit of work for the transfer engine.
///
/// Ephemeral: created per run, consumed by the engine, reported in the
/// summary, never persisted.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    /// The file to fetch.
    pub entry: FileEntry,
    /// Directory the file lands in.
    pub dest_dir: PathBuf,
    /// Title of the owning driver record, for logging only.
    pub record_title: String,
}

impl DownloadTask {
    /// Full destination path for this task.
    pub fn dest_path(&self) -> Result<PathBuf, TransferError> {
        Ok(self.dest_dir.join(filename_from_url(&self.entry.url)?))
    }
}

/// Per-task result, used only for aggregation and reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The file was downloaded in full.
    Completed {
        /// Bytes written.
        bytes: u64,
    },
    /// The destination file already existed; no network call was made.
    Skipped,
    /// The download failed; any partial file was removed.
    Failed {
        /// Short human-readable cause.
        reason: String,
    },
}

/// Aggregated counts over a batch of outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferSummary {
    /// Tasks that downloaded successfully.
    pub completed: usize,
    /// Tasks skipped because the destination already existed.
    pub skipped: usize,
    /// Tasks that failed.
    pub failed: usize,
}

/// Count outcomes into a summary.
pub fn summarize(outcomes: &[TransferOutcome]) -> TransferSummary {
    let mut summary = TransferSummary::default();
    for outcome in outcomes {
        match outcome {
            TransferOutcome::Completed { .. } => summary.completed += 1,
            TransferOutcome::Skipped => summary.skipped += 1,
            TransferOutcome::Failed { .. } => summary.failed += 1,
        }
    }
    summary
}

/// Derive the on-disk filename from a download URL.
///
/// The filename is always the percent-decoded final path segment of the
/// URL with any query string stripped — never the catalog's declared
/// display name, which may be an arbitrary locale-specific description.
pub fn filename_from_url(url: &str) -> Result<String, TransferError> {
    let without_query = url.split('?').next().unwrap_or(url);
    let segment = without_query.rsplit('/').next().unwrap_or("");

    if segment.is_empty() {
        return Err(TransferError::InvalidUrl(url.to_string()));
    }

    let decoded = match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        // Not valid UTF-8 after decoding; keep the raw segment.
        Err(_) => segment.to_string(),
    };

    // A segment that decodes to something path-like (%2F etc.) cannot be
    // trusted as a filename.
    if decoded.is_empty()
        || decoded == "."
        || decoded == ".."
        || decoded.contains('/')
        || decoded.contains('\\')
    {
        return Err(TransferError::InvalidUrl(url.to_string()));
    }

    Ok(decoded)
}

/// Sanitize a category label for use as a directory name.
///
/// Directory separators occurring naturally in labels (e.g.
/// "Storage/Chipset") would otherwise create accidental subdirectories.
pub fn sanitize_category(category: &str) -> String {
    category.replace(['/', '\\'], "-")
}
