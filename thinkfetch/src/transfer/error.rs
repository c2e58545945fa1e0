//! Error types for the transfer engine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while downloading a single file.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Transport-level failure or non-2xx response.
    #[error("failed to download {url}: {reason}")]
    Http {
        /// The URL being fetched.
        url: String,
        /// Short human-readable cause.
        reason: String,
    },

    /// Local filesystem failure.
    #[error("failed to write {path}: {source}")]
    Io {
        /// The destination path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The URL has no usable final path segment to derive a filename from.
    #[error("cannot derive a filename from URL: {0}")]
    InvalidUrl(String),
}
