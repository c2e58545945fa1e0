//! Concurrent file transfer: download tasks, the HTTP downloader, and the
//! worker-pool engine that executes them.

mod engine;
mod error;
mod http;
mod task;

pub use engine::{TaskCompleteCallback, TransferEngine, DEFAULT_CONCURRENCY};
pub use error::TransferError;
pub use http::{FileDownloader, HttpDownloader, ProgressCallback};
pub use task::{
    filename_from_url, sanitize_category, summarize, DownloadTask, TransferOutcome, TransferSummary,
};

#[cfg(test)]
pub use http::tests::MockDownloader;
