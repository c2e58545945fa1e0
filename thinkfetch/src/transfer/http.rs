//! HTTP-based file downloader with streamed writes and partial cleanup.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::catalog::ClientConfig;

use super::error::TransferError;

/// Default timeout for download requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Buffer size for reading/writing during downloads (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Byte-level progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 when the remote does not declare a content length.
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Trait for single-file download operations.
///
/// This abstraction lets the transfer engine be exercised in tests with a
/// scripted downloader instead of the network.
pub trait FileDownloader: Send + Sync {
    /// Download `url` to `dest`, returning the number of bytes written.
    ///
    /// On any failure the implementation must remove a partially written
    /// `dest` before returning the error.
    fn download(&self, url: &str, dest: &Path) -> Result<u64, TransferError>;

    /// As [`FileDownloader::download`], reporting byte-level progress.
    fn download_with_progress(
        &self,
        url: &str,
        dest: &Path,
        on_progress: ProgressCallback,
    ) -> Result<u64, TransferError>;
}

/// Blocking reqwest downloader carrying the shared client configuration.
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Create a downloader from the shared client configuration with the
    /// default download timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, TransferError> {
        Self::with_timeout(config, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a downloader with a custom timeout.
    pub fn with_timeout(config: &ClientConfig, timeout: Duration) -> Result<Self, TransferError> {
        let client = Client::builder()
            .default_headers(config.headers())
            .timeout(timeout)
            .build()
            .map_err(|e| TransferError::Http {
                url: String::new(),
                reason: format!("failed to create HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    /// Stream the response body to the destination file.
    ///
    /// Memory use is bounded by the fixed read buffer regardless of remote
    /// size; an absent content-length is tolerated and the body is written
    /// until EOF.
    fn stream_to_file(
        &self,
        url: &str,
        dest: &Path,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<u64, TransferError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| TransferError::Http {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Http {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        let total_size = response.content_length().unwrap_or(0);

        let file = File::create(dest).map_err(|e| TransferError::Io {
            path: dest.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut downloaded = 0u64;

        loop {
            let bytes_read = response
                .read(&mut buffer)
                .map_err(|e| TransferError::Http {
                    url: url.to_string(),
                    reason: format!("read error: {}", e),
                })?;

            if bytes_read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..bytes_read])
                .map_err(|e| TransferError::Io {
                    path: dest.to_path_buf(),
                    source: e,
                })?;

            downloaded += bytes_read as u64;
            if let Some(cb) = on_progress {
                cb(downloaded, total_size);
            }
        }

        writer.flush().map_err(|e| TransferError::Io {
            path: dest.to_path_buf(),
            source: e,
        })?;

        Ok(downloaded)
    }

    /// Run the streamed download, removing any partial file on failure so a
    /// failed task never leaves truncated output on disk.
    fn download_cleanly(
        &self,
        url: &str,
        dest: &Path,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<u64, TransferError> {
        match self.stream_to_file(url, dest, on_progress) {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                if dest.exists() {
                    fs::remove_file(dest).ok();
                }
                Err(e)
            }
        }
    }
}

impl FileDownloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<u64, TransferError> {
        self.download_cleanly(url, dest, None)
    }

    fn download_with_progress(
        &self,
        url: &str,
        dest: &Path,
        on_progress: ProgressCallback,
    ) -> Result<u64, TransferError> {
        self.download_cleanly(url, dest, Some(&on_progress))
    }
}
