use std::path::PathBuf;

/// Errors from the extraction pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// A required extraction tool is not on PATH.
    #[error("extraction tool '{tool}' not found: {hint}")]
    ToolMissing { tool: String, hint: String },

    /// A pipeline stage ran but did not produce usable output.
    #[error("extraction of {package} failed: {reason}")]
    StageFailed { package: PathBuf, reason: String },

    /// A tool ran past its deadline and was killed.
    #[error("'{tool}' timed out after {seconds}s")]
    Timeout { tool: String, seconds: u64 },

    /// Filesystem failure while preparing or cleaning up.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
