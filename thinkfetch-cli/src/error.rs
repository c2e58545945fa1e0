//! CLI error type.

use std::fmt;

use thinkfetch::catalog::CatalogError;
use thinkfetch::config::ConfigError;
use thinkfetch::extract::ExtractError;
use thinkfetch::manifest::ManifestError;
use thinkfetch::select::SelectionError;
use thinkfetch::transfer::TransferError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Invalid arguments or configuration (e.g. zero workers).
    Config(String),
    /// Catalog resolution failed.
    Catalog(CatalogError),
    /// The transfer engine could not be constructed.
    Transfer(TransferError),
    /// Extraction setup or pipeline failure.
    Extract(ExtractError),
    /// Manifest could not be written.
    Manifest(ManifestError),
    /// Non-interactive package selection was invalid.
    Selection(SelectionError),
    /// Filesystem failure outside the transfer engine.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "{}", msg),
            CliError::Catalog(e) => write!(f, "{}", e),
            CliError::Transfer(e) => write!(f, "{}", e),
            CliError::Extract(e) => write!(f, "{}", e),
            CliError::Manifest(e) => write!(f, "{}", e),
            CliError::Selection(e) => write!(f, "{}", e),
            CliError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::Catalog(e) => Some(e),
            CliError::Transfer(e) => Some(e),
            CliError::Extract(e) => Some(e),
            CliError::Manifest(e) => Some(e),
            CliError::Selection(e) => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<TransferError> for CliError {
    fn from(e: TransferError) -> Self {
        CliError::Transfer(e)
    }
}

impl From<ExtractError> for CliError {
    fn from(e: ExtractError) -> Self {
        CliError::Extract(e)
    }
}

impl From<ManifestError> for CliError {
    fn from(e: ManifestError) -> Self {
        CliError::Manifest(e)
    }
}

impl From<SelectionError> for CliError {
    fn from(e: SelectionError) -> Self {
        CliError::Selection(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
