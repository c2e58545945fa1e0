//! Error types for catalog resolution.

use thiserror::Error;

/// Errors that can occur while resolving products or listing drivers.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Every resolution strategy was exhausted without finding the product.
    ///
    /// This is the only fatal catalog error: the process exits non-zero.
    #[error("could not find product info for serial number: {serial}")]
    ProductNotFound {
        /// The serial number that failed to resolve.
        serial: String,
    },

    /// HTTP transport or client construction failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A response body could not be parsed in any expected shape.
    #[error("failed to parse catalog response: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_not_found_display() {
        let err = CatalogError::ProductNotFound {
            serial: "PF1234AB".to_string(),
        };
        assert!(err.to_string().contains("PF1234AB"));
    }
}
