//! HTTP client abstraction for catalog requests.
//!
//! The `CatalogClient` trait allows the resolver to be tested against mock
//! responses without touching the network. The production implementation
//! wraps a blocking reqwest client configured from an immutable
//! [`ClientConfig`] — there is no process-wide session state.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};

use super::error::CatalogError;

/// Default timeout for catalog requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Immutable client configuration shared by all catalog and transfer calls.
///
/// The vendor's support endpoints reject requests that do not look like a
/// browser, so the defaults carry a full set of browser-identifying headers.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User-Agent header value.
    pub user_agent: String,
    /// Accept header value.
    pub accept: String,
    /// Accept-Language header value.
    pub accept_language: String,
    /// Referer header value.
    pub referer: String,
    /// Origin header value.
    pub origin: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            accept: "application/json, text/plain, */*".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            referer: "https://pcsupport.lenovo.com/".to_string(),
            origin: "https://pcsupport.lenovo.com".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the default header map for this configuration.
    pub(crate) fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let pairs = [
            ("User-Agent", &self.user_agent),
            ("Accept", &self.accept),
            ("Accept-Language", &self.accept_language),
            ("Referer", &self.referer),
            ("Origin", &self.origin),
        ];
        for (name, value) in pairs {
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(name, value);
            }
        }
        headers
    }

    /// Build a blocking reqwest client from this configuration.
    pub(crate) fn build_client(&self) -> Result<Client, reqwest::Error> {
        Client::builder()
            .default_headers(self.headers())
            .timeout(self.timeout)
            .build()
    }
}

/// A catalog endpoint response: status code plus body text.
#[derive(Debug, Clone)]
pub struct CatalogResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text (JSON or HTML depending on endpoint).
    pub body: String,
}

impl CatalogResponse {
    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for catalog HTTP operations.
///
/// This abstraction allows dependency injection of mock clients in tests.
pub trait CatalogClient: Send + Sync {
    /// Perform an HTTP GET and return the status plus body text.
    fn get(&self, url: &str) -> Result<CatalogResponse, CatalogError>;
}

/// Real catalog client implementation using blocking reqwest.
pub struct ReqwestCatalogClient {
    client: Client,
}

impl ReqwestCatalogClient {
    /// Create a client from the given configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, CatalogError> {
        let client = config
            .build_client()
            .map_err(|e| CatalogError::Http(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl CatalogClient for ReqwestCatalogClient {
    fn get(&self, url: &str) -> Result<CatalogResponse, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| CatalogError::Http(format!("request to {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| CatalogError::Http(format!("failed to read response body: {}", e)))?;

        Ok(CatalogResponse { status, body })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Mock catalog client returning canned responses per URL substring.
    pub struct MockCatalogClient {
        /// Responses keyed by a substring of the requested URL.
        pub responses: HashMap<&'static str, CatalogResponse>,
    }

    impl MockCatalogClient {
        pub fn new() -> Self {
            Self {
                responses: HashMap::new(),
            }
        }

        pub fn with_response(mut self, url_part: &'static str, status: u16, body: &str) -> Self {
            self.responses.insert(
                url_part,
                CatalogResponse {
                    status,
                    body: body.to_string(),
                },
            );
            self
        }
    }

    impl CatalogClient for MockCatalogClient {
        fn get(&self, url: &str) -> Result<CatalogResponse, CatalogError> {
            for (part, response) in &self.responses {
                if url.contains(part) {
                    return Ok(response.clone());
                }
            }
            Err(CatalogError::Http(format!("no mock response for {}", url)))
        }
    }

    #[test]
    fn test_default_config_headers() {
        let config = ClientConfig::default();
        let headers = config.headers();
        assert!(headers.contains_key("User-Agent"));
        assert!(headers.contains_key("Referer"));
        assert_eq!(headers.len(), 5);
    }

    #[test]
    fn test_response_is_success() {
        let ok = CatalogResponse {
            status: 200,
            body: String::new(),
        };
        let not_found = CatalogResponse {
            status: 404,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!not_found.is_success());
    }
}
