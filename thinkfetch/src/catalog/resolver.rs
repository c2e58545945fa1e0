//! Serial number resolution and driver listing.
//!
//! Resolution tries the primary product API first and falls back to
//! scraping the product id out of the HTML support page. Driver listing
//! tries the v4 JSON shape, then the v2 shape; both are normalized into
//! the common [`DriverRecord`] model.

use regex::Regex;
use tracing::{debug, warn};

use super::error::CatalogError;
use super::http::CatalogClient;
use super::response::{ProductEntry, V2Response, V4Response};
use super::types::{DriverRecord, ProductDescriptor};

/// Default support site root, up to and including the locale segment.
pub const DEFAULT_BASE_URL: &str = "https://pcsupport.lenovo.com/us/en";

/// Catalog resolver: turns a device serial into a product descriptor and a
/// normalized driver list.
pub struct CatalogResolver<C: CatalogClient> {
    client: C,
    base_url: String,
}

impl<C: CatalogClient> CatalogResolver<C> {
    /// Create a resolver against the default support site.
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Create a resolver against a custom site root (used by tests and the
    /// config file's `[catalog] base_url` override).
    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    /// Resolve a device serial number to a product descriptor.
    ///
    /// The serial is trimmed and upper-cased before lookup. All strategies
    /// exhausted yields [`CatalogError::ProductNotFound`].
    pub fn resolve(&self, serial: &str) -> Result<ProductDescriptor, CatalogError> {
        let serial = serial.trim().to_uppercase();

        match self.query_products(&serial) {
            Ok(Some(product)) => return Ok(product),
            Ok(None) => debug!(serial = %serial, "primary lookup returned no products"),
            Err(e) => warn!(serial = %serial, error = %e, "primary lookup failed"),
        }

        match self.scrape_product_id(&serial) {
            Ok(Some(product_id)) => match self.query_products(&product_id) {
                Ok(Some(product)) => return Ok(product),
                Ok(None) => debug!(product_id = %product_id, "re-query returned no products"),
                Err(e) => warn!(product_id = %product_id, error = %e, "re-query failed"),
            },
            Ok(None) => debug!(serial = %serial, "no product id found in support page"),
            Err(e) => warn!(serial = %serial, error = %e, "support page lookup failed"),
        }

        Err(CatalogError::ProductNotFound { serial })
    }

    /// List drivers for a resolved product.
    ///
    /// A listing endpoint failing while a fallback produces results is
    /// degraded but non-fatal; the caller gets whatever was obtained,
    /// possibly an empty list.
    pub fn list_drivers(
        &self,
        product: &ProductDescriptor,
    ) -> Result<Vec<DriverRecord>, CatalogError> {
        match self.query_drivers_v4(&product.id) {
            Ok(drivers) if !drivers.is_empty() => return Ok(drivers),
            Ok(_) => debug!(product = %product.id, "v4 listing empty, trying v2"),
            Err(e) => warn!(product = %product.id, error = %e, "v4 listing failed, trying v2"),
        }

        match self.query_drivers_v2(&product.id) {
            Ok(drivers) => Ok(drivers),
            Err(e) => {
                warn!(product = %product.id, error = %e, "v2 listing failed");
                // Degraded: both shapes failed, continue with zero drivers.
                Ok(Vec::new())
            }
        }
    }

    /// Query the product API with a serial or product id.
    fn query_products(&self, id: &str) -> Result<Option<ProductDescriptor>, CatalogError> {
        let url = format!("{}/api/v4/mse/getproducts?productId={}", self.base_url, id);
        let response = self.client.get(&url)?;

        if !response.is_success() {
            return Err(CatalogError::Http(format!(
                "product lookup returned HTTP {}",
                response.status
            )));
        }

        let entries: Vec<ProductEntry> = serde_json::from_str(&response.body)
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        Ok(entries.into_iter().next().map(|entry| ProductDescriptor {
            id: if entry.id.is_empty() {
                id.to_string()
            } else {
                entry.id
            },
            name: if entry.name.is_empty() {
                "Unknown".to_string()
            } else {
                entry.name
            },
        }))
    }

    /// Fallback: fetch the HTML support page and extract the embedded
    /// product id.
    fn scrape_product_id(&self, serial: &str) -> Result<Option<String>, CatalogError> {
        let url = format!("{}/products/{}", self.base_url, serial.to_lowercase());
        let response = self.client.get(&url)?;

        if !response.is_success() {
            return Err(CatalogError::Http(format!(
                "support page returned HTTP {}",
                response.status
            )));
        }

        let pattern = Regex::new(r#""productId":\s*"([^"]+)""#)
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        Ok(pattern
            .captures(&response.body)
            .map(|caps| caps[1].to_string()))
    }

    /// Primary v4 driver listing.
    fn query_drivers_v4(&self, product_id: &str) -> Result<Vec<DriverRecord>, CatalogError> {
        let url = format!(
            "{}/api/v4/downloads/drivers?productId={}",
            self.base_url, product_id
        );
        let response = self.client.get(&url)?;

        if !response.is_success() {
            return Err(CatalogError::Http(format!(
                "driver listing returned HTTP {}",
                response.status
            )));
        }

        let parsed: V4Response = serde_json::from_str(&response.body)
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        Ok(parsed
            .items()
            .into_iter()
            .filter_map(|item| item.normalize())
            .collect())
    }

    /// Secondary v2 driver listing.
    fn query_drivers_v2(&self, product_id: &str) -> Result<Vec<DriverRecord>, CatalogError> {
        let url = format!("{}/api/v2/products/{}/downloads", self.base_url, product_id);
        let response = self.client.get(&url)?;

        if !response.is_success() {
            return Err(CatalogError::Http(format!(
                "v2 driver listing returned HTTP {}",
                response.status
            )));
        }

        let parsed: V2Response = serde_json::from_str(&response.body)
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        Ok(parsed
            .downloads
            .into_iter()
            .filter_map(|item| item.normalize())
            .collect())
    }
}
