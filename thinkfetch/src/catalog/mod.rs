//! Catalog resolution: serial number → product → driver list.
//!
//! This module is the narrow contract in front of the vendor's support
//! API. It owns:
//!
//! - `types`: the normalized product/driver/file model
//! - `http`: the `CatalogClient` abstraction and reqwest implementation
//! - `response`: per-endpoint response shapes and their normalization
//! - `resolver`: lookup strategies with HTML-scrape fallback
//!
//! Everything downstream (selection, transfer, manifest) only ever sees
//! the normalized [`DriverRecord`] model.

mod error;
mod http;
mod response;
mod resolver;
mod types;

pub use error::CatalogError;
pub use http::{CatalogClient, CatalogResponse, ClientConfig, ReqwestCatalogClient};
pub use resolver::{CatalogResolver, DEFAULT_BASE_URL};
pub use types::{format_size, DriverRecord, FileEntry, ProductDescriptor};

#[cfg(test)]
pub use http::tests::MockCatalogClient;
