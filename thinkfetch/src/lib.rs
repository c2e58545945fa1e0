//! Driver package retrieval for Lenovo machines.
//!
//! Given a machine serial number, this library resolves the product on
//! the vendor support site, lists the available driver packages, and
//! downloads them concurrently into a category-structured directory with
//! a JSON manifest. SCCM driver packs can additionally be unpacked with
//! the multi-stage extraction pipeline.
//!
//! The flow is: [`catalog`] resolves serial → product → drivers;
//! [`select`] narrows the list by category or explicit choice;
//! [`transfer`] downloads the chosen files; [`extract`] unpacks SCCM
//! packages; [`manifest`] records what was fetched.

pub mod catalog;
pub mod config;
pub mod extract;
pub mod manifest;
pub mod select;
pub mod transfer;

pub use catalog::{CatalogError, CatalogResolver, DriverRecord, FileEntry, ProductDescriptor};
pub use manifest::Manifest;
pub use transfer::{DownloadTask, TransferEngine, TransferOutcome};
