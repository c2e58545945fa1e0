//! Integration test for the bulk download workflow:
//! catalog resolution → manifest → transfer, end to end against
//! scripted collaborators.
//!
//! Run with: `cargo test --test bulk_workflow_integration`

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;

use thinkfetch::catalog::{
    CatalogClient, CatalogError, CatalogResolver, CatalogResponse, ProductDescriptor,
};
use thinkfetch::manifest::{Manifest, MANIFEST_FILE_NAME};
use thinkfetch::transfer::{
    sanitize_category, summarize, DownloadTask, FileDownloader, TransferEngine, TransferError,
    TransferOutcome,
};

/// Catalog client answering from canned bodies keyed by URL substring.
struct ScriptedCatalog {
    responses: Vec<(&'static str, &'static str)>,
}

impl CatalogClient for ScriptedCatalog {
    fn get(&self, url: &str) -> Result<CatalogResponse, CatalogError> {
        for (part, body) in &self.responses {
            if url.contains(part) {
                return Ok(CatalogResponse {
                    status: 200,
                    body: body.to_string(),
                });
            }
        }
        Err(CatalogError::Http(format!("unexpected request to {}", url)))
    }
}

/// Downloader that writes fixed content and counts its invocations.
struct ScriptedDownloader {
    calls: AtomicUsize,
}

impl ScriptedDownloader {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl FileDownloader for ScriptedDownloader {
    fn download(&self, _url: &str, dest: &Path) -> Result<u64, TransferError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::fs::write(dest, b"mz-payload").map_err(|e| TransferError::Io {
            path: dest.to_path_buf(),
            source: e,
        })?;
        Ok(10)
    }

    fn download_with_progress(
        &self,
        url: &str,
        dest: &Path,
        _on_progress: thinkfetch::transfer::ProgressCallback,
    ) -> Result<u64, TransferError> {
        self.download(url, dest)
    }
}

fn scripted_resolver() -> CatalogResolver<ScriptedCatalog> {
    let client = ScriptedCatalog {
        responses: vec![
            (
                "mse/getproducts",
                r#"[{"Id": "20XW", "Name": "ThinkPad X1 Carbon"}]"#,
            ),
            (
                "downloads/drivers",
                r#"{"body": {"DownloadItems": [
                    {"Title": "BIOS Update", "Category": {"Name": "BIOS"},
                     "Version": "1.2",
                     "Files": [{"URL": "https://host/path/bios_1.2.exe?sig=abc"}]}
                ]}}"#,
            ),
        ],
    };
    CatalogResolver::new(client)
}

fn build_tasks(
    resolver: &CatalogResolver<ScriptedCatalog>,
    out: &Path,
) -> (ProductDescriptor, Vec<DownloadTask>) {
    let product = resolver.resolve("PF0ABCDE").unwrap();
    let drivers = resolver.list_drivers(&product).unwrap();

    let manifest = Manifest::new("PF0ABCDE", &product, &drivers);
    manifest.write(out).unwrap();

    let tasks = drivers
        .iter()
        .flat_map(|driver| {
            let dest_dir = out.join(sanitize_category(&driver.category));
            driver.files.iter().map(move |entry| DownloadTask {
                entry: entry.clone(),
                dest_dir: dest_dir.clone(),
                record_title: driver.title.clone(),
            })
        })
        .collect();
    (product, tasks)
}

#[test]
fn bulk_workflow_creates_category_file_and_manifest() {
    let out = TempDir::new().unwrap();
    let resolver = scripted_resolver();
    let (product, tasks) = build_tasks(&resolver, out.path());

    assert_eq!(product.id, "20XW");
    assert_eq!(tasks.len(), 1);

    let engine = TransferEngine::with_downloader(Arc::new(ScriptedDownloader::new()), 4);
    let outcomes = engine.run(&tasks, None);

    assert_eq!(summarize(&outcomes).completed, 1);
    // Filename comes from the URL path segment, query stripped.
    assert!(out.path().join("BIOS").join("bios_1.2.exe").exists());

    let manifest_json = std::fs::read_to_string(out.path().join(MANIFEST_FILE_NAME)).unwrap();
    let manifest: Manifest = serde_json::from_str(&manifest_json).unwrap();
    assert_eq!(manifest.serial_number, "PF0ABCDE");
    assert_eq!(manifest.drivers.len(), 1);
    assert_eq!(manifest.drivers[0].title, "BIOS Update");
}

#[test]
fn bulk_workflow_rerun_skips_everything() {
    let out = TempDir::new().unwrap();
    let resolver = scripted_resolver();
    let (_, tasks) = build_tasks(&resolver, out.path());

    let downloader = Arc::new(ScriptedDownloader::new());
    let engine = TransferEngine::with_downloader(Arc::clone(&downloader) as Arc<dyn FileDownloader>, 4);

    engine.run(&tasks, None);
    assert_eq!(downloader.calls.load(Ordering::SeqCst), 1);

    let second = engine.run(&tasks, None);
    assert!(second.iter().all(|o| *o == TransferOutcome::Skipped));
    assert_eq!(downloader.calls.load(Ordering::SeqCst), 1);
}
