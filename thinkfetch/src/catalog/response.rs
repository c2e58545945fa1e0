//! Endpoint response shapes and their normalization.
//!
//! The vendor's listing endpoints answer in one of a small closed set of
//! JSON shapes. Each shape is modeled as its own serde type with an
//! explicit `normalize` step into the common [`DriverRecord`] model, so
//! unknown or missing fields map to documented defaults instead of being
//! silently absent.

use serde::Deserialize;
use serde_json::Value;

use super::types::{DriverRecord, FileEntry};

/// Default title for items that ship without one.
const DEFAULT_TITLE: &str = "Unknown";
/// Default category for items that ship without one.
const DEFAULT_CATEGORY: &str = "Other";

/// Product lookup response: a JSON array of product entries.
#[derive(Debug, Deserialize)]
pub struct ProductEntry {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
}

/// Primary (v4) driver listing response.
///
/// The item collection lives under `body.DownloadItems`, but some responses
/// put `DownloadItems` at the top level instead; `items()` checks both.
#[derive(Debug, Deserialize)]
pub struct V4Response {
    #[serde(default)]
    pub body: Option<V4Body>,
    #[serde(rename = "DownloadItems", default)]
    pub download_items: Vec<V4Item>,
}

#[derive(Debug, Deserialize)]
pub struct V4Body {
    #[serde(rename = "DownloadItems", default)]
    pub download_items: Vec<V4Item>,
}

#[derive(Debug, Deserialize)]
pub struct V4Item {
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<V4Category>,
    #[serde(rename = "Version", default)]
    pub version: Option<String>,
    #[serde(rename = "Date", default)]
    pub date: Option<V4Date>,
    #[serde(rename = "Files", default)]
    pub files: Vec<V4File>,
}

#[derive(Debug, Deserialize)]
pub struct V4Category {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct V4Date {
    #[serde(rename = "Unix", default)]
    pub unix: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct V4File {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
    #[serde(rename = "Size", default)]
    pub size: Option<Value>,
    #[serde(rename = "SHA256", default)]
    pub sha256: Option<String>,
}

impl V4Response {
    /// Items from `body.DownloadItems`, or the top-level fallback.
    pub fn items(self) -> Vec<V4Item> {
        match self.body {
            Some(body) if !body.download_items.is_empty() => body.download_items,
            _ => self.download_items,
        }
    }
}

impl V4Item {
    /// Normalize into the common model. Returns `None` when no file has a
    /// non-empty URL.
    pub fn normalize(self) -> Option<DriverRecord> {
        let files: Vec<FileEntry> = self
            .files
            .into_iter()
            .filter_map(|f| {
                let url = f.url.unwrap_or_default();
                if url.is_empty() {
                    return None;
                }
                Some(FileEntry {
                    url,
                    name: f.name.unwrap_or_default(),
                    size: value_as_size(f.size.as_ref()),
                    sha256: f.sha256.filter(|s| !s.is_empty()),
                })
            })
            .collect();

        if files.is_empty() {
            return None;
        }

        Some(DriverRecord {
            title: non_empty_or(self.title, DEFAULT_TITLE),
            category: non_empty_or(self.category.and_then(|c| c.name), DEFAULT_CATEGORY),
            version: non_empty_or(self.version, ""),
            release_date: self
                .date
                .and_then(|d| d.unix)
                .map(value_display)
                .unwrap_or_default(),
            files,
        })
    }
}

/// Secondary (v2) driver listing response.
#[derive(Debug, Deserialize)]
pub struct V2Response {
    #[serde(rename = "Downloads", default)]
    pub downloads: Vec<V2Item>,
}

#[derive(Debug, Deserialize)]
pub struct V2Item {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Version", default)]
    pub version: Option<String>,
    #[serde(rename = "DownloadUrl", default)]
    pub download_url: Option<String>,
    #[serde(rename = "FileName", default)]
    pub file_name: Option<String>,
    #[serde(rename = "Size", default)]
    pub size: Option<Value>,
}

impl V2Item {
    /// Normalize into the common model. Returns `None` when the single
    /// download URL is absent or empty.
    pub fn normalize(self) -> Option<DriverRecord> {
        let url = self.download_url.unwrap_or_default();
        if url.is_empty() {
            return None;
        }

        let fallback_name = url.rsplit('/').next().unwrap_or_default().to_string();
        let file = FileEntry {
            name: non_empty_or(self.file_name, &fallback_name),
            url,
            size: value_as_size(self.size.as_ref()),
            sha256: None,
        };

        Some(DriverRecord {
            title: non_empty_or(self.name, DEFAULT_TITLE),
            category: non_empty_or(self.category, DEFAULT_CATEGORY),
            version: non_empty_or(self.version, ""),
            release_date: String::new(),
            files: vec![file],
        })
    }
}

/// Interpret a declared size that may arrive as a number or numeric string.
/// Anything else means unknown (0).
fn value_as_size(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Render a JSON scalar as a plain display string.
fn value_display(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(s) if !s.is_empty() => s,
        _ => default.to_string(),
    }
}
