//! Bulk download command - fetch every driver (optionally filtered by
//! category) into a category-structured output directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use thinkfetch::catalog::{ClientConfig, DriverRecord, ProductDescriptor};
use thinkfetch::manifest::Manifest;
use thinkfetch::select::filter_by_category;
use thinkfetch::transfer::{
    sanitize_category, summarize, DownloadTask, TransferEngine, TransferOutcome,
};

use super::display_absolute;
use crate::error::CliError;

pub struct DownloadArgs<'a> {
    pub serial: &'a str,
    pub product: &'a ProductDescriptor,
    pub drivers: Vec<DriverRecord>,
    pub categories: &'a [String],
    pub output_dir: PathBuf,
    pub workers: usize,
    pub timeout: Duration,
    pub client_config: &'a ClientConfig,
}

/// Run the bulk download flow.
pub fn run(args: DownloadArgs<'_>) -> Result<(), CliError> {
    if args.drivers.is_empty() {
        println!("No drivers found to download");
        return Ok(());
    }

    fs::create_dir_all(&args.output_dir)?;
    println!();
    println!("Saving drivers to: {}", display_absolute(&args.output_dir));

    // The manifest records the full catalog, before any filtering, and is
    // written before the first transfer starts.
    let manifest = Manifest::new(args.serial, args.product, &args.drivers);
    let manifest_path = manifest.write(&args.output_dir)?;
    println!(
        "Saved manifest to {}",
        manifest_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    );

    let selected = filter_by_category(args.drivers, args.categories);
    if !args.categories.is_empty() {
        println!(
            "Filtered to {} drivers in categories: {}",
            selected.len(),
            args.categories.join(", ")
        );
    }

    let tasks = build_tasks(&selected, &args.output_dir);
    if tasks.is_empty() {
        println!("No downloadable files in the selected drivers");
        return Ok(());
    }

    println!();
    println!("Starting download of {} files...", tasks.len());

    let engine = TransferEngine::new(args.client_config, args.workers, args.timeout)?;

    let bar = ProgressBar::new(tasks.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_message("Downloading");

    let progress = bar.clone();
    let outcomes = engine.run(
        &tasks,
        Some(Box::new(move |_done, _total, task, outcome| {
            if let TransferOutcome::Failed { reason } = outcome {
                progress.println(format!("Failed: {} - {}", task.entry.name, reason));
            }
            progress.inc(1);
        })),
    );
    bar.finish_and_clear();

    let summary = summarize(&outcomes);
    println!();
    println!("Download complete!");
    println!("  Downloaded: {}", summary.completed);
    println!("  Skipped (existing): {}", summary.skipped);
    println!("  Failed: {}", summary.failed);
    println!("  Location: {}", display_absolute(&args.output_dir));

    Ok(())
}

/// Expand driver records into per-file tasks under sanitized category dirs.
fn build_tasks(drivers: &[DriverRecord], output_dir: &Path) -> Vec<DownloadTask> {
    let mut tasks = Vec::new();
    for driver in drivers {
        let category_dir = output_dir.join(sanitize_category(&driver.category));
        for entry in &driver.files {
            tasks.push(DownloadTask {
                entry: entry.clone(),
                dest_dir: category_dir.clone(),
                record_title: driver.title.clone(),
            });
        }
    }
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use thinkfetch::catalog::FileEntry;

    fn driver(category: &str, urls: &[&str]) -> DriverRecord {
        DriverRecord {
            title: format!("{} driver", category),
            category: category.to_string(),
            version: "1.0".to_string(),
            release_date: String::new(),
            files: urls
                .iter()
                .map(|u| FileEntry {
                    url: u.to_string(),
                    name: String::new(),
                    size: 0,
                    sha256: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_build_tasks_sanitizes_category_dirs() {
        let drivers = vec![
            driver("BIOS/UEFI", &["https://h/a.exe", "https://h/b.exe"]),
            driver("Audio", &["https://h/c.exe"]),
        ];
        let tasks = build_tasks(&drivers, Path::new("/out"));

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].dest_dir, Path::new("/out/BIOS-UEFI"));
        assert_eq!(tasks[2].dest_dir, Path::new("/out/Audio"));
        assert_eq!(tasks[2].record_title, "Audio driver");
    }
}
