//! SCCM command - download deployment driver packs, with optional
//! extraction into per-package directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use thinkfetch::catalog::{ClientConfig, DriverRecord};
use thinkfetch::extract::{count_inf_files, ExtractOutcome, Extractor};
use thinkfetch::select::{sccm_packages, PresetSelection, SelectionProvider};
use thinkfetch::transfer::{filename_from_url, FileDownloader, HttpDownloader};

use super::display_absolute;
use crate::error::CliError;
use crate::interact::StdinSelection;

pub struct SccmArgs<'a> {
    pub drivers: Vec<DriverRecord>,
    pub output_dir: PathBuf,
    pub timeout: Duration,
    pub client_config: &'a ClientConfig,
    /// Explicit 1-based package indices; `None` prompts interactively.
    pub preset: Option<&'a [usize]>,
    pub extract: bool,
}

/// Run the SCCM package flow.
pub fn run(args: SccmArgs<'_>) -> Result<(), CliError> {
    let packages = sccm_packages(args.drivers);

    if packages.is_empty() {
        println!("No SCCM packages found for this device");
        println!("SCCM packages are typically available for ThinkPad/ThinkCentre business models");
        return Ok(());
    }

    println!();
    println!("Found {} SCCM package(s):", packages.len());
    for (index, package) in packages.iter().enumerate() {
        println!("  [{}] {}", index + 1, package.title);
        for file in &package.files {
            let name = filename_from_url(&file.url).unwrap_or_else(|_| file.name.clone());
            println!("      - {} ({})", name, file.size_display());
        }
    }

    // Explicit indices are validated before any I/O; the interactive path
    // re-prompts on bad input instead.
    let selection = match args.preset {
        Some(indices) => PresetSelection::from_one_based(indices).select(&packages)?,
        None => StdinSelection.select(&packages)?,
    };

    let selected_indices = selection.resolve(packages.len());
    if selected_indices.is_empty() {
        println!("Download cancelled");
        return Ok(());
    }

    println!();
    println!("Selected {} package(s) to download:", selected_indices.len());
    for &index in &selected_indices {
        println!("  - {}", packages[index].title);
    }

    let sccm_dir = args.output_dir.join("SCCM");
    fs::create_dir_all(&sccm_dir)?;
    println!();
    println!("Saving to: {}", display_absolute(&sccm_dir));

    let downloader = HttpDownloader::with_timeout(args.client_config, args.timeout)?;
    let mut downloaded: Vec<PathBuf> = Vec::new();

    for &index in &selected_indices {
        for file in &packages[index].files {
            let name = match filename_from_url(&file.url) {
                Ok(name) => name,
                Err(e) => {
                    println!("Skipping a file of '{}': {}", packages[index].title, e);
                    continue;
                }
            };
            let dest = sccm_dir.join(&name);

            if dest.exists() {
                println!();
                println!("{} already exists, skipping download", name);
                downloaded.push(dest);
                continue;
            }

            println!();
            println!("Downloading {} ({})...", name, file.size_display());

            let bar = progress_bar(&name, file.size);
            let progress = bar.clone();
            let result = downloader.download_with_progress(
                &file.url,
                &dest,
                Box::new(move |done, total| {
                    if total > 0 && progress.length() != Some(total) {
                        progress.set_length(total);
                    }
                    progress.set_position(done);
                }),
            );
            bar.finish_and_clear();

            match result {
                Ok(bytes) => {
                    println!("Downloaded {} ({} bytes)", name, bytes);
                    downloaded.push(dest);
                }
                Err(e) => println!("Failed to download {}: {}", name, e),
            }
        }
    }

    if args.extract && !downloaded.is_empty() {
        extract_packages(&sccm_dir, &downloaded);
    }

    println!();
    println!("SCCM package download complete!");
    println!("  Location: {}", display_absolute(&sccm_dir));

    if args.extract {
        print_extracted_summary(&sccm_dir, &downloaded);
    }

    println!();
    println!("Usage for OOBE/deployment:");
    println!("  - USB install: pnputil /add-driver <path>\\*.inf /subdirs");
    println!("  - DISM inject: DISM /Image:C:\\Mount /Add-Driver /Driver:<path> /Recurse");

    Ok(())
}

/// Extract each downloaded .exe into `<sccm_dir>/<stem>/`.
///
/// Failures here are per-archive: a pack that cannot be extracted is
/// reported and the rest still get their attempt.
fn extract_packages(sccm_dir: &Path, downloaded: &[PathBuf]) {
    println!();
    println!("Extracting SCCM packages...");

    let extractor = match Extractor::detect() {
        Ok(extractor) => extractor,
        Err(e) => {
            println!("Extraction skipped: {}", e);
            return;
        }
    };

    for package in downloaded {
        let Some(dest) = extraction_dir(sccm_dir, package) else {
            continue;
        };

        println!();
        println!(
            "Extracting {}...",
            package.file_name().unwrap_or_default().to_string_lossy()
        );
        match extractor.extract(package, &dest) {
            Ok(ExtractOutcome::Extracted) => {
                println!("Extracted to {}/", dest.file_name().unwrap_or_default().to_string_lossy())
            }
            Ok(ExtractOutcome::AlreadyExtracted) => {
                println!(
                    "{}/ already extracted, skipping",
                    dest.file_name().unwrap_or_default().to_string_lossy()
                )
            }
            Err(e) => println!("Extraction failed: {}", e),
        }
    }
}

/// Destination directory for an archive, `None` for non-.exe files.
fn extraction_dir(sccm_dir: &Path, package: &Path) -> Option<PathBuf> {
    let is_exe = package
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"));
    if !is_exe {
        return None;
    }
    package.file_stem().map(|stem| sccm_dir.join(stem))
}

fn print_extracted_summary(sccm_dir: &Path, downloaded: &[PathBuf]) {
    let extracted: Vec<PathBuf> = downloaded
        .iter()
        .filter_map(|package| extraction_dir(sccm_dir, package))
        .filter(|dir| dir.exists())
        .collect();

    if extracted.is_empty() {
        return;
    }

    println!();
    println!("Extracted driver folders:");
    for dir in extracted {
        let inf_count = count_inf_files(&dir);
        println!(
            "  - {}/  ({} .inf driver files)",
            dir.file_name().unwrap_or_default().to_string_lossy(),
            inf_count
        );
    }
}

fn progress_bar(name: &str, size: u64) -> ProgressBar {
    let bar = ProgressBar::new(size);
    bar.set_style(
        ProgressStyle::with_template("{msg:40} [{bar:30.cyan/blue}] {bytes}/{total_bytes}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    let label: String = name.chars().take(40).collect();
    bar.set_message(label);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_dir_only_for_exe() {
        let sccm = Path::new("/out/SCCM");
        assert_eq!(
            extraction_dir(sccm, Path::new("/out/SCCM/pack.exe")),
            Some(PathBuf::from("/out/SCCM/pack"))
        );
        assert_eq!(
            extraction_dir(sccm, Path::new("/out/SCCM/PACK.EXE")),
            Some(PathBuf::from("/out/SCCM/PACK"))
        );
        assert_eq!(extraction_dir(sccm, Path::new("/out/SCCM/readme.txt")), None);
    }
}
