//! The multi-stage package extraction pipeline.
//!
//! Lenovo driver packages are InstallShield self-extractors. On Windows
//! they unpack themselves; elsewhere the outer layer is opened with 7-Zip
//! and the inner `[0]` payload is tried against cabextract, innoextract,
//! and 7-Zip in turn. The whole pipeline is idempotent: a destination
//! directory that already has content is treated as done.

use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tracing::{debug, info};

use super::error::ExtractError;
use super::runner::{run_with_timeout, ToolOutcome};
#[cfg(unix)]
use super::tools::Toolbox;

/// Deadline for the outer unix extraction stage.
const OUTER_STAGE_TIMEOUT: Duration = Duration::from_secs(300);

/// Deadline for each inner payload attempt (and for Windows self-extraction).
const INNER_STAGE_TIMEOUT: Duration = Duration::from_secs(600);

/// Leftover files the outer stage produces alongside the real payload.
const ARTIFACT_NAMES: &[&str] = &["[0]", "[1]", "[2]", "CERTIFICATE"];

/// Result of one extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// The pipeline ran and produced content.
    Extracted,
    /// The destination already had content; nothing was invoked.
    AlreadyExtracted,
}

/// The platform extraction pipeline.
///
/// Tool discovery happens once at construction, so a missing mandatory
/// tool surfaces before any download or extraction starts.
pub struct Extractor {
    #[cfg(unix)]
    toolbox: Toolbox,
}

impl Extractor {
    /// Detect the required tools and build the pipeline.
    pub fn detect() -> Result<Self, ExtractError> {
        #[cfg(unix)]
        {
            Ok(Self {
                toolbox: Toolbox::detect()?,
            })
        }
        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    #[cfg(all(unix, test))]
    fn with_toolbox(toolbox: Toolbox) -> Self {
        Self { toolbox }
    }

    /// Extract `package` into `dest`.
    ///
    /// A non-empty `dest` short-circuits to [`ExtractOutcome::AlreadyExtracted`]
    /// without touching any tool. Success is judged by exit status or by the
    /// destination ending up non-empty; some self-extractors exit non-zero
    /// after unpacking correctly.
    pub fn extract(&self, package: &Path, dest: &Path) -> Result<ExtractOutcome, ExtractError> {
        if dir_has_entries(dest)? {
            debug!(dest = %dest.display(), "destination already populated, skipping extraction");
            return Ok(ExtractOutcome::AlreadyExtracted);
        }

        fs::create_dir_all(dest).map_err(|e| ExtractError::Io {
            path: dest.to_path_buf(),
            source: e,
        })?;

        info!(package = %package.display(), dest = %dest.display(), "extracting package");

        #[cfg(unix)]
        {
            self.extract_unix(package, dest)?;
        }
        #[cfg(not(unix))]
        {
            self.extract_windows(package, dest)?;
        }

        Ok(ExtractOutcome::Extracted)
    }

    #[cfg(unix)]
    fn extract_unix(&self, package: &Path, dest: &Path) -> Result<(), ExtractError> {
        let mut outer = Command::new(&self.toolbox.seven_zip);
        outer
            .arg("x")
            .arg("-y")
            .arg(format!("-o{}", dest.display()))
            .arg(package);

        match run_with_timeout(outer, "7z", OUTER_STAGE_TIMEOUT)? {
            ToolOutcome::Success => {}
            ToolOutcome::TimedOut => {
                return Err(ExtractError::Timeout {
                    tool: "7z".to_string(),
                    seconds: OUTER_STAGE_TIMEOUT.as_secs(),
                })
            }
            ToolOutcome::Failed { stderr, .. } => {
                return Err(ExtractError::StageFailed {
                    package: package.to_path_buf(),
                    reason: format!("outer layer extraction failed: {}", first_line(&stderr)),
                })
            }
        }

        let payload = dest.join("[0]");
        if !payload.exists() {
            // Flat package: the outer layer already was the content.
            return Ok(());
        }

        debug!(payload = %payload.display(), "extracting inner payload");

        if let Some(cabextract) = &self.toolbox.cabextract {
            let mut cmd = Command::new(cabextract);
            cmd.arg("-d").arg(dest).arg(&payload);
            if self.inner_stage(cmd, "cabextract", dest)? {
                return Ok(());
            }
        }

        if let Some(innoextract) = &self.toolbox.innoextract {
            let mut cmd = Command::new(innoextract);
            cmd.arg("-d").arg(dest).arg(&payload);
            if self.inner_stage(cmd, "innoextract", dest)? {
                return Ok(());
            }
        }

        let mut cmd = Command::new(&self.toolbox.seven_zip);
        cmd.arg("x")
            .arg("-y")
            .arg(format!("-o{}", dest.display()))
            .arg("-t*")
            .arg(&payload);
        if self.inner_stage(cmd, "7z", dest)? {
            return Ok(());
        }

        Err(ExtractError::StageFailed {
            package: package.to_path_buf(),
            reason: "inner payload could not be extracted; install cabextract and \
                     innoextract, or run the package with /VERYSILENT /DIR=<dir> on Windows"
                .to_string(),
        })
    }

    /// Run one inner-stage tool; `Ok(true)` means it succeeded and the
    /// artifacts were cleaned up.
    #[cfg(unix)]
    fn inner_stage(
        &self,
        command: Command,
        tool_name: &str,
        dest: &Path,
    ) -> Result<bool, ExtractError> {
        match run_with_timeout(command, tool_name, INNER_STAGE_TIMEOUT)? {
            ToolOutcome::Success => {
                cleanup_artifacts(dest);
                Ok(true)
            }
            ToolOutcome::TimedOut => Err(ExtractError::Timeout {
                tool: tool_name.to_string(),
                seconds: INNER_STAGE_TIMEOUT.as_secs(),
            }),
            ToolOutcome::Failed { stderr, .. } => {
                debug!(tool = tool_name, stderr = %first_line(&stderr), "inner stage attempt failed");
                Ok(false)
            }
        }
    }

    #[cfg(not(unix))]
    fn extract_windows(&self, package: &Path, dest: &Path) -> Result<(), ExtractError> {
        let tool_name = package
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "package".to_string());

        let mut silent = Command::new(package);
        silent.arg("/VERYSILENT").arg(format!("/DIR={}", dest.display()));
        if self.self_extract_stage(silent, &tool_name, dest)? {
            return Ok(());
        }

        let mut extract = Command::new(package);
        extract.arg(format!("/extract:{}", dest.display()));
        if self.self_extract_stage(extract, &tool_name, dest)? {
            return Ok(());
        }

        Err(ExtractError::StageFailed {
            package: package.to_path_buf(),
            reason: "self-extraction failed with both /VERYSILENT and /extract".to_string(),
        })
    }

    /// Run one self-extractor invocation. Exit 0 or a non-empty destination
    /// both count as success.
    #[cfg(not(unix))]
    fn self_extract_stage(
        &self,
        command: Command,
        tool_name: &str,
        dest: &Path,
    ) -> Result<bool, ExtractError> {
        match run_with_timeout(command, tool_name, INNER_STAGE_TIMEOUT)? {
            ToolOutcome::Success => Ok(true),
            ToolOutcome::TimedOut => Err(ExtractError::Timeout {
                tool: tool_name.to_string(),
                seconds: INNER_STAGE_TIMEOUT.as_secs(),
            }),
            ToolOutcome::Failed { .. } => dir_has_entries(dest),
        }
    }
}

/// Whether `path` is a directory with at least one entry.
fn dir_has_entries(path: &Path) -> Result<bool, ExtractError> {
    if !path.exists() {
        return Ok(false);
    }
    let mut entries = fs::read_dir(path).map_err(|e| ExtractError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(entries.next().is_some())
}

/// Remove outer-stage leftovers from a successfully extracted directory.
fn cleanup_artifacts(dest: &Path) {
    for name in ARTIFACT_NAMES {
        let artifact = dest.join(name);
        if artifact.exists() {
            fs::remove_file(&artifact).ok();
        }
    }
}

/// Count `.inf` driver definition files under `dir`, recursively.
pub fn count_inf_files(dir: &Path) -> usize {
    let mut count = 0;
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            count += count_inf_files(&path);
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("inf"))
        {
            count += 1;
        }
    }
    count
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}
