//! Discovery of the external extraction tools.

use std::path::PathBuf;

use tracing::debug;

use super::error::ExtractError;

/// Candidate binary names for the 7-Zip CLI, in preference order.
const SEVEN_ZIP_CANDIDATES: &[&str] = &["7z", "7zz", "7za"];

/// Resolved paths to the external tools the unix pipeline shells out to.
///
/// On Windows the packages are self-extracting and none of these are
/// needed; detection is only performed where extraction requires it.
#[derive(Debug, Clone)]
pub struct Toolbox {
    pub seven_zip: PathBuf,
    pub cabextract: Option<PathBuf>,
    pub innoextract: Option<PathBuf>,
}

impl Toolbox {
    /// Locate the extraction tools on PATH.
    ///
    /// 7-Zip is mandatory for the first stage; cabextract and innoextract
    /// are optional fallbacks for the inner-payload stage.
    pub fn detect() -> Result<Self, ExtractError> {
        let seven_zip = SEVEN_ZIP_CANDIDATES
            .iter()
            .find_map(|name| which::which(name).ok())
            .ok_or_else(|| ExtractError::ToolMissing {
                tool: "7z".to_string(),
                hint: "install p7zip (e.g. 'apt install p7zip-full' or 'brew install sevenzip')"
                    .to_string(),
            })?;

        let cabextract = which::which("cabextract").ok();
        let innoextract = which::which("innoextract").ok();

        debug!(
            seven_zip = %seven_zip.display(),
            cabextract = cabextract.is_some(),
            innoextract = innoextract.is_some(),
            "extraction tools detected"
        );

        Ok(Self {
            seven_zip,
            cabextract,
            innoextract,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_missing_error_names_remediation() {
        let err = ExtractError::ToolMissing {
            tool: "7z".to_string(),
            hint: "install p7zip".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("7z"));
        assert!(msg.contains("install p7zip"));
    }
}
