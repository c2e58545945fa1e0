//! Record filters for the two selection modes.

use crate::catalog::DriverRecord;

/// Title marker identifying deployment-oriented package records.
const SCCM_MARKER: &str = "sccm";

/// Extension carried by the actual driver pack downloads.
const PACKAGE_EXTENSION: &str = ".exe";

/// Filter records by category, case-insensitively.
///
/// An empty allow-list means "all records". No match yields an empty vec,
/// not an error.
pub fn filter_by_category(records: Vec<DriverRecord>, allow: &[String]) -> Vec<DriverRecord> {
    if allow.is_empty() {
        return records;
    }

    let allow_lower: Vec<String> = allow.iter().map(|c| c.to_lowercase()).collect();
    records
        .into_iter()
        .filter(|r| allow_lower.contains(&r.category.to_lowercase()))
        .collect()
}

/// Select SCCM deployment packages from a driver list.
///
/// A record qualifies when its title contains the marker substring
/// case-insensitively; its files are narrowed to URLs ending in `.exe`
/// (case-insensitive). Records with no surviving files are dropped.
pub fn sccm_packages(records: Vec<DriverRecord>) -> Vec<DriverRecord> {
    records
        .into_iter()
        .filter(|r| r.title.to_lowercase().contains(SCCM_MARKER))
        .filter_map(|mut record| {
            record
                .files
                .retain(|f| f.url.to_lowercase().ends_with(PACKAGE_EXTENSION));
            if record.files.is_empty() {
                None
            } else {
                Some(record)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FileEntry;

    fn record(title: &str, category: &str, urls: &[&str]) -> DriverRecord {
        DriverRecord {
            title: title.to_string(),
            category: category.to_string(),
            version: String::new(),
            release_date: String::new(),
            files: urls
                .iter()
                .map(|url| FileEntry {
                    url: url.to_string(),
                    name: String::new(),
                    size: 0,
                    sha256: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_category_filter_case_insensitive() {
        let records = vec![
            record("A", "BIOS", &["https://h/a.exe"]),
            record("B", "Audio", &["https://h/b.exe"]),
        ];
        let filtered = filter_by_category(records, &["bios".to_string()]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "A");
    }

    #[test]
    fn test_category_filter_empty_allow_list_means_all() {
        let records = vec![
            record("A", "BIOS", &["https://h/a.exe"]),
            record("B", "Audio", &["https://h/b.exe"]),
        ];
        assert_eq!(filter_by_category(records, &[]).len(), 2);
    }

    #[test]
    fn test_category_filter_no_match_is_empty_not_error() {
        let records = vec![record("A", "BIOS", &["https://h/a.exe"])];
        let filtered = filter_by_category(records, &["Networking".to_string()]);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_sccm_filter_by_title_marker() {
        let records = vec![
            record("SCCM Package for Windows 11", "Enterprise", &["https://h/pack.exe"]),
            record("BIOS Update", "BIOS", &["https://h/bios.exe"]),
        ];
        let packages = sccm_packages(records);
        assert_eq!(packages.len(), 1);
        assert!(packages[0].title.contains("SCCM"));
    }

    #[test]
    fn test_sccm_filter_narrows_to_exe() {
        let records = vec![record(
            "sccm pack",
            "Enterprise",
            &["https://h/readme.txt", "https://h/PACK.EXE"],
        )];
        let packages = sccm_packages(records);
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].files.len(), 1);
        assert_eq!(packages[0].files[0].url, "https://h/PACK.EXE");
    }

    #[test]
    fn test_sccm_filter_drops_record_with_no_exe() {
        let records = vec![record("SCCM readme", "Enterprise", &["https://h/readme.txt"])];
        assert!(sccm_packages(records).is_empty());
    }
}
