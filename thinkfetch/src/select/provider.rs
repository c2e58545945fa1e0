//! Selection input grammar and the pluggable selection provider contract.

use thiserror::Error;

use crate::catalog::DriverRecord;

/// Errors from selection input validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// A token was not a number, `all`, or `none`.
    #[error("invalid selection input: {0}")]
    InvalidInput(String),

    /// A numeric token fell outside the 1-based listing range.
    #[error("invalid package number {index}: must be between 1 and {len}")]
    OutOfRange {
        /// The 1-based index the user supplied.
        index: i64,
        /// Number of items in the listing.
        len: usize,
    },
}

/// Outcome of a selection: everything, nothing, or specific items.
///
/// Indices are internal 0-based; translation from the user-facing 1-based
/// numbering happens exactly once, in [`parse_selection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// All listed items.
    All,
    /// Operation cancelled; zero side effects.
    None,
    /// Specific items by 0-based index, sorted and deduplicated.
    Indices(Vec<usize>),
}

impl Selection {
    /// Resolve to concrete 0-based indices against a listing of `len` items.
    /// `None` resolves to an empty set.
    pub fn resolve(&self, len: usize) -> Vec<usize> {
        match self {
            Selection::All => (0..len).collect(),
            Selection::None => Vec::new(),
            Selection::Indices(indices) => indices.clone(),
        }
    }
}

/// Parse user selection input against a listing of `len` items.
///
/// Accepted forms: `all`, `none`, the empty string (treated as `all`), or
/// comma-separated 1-based indices such as `1,3`. Any invalid or
/// out-of-range token rejects the entire input. Duplicates are removed and
/// the result is sorted.
pub fn parse_selection(input: &str, len: usize) -> Result<Selection, SelectionError> {
    let input = input.trim().to_lowercase();

    if input == "none" {
        return Ok(Selection::None);
    }
    if input == "all" || input.is_empty() {
        return Ok(Selection::All);
    }

    let mut indices = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let number: i64 = token
            .parse()
            .map_err(|_| SelectionError::InvalidInput(token.to_string()))?;
        if number < 1 || number as usize > len {
            return Err(SelectionError::OutOfRange { index: number, len });
        }
        // 1-based user numbering → 0-based internal addressing.
        indices.push((number - 1) as usize);
    }

    if indices.is_empty() {
        return Err(SelectionError::InvalidInput(input));
    }

    indices.sort_unstable();
    indices.dedup();
    Ok(Selection::Indices(indices))
}

/// The pluggable selection capability.
///
/// Implementations: the CLI's interactive prompt, [`PresetSelection`] for
/// non-interactive runs, and programmatic test doubles.
pub trait SelectionProvider {
    /// Choose a subset of the presented packages.
    fn select(&self, packages: &[DriverRecord]) -> Result<Selection, SelectionError>;
}

/// Non-interactive provider backed by caller-supplied 1-based indices.
///
/// Out-of-range indices are a hard validation error, returned before any
/// I/O — there is no re-prompt in this mode.
#[derive(Debug, Clone)]
pub struct PresetSelection {
    indices: Vec<usize>,
}

impl PresetSelection {
    /// Create from user-facing 1-based indices.
    pub fn from_one_based(indices: &[usize]) -> Self {
        Self {
            indices: indices.to_vec(),
        }
    }
}

impl SelectionProvider for PresetSelection {
    fn select(&self, packages: &[DriverRecord]) -> Result<Selection, SelectionError> {
        let mut resolved = Vec::with_capacity(self.indices.len());
        for &index in &self.indices {
            if index < 1 || index > packages.len() {
                return Err(SelectionError::OutOfRange {
                    index: index as i64,
                    len: packages.len(),
                });
            }
            resolved.push(index - 1);
        }
        resolved.sort_unstable();
        resolved.dedup();
        Ok(Selection::Indices(resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FileEntry;

    fn packages(n: usize) -> Vec<DriverRecord> {
        (0..n)
            .map(|i| DriverRecord {
                title: format!("SCCM pack {}", i + 1),
                category: "Enterprise".to_string(),
                version: String::new(),
                release_date: String::new(),
                files: vec![FileEntry {
                    url: format!("https://h/p{}.exe", i + 1),
                    name: String::new(),
                    size: 0,
                    sha256: None,
                }],
            })
            .collect()
    }

    #[test]
    fn test_parse_comma_separated_translates_to_zero_based() {
        let selection = parse_selection("1,3", 5).unwrap();
        assert_eq!(selection, Selection::Indices(vec![0, 2]));
    }

    #[test]
    fn test_parse_zero_is_out_of_range() {
        let err = parse_selection("0", 5).unwrap_err();
        assert_eq!(err, SelectionError::OutOfRange { index: 0, len: 5 });
    }

    #[test]
    fn test_parse_past_end_is_out_of_range() {
        let err = parse_selection("6", 5).unwrap_err();
        assert_eq!(err, SelectionError::OutOfRange { index: 6, len: 5 });
    }

    #[test]
    fn test_parse_all_and_empty() {
        assert_eq!(parse_selection("all", 5).unwrap(), Selection::All);
        assert_eq!(parse_selection("", 5).unwrap(), Selection::All);
        assert_eq!(parse_selection("ALL", 5).unwrap(), Selection::All);
    }

    #[test]
    fn test_parse_none_cancels() {
        let selection = parse_selection("none", 5).unwrap();
        assert_eq!(selection, Selection::None);
        assert!(selection.resolve(5).is_empty());
    }

    #[test]
    fn test_parse_non_numeric_rejects_whole_input() {
        let err = parse_selection("1,x,3", 5).unwrap_err();
        assert!(matches!(err, SelectionError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_dedups_and_sorts() {
        let selection = parse_selection("3, 1, 3", 5).unwrap();
        assert_eq!(selection, Selection::Indices(vec![0, 2]));
    }

    #[test]
    fn test_selection_resolve_all() {
        assert_eq!(Selection::All.resolve(3), vec![0, 1, 2]);
    }

    #[test]
    fn test_preset_selection_valid() {
        let provider = PresetSelection::from_one_based(&[1, 3]);
        let selection = provider.select(&packages(5)).unwrap();
        assert_eq!(selection, Selection::Indices(vec![0, 2]));
    }

    #[test]
    fn test_preset_selection_out_of_range_is_hard_error() {
        let provider = PresetSelection::from_one_based(&[7]);
        let err = provider.select(&packages(5)).unwrap_err();
        assert_eq!(err, SelectionError::OutOfRange { index: 7, len: 5 });
    }
}
