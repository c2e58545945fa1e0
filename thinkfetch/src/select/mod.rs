//! Driver selection: category filtering and SCCM package selection.
//!
//! Two independent selection modes, composable with the catalog but not
//! with each other in a single run:
//!
//! - **Category filter**: case-insensitive exact match against an
//!   allow-list; an empty allow-list means "all".
//! - **SCCM filter + index selection**: picks deployment-package records
//!   by title marker, narrows their files to `.exe` downloads, and lets
//!   the caller choose from a 1-indexed listing.
//!
//! Interactive prompting lives in the CLI; the library only defines the
//! [`SelectionProvider`] contract and the input grammar, so test doubles
//! and preset index sets share the exact same parsing and validation.

mod filter;
mod provider;

pub use filter::{filter_by_category, sccm_packages};
pub use provider::{parse_selection, PresetSelection, Selection, SelectionError, SelectionProvider};
