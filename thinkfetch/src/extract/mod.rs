//! Extraction of downloaded driver packages via external tools.

mod error;
mod pipeline;
mod runner;
mod tools;

pub use error::ExtractError;
pub use pipeline::{count_inf_files, ExtractOutcome, Extractor};
pub use runner::{run_with_timeout, ToolOutcome};
pub use tools::Toolbox;
