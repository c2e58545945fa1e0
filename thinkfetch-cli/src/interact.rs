//! Interactive package selection on stdin.

use std::io::{self, Write};

use thinkfetch::catalog::DriverRecord;
use thinkfetch::select::{parse_selection, Selection, SelectionError, SelectionProvider};

/// Stdin-backed selection with a re-prompt loop.
///
/// Malformed input is recoverable here: the user is told what went wrong
/// and asked again. EOF on stdin is treated as cancellation.
pub struct StdinSelection;

impl SelectionProvider for StdinSelection {
    fn select(&self, packages: &[DriverRecord]) -> Result<Selection, SelectionError> {
        println!();
        println!("Select packages to download:");
        println!("  - Enter package numbers separated by commas (e.g. 1,3,5)");
        println!("  - Enter 'all' to download all packages");
        println!("  - Enter 'none' to cancel");

        loop {
            print!("\nYour selection: ");
            io::stdout().flush().ok();

            let mut input = String::new();
            match io::stdin().read_line(&mut input) {
                Ok(0) | Err(_) => return Ok(Selection::None),
                Ok(_) => {}
            }

            match parse_selection(&input, packages.len()) {
                Ok(selection) => return Ok(selection),
                Err(e) => println!("  {}. Try again.", e),
            }
        }
    }
}
