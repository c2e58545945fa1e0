//! List command - show available driver categories.

use std::collections::BTreeMap;

use thinkfetch::catalog::DriverRecord;

use crate::error::CliError;

/// Print each category with its downloadable file count, sorted by name.
pub fn run(drivers: &[DriverRecord]) -> Result<(), CliError> {
    if drivers.is_empty() {
        println!("No drivers found for this device");
        return Ok(());
    }

    let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
    for driver in drivers {
        *categories.entry(driver.category.as_str()).or_insert(0) += driver.file_count();
    }

    println!();
    println!("Available categories:");
    for (category, count) in &categories {
        println!("  - {}: {} files", category, count);
    }

    Ok(())
}
