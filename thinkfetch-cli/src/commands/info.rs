//! Info command - show the resolved product descriptor.

use thinkfetch::catalog::ProductDescriptor;

use crate::error::CliError;

/// Print the product descriptor as pretty JSON.
pub fn run(product: &ProductDescriptor) -> Result<(), CliError> {
    println!();
    println!("Product information:");
    match serde_json::to_string_pretty(product) {
        Ok(json) => println!("{}", json),
        Err(_) => println!("{} ({})", product.name, product.id),
    }
    Ok(())
}
