//! CLI command dispatch.

mod download;
mod info;
mod list;
mod sccm;

use std::path::PathBuf;
use std::time::Duration;

use thinkfetch::catalog::{CatalogResolver, ClientConfig, ReqwestCatalogClient};
use thinkfetch::config::ConfigFile;

use crate::error::CliError;
use crate::Cli;

/// Run the command selected by the parsed arguments.
pub fn run(cli: Cli) -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();

    let workers = cli.workers.unwrap_or(config.workers);
    if workers == 0 {
        return Err(CliError::Config(
            "workers must be at least 1".to_string(),
        ));
    }

    let serial = normalize_serial(&cli.serial_number)?;
    let output_dir = resolve_output_dir(&cli, &config, &serial);
    let timeout = Duration::from_secs(config.timeout_secs);

    let client_config = ClientConfig::default();
    let client = ReqwestCatalogClient::new(&client_config)?;
    let resolver = CatalogResolver::with_base_url(client, config.base_url.clone());

    println!("Looking up product for serial {}...", serial);
    let product = resolver.resolve(&serial)?;
    println!("Found: {} (product id {})", product.name, product.id);

    if cli.info {
        info::run(&product)
    } else if cli.list {
        let drivers = resolver.list_drivers(&product)?;
        list::run(&drivers)
    } else if cli.sccm {
        let drivers = resolver.list_drivers(&product)?;
        sccm::run(sccm::SccmArgs {
            drivers,
            output_dir,
            timeout,
            client_config: &client_config,
            preset: cli.sccm_packages.as_deref(),
            extract: !cli.no_extract,
        })
    } else {
        let drivers = resolver.list_drivers(&product)?;
        download::run(download::DownloadArgs {
            serial: serial.as_str(),
            product: &product,
            drivers,
            categories: &cli.categories,
            output_dir,
            workers,
            timeout,
            client_config: &client_config,
        })
    }
}

/// Absolute-path display, falling back to the raw path when it cannot be
/// canonicalized (e.g. not created yet).
pub(crate) fn display_absolute(path: &std::path::Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

/// Trim and uppercase the serial; an empty serial is a hard error.
fn normalize_serial(raw: &str) -> Result<String, CliError> {
    let serial = raw.trim().to_uppercase();
    if serial.is_empty() {
        return Err(CliError::Config("serial number must not be empty".to_string()));
    }
    Ok(serial)
}

/// CLI flag wins, then the config file, then `drivers_<SERIAL>`.
fn resolve_output_dir(cli: &Cli, config: &ConfigFile, serial: &str) -> PathBuf {
    cli.output
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from(format!("drivers_{}", serial)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        use clap::Parser;
        Cli::parse_from(args)
    }

    #[test]
    fn test_normalize_serial() {
        assert_eq!(normalize_serial("  pf0abcde ").unwrap(), "PF0ABCDE");
        assert!(normalize_serial("   ").is_err());
    }

    #[test]
    fn test_output_dir_precedence() {
        let config = ConfigFile::default();

        let c = cli(&["thinkfetch", "PF0ABCDE", "-o", "/tmp/out"]);
        assert_eq!(
            resolve_output_dir(&c, &config, "PF0ABCDE"),
            PathBuf::from("/tmp/out")
        );

        let c = cli(&["thinkfetch", "PF0ABCDE"]);
        assert_eq!(
            resolve_output_dir(&c, &config, "PF0ABCDE"),
            PathBuf::from("drivers_PF0ABCDE")
        );

        let mut with_dir = ConfigFile::default();
        with_dir.output_dir = Some(PathBuf::from("/srv/drivers"));
        assert_eq!(
            resolve_output_dir(&c, &with_dir, "PF0ABCDE"),
            PathBuf::from("/srv/drivers")
        );
    }

    #[test]
    fn test_sccm_package_flag_parses_comma_list() {
        let c = cli(&["thinkfetch", "PF0ABCDE", "--sccm", "--sccm-packages", "1,3,5"]);
        assert!(c.sccm);
        assert_eq!(c.sccm_packages, Some(vec![1, 3, 5]));
    }

    #[test]
    fn test_categories_flag_parses_comma_list() {
        let c = cli(&["thinkfetch", "PF0ABCDE", "-c", "BIOS,Audio"]);
        assert_eq!(c.categories, vec!["BIOS", "Audio"]);
    }
}
