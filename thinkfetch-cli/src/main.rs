//! thinkfetch - download Lenovo driver packages by device serial number.

mod commands;
mod error;
mod interact;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

/// Download Lenovo driver packages by device serial number.
#[derive(Debug, Parser)]
#[command(name = "thinkfetch", version, about)]
pub struct Cli {
    /// Lenovo device serial number
    pub serial_number: String,

    /// Output directory for downloaded drivers
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only download specific categories (e.g. -c BIOS -c Audio)
    #[arg(short, long, value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Number of parallel downloads (default: 4)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// List available driver categories without downloading
    #[arg(long)]
    pub list: bool,

    /// Show product info only
    #[arg(long)]
    pub info: bool,

    /// Download only SCCM driver packs (contain .inf files for deployment)
    #[arg(long)]
    pub sccm: bool,

    /// Select specific SCCM packages by number (e.g. --sccm-packages 1,3,5).
    /// Use with --sccm; without it an interactive selection is shown.
    #[arg(long, value_delimiter = ',')]
    pub sccm_packages: Option<Vec<usize>>,

    /// Don't auto-extract SCCM packages (use with --sccm)
    #[arg(long)]
    pub no_extract: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Prompt terminations leave completed files intact; in-flight partial
    // files are the transfer engine's cleanup concern, not ours.
    if let Err(e) = ctrlc::set_handler(|| {
        eprintln!("\nDownload cancelled by user");
        std::process::exit(130);
    }) {
        tracing::warn!(error = %e, "could not install interrupt handler");
    }

    let cli = Cli::parse();

    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
