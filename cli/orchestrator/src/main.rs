//! safegen CLI
//!
//! This binary provides the main entry point for safegen, offering
//! subcommands to generate a safe build, inline kernel headers into a single
//! file, and write a default configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::io::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use config::Config;
use safegen_cli::{CliError, GenerateRequest};

/// Command-line interface configuration for safegen.
#[derive(Parser, Debug)]
#[command(
    name = "safegen",
    about = "Generate portable single-unit build trees for native PHP extensions",
    version
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
    /// Configuration file (defaults to the user config dir when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log level or filter directive (overrides the configuration)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

/// Available safegen commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the safe build into the output directory
    Generate {
        /// Extension project root (contains ext/ and build/)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Output directory (recreated on every run)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also generate config.w32
        #[arg(long)]
        windows: bool,
        /// Also generate Makefile.frag
        #[arg(long)]
        makefile_frag: bool,
        /// Extension name (e.g. phalcon)
        #[arg(long)]
        extension: Option<String>,
        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Inline `#include "<prefix>..."` directives of one file in place
    Inline {
        file: PathBuf,
        /// Directory the included paths are relative to
        #[arg(long)]
        base: PathBuf,
        #[arg(long, default_value = pipeline::KERNEL_PREFIX)]
        prefix: String,
    },
    /// Write the default configuration file
    InitConfig {
        #[arg(long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Main entry point for the safegen application.
fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("safegen failed: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    logging::init(level, config.logging.file.as_deref())?;

    match cli.cmd {
        Commands::Generate { root, output, windows, makefile_frag, extension, report } => {
            let request = GenerateRequest { root, output, windows, makefile_frag, extension, report };
            print!("Generating safe build... ");
            std::io::stdout().flush().map_err(|e| CliError::Message(e.to_string()))?;
            safegen_cli::generate(&config, &request)?;
            println!("OK");
        }
        Commands::Inline { file, base, prefix } => {
            let count = safegen_cli::inline(&file, &base, &prefix)?;
            println!("Inlined {} header(s) into {}", count, file.display());
        }
        Commands::InitConfig { path, force } => {
            let written = safegen_cli::init_config(path, force)?;
            println!("Configuration written to {}", written.display());
        }
    }
    Ok(())
}
