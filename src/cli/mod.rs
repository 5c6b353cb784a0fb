//! Thin command-line wrapper over the library (§6 "callers may layer a CLI
//! over the library"). Subcommands only call public `imstof_store` API;
//! none of the engine's logic lives here.

mod bin_centric_build;
mod create;
mod info;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// imstof-convert - inspect and build IMS-TOF storage files
#[derive(Parser)]
#[command(name = "imstof-convert")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create (or open) a file and ensure its modern tables exist
    Create {
        /// Path to the IMS-TOF file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print global parameters and a frame/scan summary
    Info {
        /// Path to the IMS-TOF file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Rebuild the bin-centric index from the current scan-centric data
    BinCentricBuild {
        /// Path to the IMS-TOF file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Create { file } => create::run(file),
        Commands::Info { file } => info::run(file),
        Commands::BinCentricBuild { file } => bin_centric_build::run(file),
    }
}
