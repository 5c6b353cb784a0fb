//! # imstof-convert
//!
//! A thin command-line wrapper over the `imstof_store` library: create a
//! new file, print its global parameters, or rebuild the bin-centric
//! index.
//!
//! ## Usage
//!
//! ```bash
//! imstof-convert create dataset.uimf
//! imstof-convert info dataset.uimf
//! imstof-convert bin-centric-build dataset.uimf
//! ```

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
