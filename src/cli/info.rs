use std::path::PathBuf;

use anyhow::{Context, Result};
use imstof_store::reader::{Reader, ReaderConfig};

/// Print global parameters and the frame count of an IMS-TOF file.
pub fn run(file: PathBuf) -> Result<()> {
    let reader = Reader::open(&file, ReaderConfig::default())
        .with_context(|| format!("failed to open {}", file.display()))?;

    println!("IMS-TOF File Information");
    println!("========================");
    println!("File: {}", file.display());
    println!("Frames: {}", reader.frame_count()?);
    println!();
    println!("Global parameters:");
    for (name, value) in reader.all_global_params()? {
        println!("  {name} = {value}");
    }
    Ok(())
}
