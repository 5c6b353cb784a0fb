use std::path::PathBuf;

use anyhow::{Context, Result};
use imstof_store::types::IntensityType;
use imstof_store::writer::{Writer, WriterConfig};

/// Rebuild `Bin_Intensities` from the current `Frame_Scans` contents.
pub fn run(file: PathBuf) -> Result<()> {
    let mut writer = Writer::open(&file, WriterConfig::bulk_conversion())
        .with_context(|| format!("failed to open {}", file.display()))?;
    writer
        .create_bin_centric_tables(IntensityType::Adc32)
        .context("failed to build bin-centric index")?;
    writer.flush(true).context("failed to flush")?;
    println!("bin-centric index rebuilt for {}", file.display());
    Ok(())
}
