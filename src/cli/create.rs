use std::path::PathBuf;

use anyhow::{Context, Result};
use imstof_store::writer::{Writer, WriterConfig};

/// Open `file`, creating its modern tables (or converting a legacy file)
/// if necessary, then close it.
pub fn run(file: PathBuf) -> Result<()> {
    let mut writer = Writer::open(&file, WriterConfig::default())
        .with_context(|| format!("failed to open {}", file.display()))?;
    writer.create_tables().context("failed to create tables")?;
    writer.flush(true).context("failed to flush")?;
    println!("created/verified IMS-TOF tables in {}", file.display());
    Ok(())
}
