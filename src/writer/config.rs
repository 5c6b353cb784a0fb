use std::time::Duration;

use crate::types::IntensityType;

/// Configuration for [`super::Writer`] (§5 "Writer behavior").
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// How often buffered writes are flushed to disk with an explicit
    /// `PRAGMA wal_checkpoint`. Smaller values bound data loss on crash at
    /// the cost of more I/O.
    pub flush_interval: Duration,

    /// How long to wait before retrying when the underlying SQLite file is
    /// locked by another process (`SQLITE_BUSY`).
    pub reopen_delay: Duration,

    /// The intensity representation new frames are assumed to use. Only
    /// consulted when creating a brand-new file; an existing file's
    /// `TOFIntensityType` global parameter always wins.
    pub intensity_type: IntensityType,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            flush_interval: Duration::from_secs(5),
            reopen_delay: Duration::from_millis(100),
            intensity_type: IntensityType::Adc32,
        }
    }
}

impl WriterConfig {
    /// Configuration tuned for bulk conversion jobs: longer flush interval,
    /// since a crash mid-conversion simply restarts the run.
    pub fn bulk_conversion() -> Self {
        Self {
            flush_interval: Duration::from_secs(30),
            ..Self::default()
        }
    }
}
