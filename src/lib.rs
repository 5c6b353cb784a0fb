//! # imstof-store
//!
//! Storage engine and query library for ion mobility spectrometry
//! time-of-flight (IMS-TOF) datasets, backed by a single embedded SQLite
//! file.
//!
//! ## Layout
//!
//! - [`codec`]: the two-layer intensity codec (LZF dictionary compression
//!   over RLE zero-run-encoded words) shared by the scan-centric and
//!   bin-centric tables.
//! - [`params`]: the open-ended global/per-frame parameter model, with its
//!   string coercion rules and legacy column-name aliases.
//! - [`schema`]: the modern key/value table DDL, the legacy wide-column
//!   fallback schema, and the one-way conversion between them.
//! - [`calibration`]: bin-to-m/z conversion and pressure-corrected drift
//!   time.
//! - [`writer`]: the mutating half of the API -- creating files, writing
//!   parameters and scans, building the bin-centric index.
//! - [`reader`]: the query half of the API -- spectra, TIC/BPI, XIC, 3D
//!   elution profiles, drift time.
//! - [`bincentric`]: the offline builder that inverts `Frame_Scans` into
//!   `Bin_Intensities`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use imstof_store::writer::{NewFrame, Writer, WriterConfig};
//! use imstof_store::types::FrameType;
//!
//! let mut writer = Writer::open("example.uimf", WriterConfig::default())?;
//! writer.insert_frame(NewFrame { frame_num: 1, frame_type: FrameType::Ms1, scans: 1 })?;
//! writer.insert_scan_dense(1, 0, &[0, 0, 5, 0, 7])?;
//! writer.flush(true)?;
//! # Ok::<(), imstof_store::writer::WriterError>(())
//! ```

#![allow(clippy::too_many_arguments)]

pub mod bincentric;
pub mod calibration;
pub mod codec;
pub mod params;
pub mod reader;
pub mod schema;
pub mod types;
pub mod writer;

/// Re-exports of the most commonly used types.
pub mod prelude {
    pub use crate::calibration::{Calibration, CalibrationError};
    pub use crate::codec::{CodecError, DecodedScan, EncodedScan};
    pub use crate::params::{FrameParamKey, GlobalParamKey, ParamDataType, ParamValue};
    pub use crate::reader::{Reader, ReaderConfig, ReaderError, XicPoint};
    pub use crate::schema::SchemaError;
    pub use crate::types::{FrameType, InstrumentClass, IntensityType, PressureUnits, ToleranceType};
    pub use crate::writer::{NewFrame, Writer, WriterConfig, WriterError};
}
