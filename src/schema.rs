//! # Storage schema (C4)
//!
//! Defines the seven normative tables of §4.4, the legacy wide-column
//! fallback schema and its one-way conversion, and the
//! `Version_Info`/`Log_Entries` audit tables.

mod error;
pub mod legacy;
pub mod tables;
pub mod version;


pub use error::SchemaError;
pub use tables::{
    create_modern_tables, has_modern_tables, table_exists, BIN_INTENSITIES, FRAME_PARAMS,
    FRAME_PARAM_KEYS, FRAME_SCANS, GLOBAL_PARAMS, LOG_ENTRIES, VERSION_INFO, V_FRAME_PARAMS,
};

use rusqlite::Connection;

/// Legacy files recorded MS1 as `0`; modern files record it as `1`
/// (`FrameType::Ms1`). On open, scan the distinct `FrameType` values
/// actually present: if both `0` and `1` appear, the file is inconsistent
/// and open must fail (§4.6, §8 boundary behavior).
///
/// Returns `true` if the file uses the legacy `MS1 == 0` encoding (the
/// caller should then remap every `FrameType` value it reads by adding 0,
/// i.e. treat 0 as MS1 -- see [`normalize_frame_type`]).
pub fn detect_legacy_frame_type_encoding(conn: &Connection) -> Result<bool, SchemaError> {
    let frame_type_param_id = crate::params::FrameParamKey::FrameType.id();
    let mut stmt = conn.prepare(
        "SELECT DISTINCT CAST(ParamValue AS INTEGER) FROM Frame_Params WHERE ParamID = ?1",
    )?;
    let values: Vec<i64> = stmt
        .query_map([frame_type_param_id], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let has_zero = values.contains(&0);
    let has_one = values.contains(&1);
    if has_zero && has_one {
        return Err(SchemaError::MixedFrameTypeEncoding);
    }
    Ok(has_zero)
}

/// Remap a raw stored `FrameType` value so that `MS1 == 1` regardless of
/// whether the file used the legacy `0` encoding.
pub fn normalize_frame_type(raw: i64, legacy_ms1_is_zero: bool) -> i64 {
    if legacy_ms1_is_zero && raw == 0 {
        1
    } else {
        raw
    }
}
