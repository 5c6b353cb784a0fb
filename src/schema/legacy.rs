//! Legacy fixed-column schema and its one-way conversion to the modern
//! key/value layout (§4.4).
//!
//! The legacy `Global_Parameters`/`Frame_Parameters` tables are wide,
//! fixed-column tables from schema versions that predate the modern
//! key/value layout. `convert_legacy_to_modern` reads every legacy row
//! through a generic `PRAGMA table_info` + `SELECT *` pass, maps each
//! column name to a parameter key via [`FrameParamKey::from_name`] /
//! [`GlobalParamKey::from_name`] (which already falls back through the
//! alias table), and inserts the equivalent modern rows. It never runs
//! more than once: [`super::tables::has_modern_tables`] gates the call.

use rusqlite::types::ValueRef;
use rusqlite::Connection;

use super::error::SchemaError;
use super::tables::{create_modern_tables, table_exists};
use crate::params::{FrameParamKey, GlobalParamKey};
use crate::types::IntensityType;

pub const GLOBAL_PARAMETERS: &str = "Global_Parameters";
pub const FRAME_PARAMETERS: &str = "Frame_Parameters";

/// Create the legacy wide-column tables. Only used by tests and the
/// migration fixtures in `tests/end_to_end.rs` — production writers never
/// create legacy tables, only read and convert them.
pub fn create_legacy_tables(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS {GLOBAL_PARAMETERS} (
            DateStarted TEXT,
            NumFrames INTEGER,
            TimeOffset INTEGER,
            BinWidth DOUBLE,
            Bins INTEGER,
            TOFCorrectionTime DOUBLE,
            TOFIntensityType TEXT,
            DatasetType TEXT,
            Instrument_Name TEXT,
            InstrumentClass TEXT
        );

        CREATE TABLE IF NOT EXISTS {FRAME_PARAMETERS} (
            FrameNum INTEGER PRIMARY KEY,
            StartTime DOUBLE,
            Duration DOUBLE,
            Accumulations INTEGER,
            FrameType INTEGER,
            Scans INTEGER,
            AverageTOFLength DOUBLE,
            CalibrationSlope DOUBLE,
            CalibrationIntercept DOUBLE,
            a2 DOUBLE,
            b2 DOUBLE,
            c2 DOUBLE,
            d2 DOUBLE,
            e2 DOUBLE,
            f2 DOUBLE,
            PressureBack DOUBLE,
            Temperature DOUBLE,
            voltEntranceIFTIn DOUBLE,
            voltEntranceIFTOut DOUBLE,
            Decoded INTEGER,
            CalibrationDone INTEGER
        );
        "
    ))?;
    Ok(())
}

fn value_to_text(v: ValueRef<'_>) -> Option<String> {
    match v {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => None,
    }
}

/// Convert a file open with only the legacy tables into the modern
/// key/value layout. No-op (and safe to call again) once the modern
/// tables already exist.
pub fn convert_legacy_to_modern(conn: &Connection, intensity_type: IntensityType) -> Result<(), SchemaError> {
    if super::tables::has_modern_tables(conn)? {
        log::debug!("modern tables already present; legacy conversion is a no-op");
        return Ok(());
    }
    if !table_exists(conn, GLOBAL_PARAMETERS)? && !table_exists(conn, FRAME_PARAMETERS)? {
        return Err(SchemaError::MissingTable(format!(
            "neither modern nor legacy parameter tables are present (expected {} or {})",
            super::tables::FRAME_PARAMS,
            FRAME_PARAMETERS
        )));
    }

    log::info!("converting legacy parameter tables to the modern key/value layout");
    create_modern_tables(conn, intensity_type)?;

    convert_global(conn)?;
    convert_frames(conn)?;
    update_num_frames(conn)?;

    Ok(())
}

fn column_names(conn: &Connection, table: &str) -> Result<Vec<String>, SchemaError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

fn upsert_global_param(conn: &Connection, key: GlobalParamKey, value: &str) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO Global_Params (ParamID, ParamName, ParamValue, ParamDataType, ParamDescription)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(ParamID) DO UPDATE SET ParamValue = excluded.ParamValue",
        rusqlite::params![
            key.id(),
            key.canonical_name(),
            value,
            format!("{:?}", key.data_type()),
            key.description(),
        ],
    )?;
    Ok(())
}

fn ensure_frame_param_key(conn: &Connection, key: FrameParamKey) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT OR IGNORE INTO Frame_Param_Keys (ParamID, ParamName, ParamDataType, ParamDescription)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            key.id(),
            key.canonical_name(),
            format!("{:?}", key.data_type()),
            key.description(),
        ],
    )?;
    Ok(())
}

fn convert_global(conn: &Connection) -> Result<(), SchemaError> {
    if !table_exists(conn, GLOBAL_PARAMETERS)? {
        return Ok(());
    }
    let columns = column_names(conn, GLOBAL_PARAMETERS)?;
    let sql = format!("SELECT * FROM {GLOBAL_PARAMETERS} LIMIT 1");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;

    if let Some(row) = rows.next()? {
        for (idx, col) in columns.iter().enumerate() {
            let Some(key) = GlobalParamKey::from_name(col) else {
                log::warn!("skipping unrecognized legacy Global_Parameters column {col}");
                continue;
            };
            if let Some(text) = value_to_text(row.get_ref(idx)?) {
                upsert_global_param(conn, key, &text)?;
            }
        }
    }
    Ok(())
}

fn convert_frames(conn: &Connection) -> Result<(), SchemaError> {
    if !table_exists(conn, FRAME_PARAMETERS)? {
        return Ok(());
    }
    let columns = column_names(conn, FRAME_PARAMETERS)?;
    let frame_num_idx = columns
        .iter()
        .position(|c| c.eq_ignore_ascii_case("FrameNum"))
        .ok_or_else(|| SchemaError::MissingTable("Frame_Parameters.FrameNum".into()))?;

    let sql = format!("SELECT * FROM {FRAME_PARAMETERS}");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;

    while let Some(row) = rows.next()? {
        let frame_num: i64 = row.get(frame_num_idx)?;
        for (idx, col) in columns.iter().enumerate() {
            if idx == frame_num_idx {
                continue;
            }
            let Some(key) = FrameParamKey::from_name(col) else {
                log::warn!("skipping unrecognized legacy Frame_Parameters column {col}");
                continue;
            };
            if let Some(text) = value_to_text(row.get_ref(idx)?) {
                ensure_frame_param_key(conn, key)?;
                conn.execute(
                    "INSERT INTO Frame_Params (FrameNum, ParamID, ParamValue)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(FrameNum, ParamID) DO UPDATE SET ParamValue = excluded.ParamValue",
                    rusqlite::params![frame_num, key.id(), text],
                )?;
            }
        }
    }
    Ok(())
}

fn update_num_frames(conn: &Connection) -> Result<(), SchemaError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(DISTINCT FrameNum) FROM Frame_Params",
        [],
        |row| row.get(0),
    )?;
    upsert_global_param(conn, GlobalParamKey::NumFrames, &count.to_string())?;
    Ok(())
}
