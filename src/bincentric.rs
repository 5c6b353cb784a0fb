//! Offline bin-centric index builder (C8).
//!
//! `Frame_Scans` is scan-centric: one row per `(frame, scan)`, intensities
//! keyed by TOF bin. Extracted-ion-chromatogram queries instead want all
//! intensities for one bin across every frame/scan, which means decoding
//! every scan's blob to find their handful of matching bins. The
//! bin-centric index inverts that: one row per bin in `Bin_Intensities`,
//! holding intensities for every `(frame, scan)` in acquisition order,
//! RLE/LZF-encoded exactly like a scan's blob but with the sequential
//! `(frame, scan)` position standing in for the TOF bin.
//!
//! Building the index requires decoding the entire scan-centric dataset at
//! once, so intermediate `(bin, position, intensity)` triples are staged in
//! an on-disk SQLite file (via `tempfile`) rather than held in memory.

use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension};
use tempfile::NamedTempFile;

use crate::codec;
use crate::params::FrameParamKey;
use crate::schema::tables::{self, BIN_INTENSITIES, FRAME_PARAMS, FRAME_SCANS};
use crate::types::IntensityType;

/// Errors from building or querying the bin-centric index.
#[derive(Debug, thiserror::Error)]
pub enum BinCentricError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("schema error: {0}")]
    Schema(#[from] crate::schema::SchemaError),

    #[error("codec error: {0}")]
    Codec(#[from] codec::CodecError),

    #[error("failed to create staging file: {0}")]
    Staging(#[from] std::io::Error),

    #[error("Bin_Intensities already contains {0} rows; drop them before rebuilding")]
    AlreadyBuilt(i64),
}

/// Rebuild `Bin_Intensities` from the current contents of `Frame_Scans`.
/// Refuses to run over an already-populated index; callers that want a
/// rebuild call [`clear`] first.
pub fn build(conn: &mut Connection, intensity_type: IntensityType) -> Result<(), BinCentricError> {
    tables::create_modern_tables(conn, intensity_type)?;

    let existing: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {BIN_INTENSITIES}"),
        [],
        |row| row.get(0),
    )?;
    if existing > 0 {
        return Err(BinCentricError::AlreadyBuilt(existing));
    }

    let staging_file = NamedTempFile::new()?;
    let staging_path = staging_file.path().to_string_lossy().into_owned();
    log::info!("staging bin-centric index at {staging_path}");

    conn.execute("ATTACH DATABASE ?1 AS bincentric_staging", params![staging_path])?;
    let result = build_inner(conn);
    conn.execute_batch("DETACH DATABASE bincentric_staging").ok();
    result
}

fn build_inner(conn: &Connection) -> Result<(), BinCentricError> {
    conn.execute_batch(
        "CREATE TABLE bincentric_staging.staged (
            MzBin INTEGER NOT NULL,
            Position INTEGER NOT NULL,
            Intensity INTEGER NOT NULL
        );
        CREATE INDEX bincentric_staging.ix_staged_bin ON staged(MzBin, Position);",
    )?;

    stage_scans(conn)?;
    drain_staged_bins(conn)?;
    Ok(())
}

/// Position every `(frame, scan)` pair the same way
/// [`crate::reader::Reader::get_xic`]'s bin-centric path inverts them:
/// `entry_index = frame_ordinal * scans_per_frame + scan_num`, where
/// `frame_ordinal` is the frame's index into the dataset-wide,
/// `FrameNum`-ordered frame list and `scans_per_frame` is a single value
/// for the whole dataset (§4.8). A plain per-row counter would desync the
/// moment a scan is empty and writes no `Frame_Scans` row (§4.5).
fn stage_scans(conn: &Connection) -> Result<(), BinCentricError> {
    let scans_per_frame = dataset_scans_per_frame(conn)?.max(1);

    let mut select_frames =
        conn.prepare(&format!("SELECT DISTINCT FrameNum FROM {FRAME_SCANS} ORDER BY FrameNum"))?;
    let frame_ordinals: HashMap<i64, i64> = select_frames
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?
        .into_iter()
        .enumerate()
        .map(|(ordinal, frame_num)| (frame_num, ordinal as i64))
        .collect();

    let mut select_scans = conn.prepare(&format!(
        "SELECT FrameNum, ScanNum, Intensities FROM {FRAME_SCANS} ORDER BY FrameNum, ScanNum"
    ))?;
    let mut insert_staged =
        conn.prepare("INSERT INTO bincentric_staging.staged (MzBin, Position, Intensity) VALUES (?1, ?2, ?3)")?;

    let mut rows = select_scans.query([])?;
    while let Some(row) = rows.next()? {
        let frame_num: i64 = row.get(0)?;
        let scan_num: i64 = row.get(1)?;
        let blob: Vec<u8> = row.get(2)?;
        let decoded = codec::decode_blob(&blob)?;
        let frame_ordinal = frame_ordinals[&frame_num];
        let position = frame_ordinal * scans_per_frame + scan_num;
        for (bin, intensity) in decoded.pairs {
            insert_staged.execute(params![bin, position, intensity])?;
        }
    }
    Ok(())
}

/// A single dataset-wide scan count, taken from the lowest-numbered frame's
/// `Scans` parameter -- the same reference-frame convention
/// [`crate::reader::Reader::get_xic`] uses to pick one `scans_per_frame`
/// value for the whole bin-centric position formula.
fn dataset_scans_per_frame(conn: &Connection) -> Result<i64, BinCentricError> {
    let scans_param_id = FrameParamKey::Scans.id();
    let value = conn
        .query_row(
            &format!(
                "SELECT CAST(fp.ParamValue AS DOUBLE) FROM {FRAME_PARAMS} fp
                 WHERE fp.ParamID = ?1
                 ORDER BY fp.FrameNum ASC
                 LIMIT 1"
            ),
            params![scans_param_id],
            |row| row.get::<_, f64>(0),
        )
        .optional()?;
    Ok(value.unwrap_or(0.0) as i64)
}

fn drain_staged_bins(conn: &Connection) -> Result<(), BinCentricError> {
    let mut select_bins = conn.prepare("SELECT DISTINCT MzBin FROM bincentric_staging.staged ORDER BY MzBin")?;
    let bins: Vec<u32> = select_bins
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut select_positions = conn.prepare(
        "SELECT Position, Intensity FROM bincentric_staging.staged WHERE MzBin = ?1 ORDER BY Position",
    )?;
    let mut insert_bin = conn.prepare(&format!(
        "INSERT INTO {BIN_INTENSITIES} (MZ_BIN, INTENSITIES) VALUES (?1, ?2)
         ON CONFLICT(MZ_BIN) DO UPDATE SET INTENSITIES = excluded.INTENSITIES"
    ))?;

    for bin in bins {
        let pairs: Vec<(u32, i32)> = select_positions
            .query_map([bin], |row| {
                let position: i64 = row.get(0)?;
                let intensity: i32 = row.get(1)?;
                Ok((position as u32, intensity))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        let encoded = codec::encode_sparse(&pairs, 0)?;
        insert_bin.execute(params![bin, encoded.blob])?;
    }
    Ok(())
}

/// Drop the bin-centric index entirely, e.g. before [`build`] after new
/// frames have been written.
pub fn clear(conn: &Connection) -> Result<(), BinCentricError> {
    conn.execute(&format!("DELETE FROM {BIN_INTENSITIES}"), [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::{NewFrame, Writer, WriterConfig};
    use crate::types::FrameType;

    #[test]
    fn build_inverts_scan_centric_intensities_by_bin() {
        let mut writer = Writer::open(":memory:", WriterConfig::default()).unwrap();
        writer
            .insert_frame(NewFrame {
                frame_num: 1,
                frame_type: FrameType::Ms1,
                scans: 2,
            })
            .unwrap();
        writer.insert_scan_sparse(1, 0, &[(5, 10), (7, 3)], 0).unwrap();
        writer.insert_scan_sparse(1, 1, &[(5, 20)], 0).unwrap();

        build(writer.connection_mut(), IntensityType::Adc32).unwrap();

        let conn = writer.connection();
        let blob: Vec<u8> = conn
            .query_row("SELECT INTENSITIES FROM Bin_Intensities WHERE MZ_BIN = 5", [], |row| row.get(0))
            .unwrap();
        let decoded = codec::decode_blob(&blob).unwrap();
        assert_eq!(decoded.pairs, vec![(0, 10), (1, 20)]);

        let bin_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM Bin_Intensities", [], |row| row.get(0))
            .unwrap();
        assert_eq!(bin_count, 2);
    }

    #[test]
    fn build_positions_entries_by_frame_scan_formula_even_with_skipped_scans() {
        let mut writer = Writer::open(":memory:", WriterConfig::default()).unwrap();
        writer
            .insert_frame(NewFrame {
                frame_num: 1,
                frame_type: FrameType::Ms1,
                scans: 3,
            })
            .unwrap();
        writer.insert_scan_sparse(1, 0, &[(5, 10)], 0).unwrap();
        // scan 1 is empty and writes no Frame_Scans row (§4.5) -- a
        // plain per-row counter would then number frame 2's scans as if
        // frame 1 only had two scans.
        writer.insert_scan_sparse(1, 1, &[], 0).unwrap();
        writer.insert_scan_sparse(1, 2, &[(5, 20)], 0).unwrap();

        writer
            .insert_frame(NewFrame {
                frame_num: 2,
                frame_type: FrameType::Ms1,
                scans: 3,
            })
            .unwrap();
        writer.insert_scan_sparse(2, 0, &[(5, 30)], 0).unwrap();

        build(writer.connection_mut(), IntensityType::Adc32).unwrap();

        let conn = writer.connection();
        let blob: Vec<u8> = conn
            .query_row("SELECT INTENSITIES FROM Bin_Intensities WHERE MZ_BIN = 5", [], |row| row.get(0))
            .unwrap();
        let decoded = codec::decode_blob(&blob).unwrap();
        // frame 1 has 3 scans, so frame 2 scan 0 must land at position
        // 1*3 + 0 = 3, not 2 (which a dense row counter would produce).
        assert_eq!(decoded.pairs, vec![(0, 10), (2, 20), (3, 30)]);
    }

    #[test]
    fn build_refuses_when_already_populated() {
        let mut writer = Writer::open(":memory:", WriterConfig::default()).unwrap();
        writer
            .insert_frame(NewFrame {
                frame_num: 1,
                frame_type: FrameType::Ms1,
                scans: 1,
            })
            .unwrap();
        writer.insert_scan_sparse(1, 0, &[(5, 10)], 0).unwrap();
        build(writer.connection_mut(), IntensityType::Adc32).unwrap();

        let err = build(writer.connection_mut(), IntensityType::Adc32).unwrap_err();
        assert!(matches!(err, BinCentricError::AlreadyBuilt(1)));
    }
}
