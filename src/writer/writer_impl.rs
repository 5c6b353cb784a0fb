use std::path::Path;
use std::time::Instant;

use rusqlite::{params, Connection, OptionalExtension};

use crate::calibration::Calibration;
use crate::params::{FrameParamKey, GlobalParamKey, ParamValue};
use crate::schema;
use crate::types::{FrameType, IntensityType};

use super::config::WriterConfig;
use super::error::WriterError;
use super::types::NewFrame;

/// Opens (or creates) an IMS-TOF SQLite file and exposes the mutating half
/// of the public API (§5 "Writer behavior").
///
/// A `Writer` holds the one `rusqlite::Connection` that owns the file; it is
/// not `Sync` and callers coordinate concurrent access externally.
pub struct Writer {
    conn: Connection,
    config: WriterConfig,
    last_flush: Instant,
}

impl Writer {
    /// Open `path`, creating the modern tables if the file is new, or
    /// converting an existing legacy file in place.
    pub fn open(path: impl AsRef<Path>, config: WriterConfig) -> Result<Self, WriterError> {
        let mut conn = Connection::open(path)?;
        conn.busy_timeout(config.reopen_delay)?;
        schema::version::apply_migrations(&mut conn)?;

        if schema::tables::has_modern_tables(&conn)? {
            log::debug!("opening existing modern-schema file");
        } else if schema::legacy::table_exists(&conn, schema::legacy::FRAME_PARAMETERS)? {
            log::info!("legacy schema detected on open; converting to modern layout");
            schema::legacy::convert_legacy_to_modern(&conn, config.intensity_type)?;
        } else {
            log::info!("creating modern tables for a new file");
            schema::tables::create_modern_tables(&conn, config.intensity_type)?;
        }

        Ok(Self {
            conn,
            config,
            last_flush: Instant::now(),
        })
    }

    /// Explicitly (re)create the modern tables. Idempotent; mostly useful
    /// for tests and the `imstof-convert create` subcommand.
    pub fn create_tables(&self) -> Result<(), WriterError> {
        log::info!("create_tables (intensity_type={:?})", self.config.intensity_type);
        schema::tables::create_modern_tables(&self.conn, self.config.intensity_type)?;
        Ok(())
    }

    pub fn add_update_global(&self, key: GlobalParamKey, value: &ParamValue) -> Result<(), WriterError> {
        self.conn.execute(
            "INSERT INTO Global_Params (ParamID, ParamName, ParamValue, ParamDataType, ParamDescription)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(ParamID) DO UPDATE SET ParamValue = excluded.ParamValue",
            params![
                key.id(),
                key.canonical_name(),
                value.to_storage_string(),
                format!("{:?}", key.data_type()),
                key.description(),
            ],
        )?;
        Ok(())
    }

    /// Register a frame's fixed metadata (`FrameType`, `Scans`) as ordinary
    /// frame parameters -- there is no separate `Frames` table (§4.4).
    pub fn insert_frame(&self, frame: NewFrame) -> Result<(), WriterError> {
        self.add_update_frame_parameter(
            frame.frame_num,
            FrameParamKey::FrameType,
            &ParamValue::Int(frame.frame_type as i32),
        )?;
        self.add_update_frame_parameter(
            frame.frame_num,
            FrameParamKey::Scans,
            &ParamValue::Int(frame.scans as i32),
        )?;
        Ok(())
    }

    pub fn add_update_frame_parameter(
        &self,
        frame_num: i64,
        key: FrameParamKey,
        value: &ParamValue,
    ) -> Result<(), WriterError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO Frame_Param_Keys (ParamID, ParamName, ParamDataType, ParamDescription)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                key.id(),
                key.canonical_name(),
                format!("{:?}", key.data_type()),
                key.description(),
            ],
        )?;
        self.conn.execute(
            "INSERT INTO Frame_Params (FrameNum, ParamID, ParamValue)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(FrameNum, ParamID) DO UPDATE SET ParamValue = excluded.ParamValue",
            params![frame_num, key.id(), value.to_storage_string()],
        )?;
        Ok(())
    }

    /// Set the `FragmentationProfile` frame parameter from its ordered
    /// double sequence, Base64-encoding it into the stored text column
    /// (§3 "Frame parameters" invariant).
    pub fn set_fragmentation_profile(&self, frame_num: i64, profile: &[f64]) -> Result<(), WriterError> {
        let text = crate::params::fragmentation_profile_to_storage(profile);
        self.add_update_frame_parameter(frame_num, FrameParamKey::FragmentationProfile, &ParamValue::String(text))
    }

    /// Encode and store a sparse `(bin, intensity)` scan. Bins must be
    /// strictly increasing (§4.2). Returns the number of non-zero entries
    /// written; an empty `pairs` is skipped entirely (no row is written)
    /// and returns 0, per §4.5.
    pub fn insert_scan_sparse(
        &mut self,
        frame_num: i64,
        scan_num: u32,
        pairs: &[(u32, i32)],
        time_offset: i32,
    ) -> Result<i32, WriterError> {
        for w in pairs.windows(2) {
            if w[1].0 <= w[0].0 {
                return Err(WriterError::NonIncreasingBins {
                    previous: w[0].0,
                    next: w[1].0,
                });
            }
        }
        if pairs.is_empty() {
            return Ok(0);
        }
        log::debug!("insert_scan frame={frame_num} scan={scan_num} (sparse, {} pairs)", pairs.len());
        let encoded = crate::codec::encode_sparse(pairs, time_offset)?;
        self.store_encoded_scan(frame_num, scan_num, &encoded)?;
        self.maybe_flush()?;
        Ok(encoded.non_zero_count)
    }

    /// Encode and store a dense intensity array (implicit `time_offset = 0`).
    /// Returns the number of non-zero entries written; an all-zero array is
    /// skipped entirely and returns 0, per §4.5.
    pub fn insert_scan_dense(
        &mut self,
        frame_num: i64,
        scan_num: u32,
        intensities: &[i32],
    ) -> Result<i32, WriterError> {
        let encoded = crate::codec::encode_dense(intensities)?;
        if encoded.non_zero_count == 0 {
            return Ok(0);
        }
        log::debug!("insert_scan frame={frame_num} scan={scan_num} (dense, {} bins)", intensities.len());
        self.store_encoded_scan(frame_num, scan_num, &encoded)?;
        self.maybe_flush()?;
        Ok(encoded.non_zero_count)
    }

    /// Encode and store a dense `i16` intensity array -- the TDC-16 writer
    /// path (§4.2 "Int16 dense encoding"). Only meaningful for datasets
    /// whose `TOFIntensityType` global parameter is `TDC-int16`; trailing
    /// zeros after the last positive value are discarded by the encoder.
    pub fn insert_scan_dense_i16(
        &mut self,
        frame_num: i64,
        scan_num: u32,
        intensities: &[i16],
    ) -> Result<i32, WriterError> {
        let encoded = crate::codec::encode_dense_i16(intensities)?;
        if encoded.non_zero_count == 0 {
            return Ok(0);
        }
        log::debug!("insert_scan frame={frame_num} scan={scan_num} (dense i16, {} bins)", intensities.len());
        self.store_encoded_scan(frame_num, scan_num, &encoded)?;
        self.maybe_flush()?;
        Ok(encoded.non_zero_count)
    }

    fn store_encoded_scan(
        &self,
        frame_num: i64,
        scan_num: u32,
        encoded: &crate::codec::EncodedScan,
    ) -> Result<(), WriterError> {
        let calibration = self.read_calibration(frame_num)?;
        let bpi_mz = calibration
            .map(|c| c.bin_to_mz(encoded.bpi_bin))
            .unwrap_or(0.0);

        self.conn.execute(
            "INSERT INTO Frame_Scans (FrameNum, ScanNum, NonZeroCount, BPI, BPI_MZ, TIC, Intensities)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(FrameNum, ScanNum) DO UPDATE SET
                NonZeroCount = excluded.NonZeroCount,
                BPI = excluded.BPI,
                BPI_MZ = excluded.BPI_MZ,
                TIC = excluded.TIC,
                Intensities = excluded.Intensities",
            params![
                frame_num,
                scan_num,
                encoded.non_zero_count,
                encoded.bpi,
                bpi_mz,
                encoded.tic,
                encoded.blob,
            ],
        )?;
        Ok(())
    }

    /// Read a frame's calibration constants from its parameters, falling
    /// back to the dataset's global `BinWidth`/`TOFCorrectionTime`. Returns
    /// `None` when the frame has not been calibrated yet.
    fn read_calibration(&self, frame_num: i64) -> Result<Option<Calibration>, WriterError> {
        let slope = self.frame_param_f64(frame_num, FrameParamKey::CalibrationSlope)?;
        let intercept = self.frame_param_f64(frame_num, FrameParamKey::CalibrationIntercept)?;
        let (Some(slope), Some(intercept)) = (slope, intercept) else {
            return Ok(None);
        };
        let bin_width_ns = self.global_param_f64(GlobalParamKey::BinWidth)?.unwrap_or(1.0);
        let tof_correction_time_ns = self
            .global_param_f64(GlobalParamKey::TofCorrectionTime)?
            .unwrap_or(0.0);

        Ok(Some(Calibration {
            slope,
            intercept,
            a2: self.frame_param_f64(frame_num, FrameParamKey::MassCalibrationCoefficientA2)?.unwrap_or(0.0),
            b2: self.frame_param_f64(frame_num, FrameParamKey::MassCalibrationCoefficientB2)?.unwrap_or(0.0),
            c2: self.frame_param_f64(frame_num, FrameParamKey::MassCalibrationCoefficientC2)?.unwrap_or(0.0),
            d2: self.frame_param_f64(frame_num, FrameParamKey::MassCalibrationCoefficientD2)?.unwrap_or(0.0),
            e2: self.frame_param_f64(frame_num, FrameParamKey::MassCalibrationCoefficientE2)?.unwrap_or(0.0),
            f2: self.frame_param_f64(frame_num, FrameParamKey::MassCalibrationCoefficientF2)?.unwrap_or(0.0),
            bin_width_ns,
            tof_correction_time_ns,
        }))
    }

    fn frame_param_f64(&self, frame_num: i64, key: FrameParamKey) -> Result<Option<f64>, WriterError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT ParamValue FROM Frame_Params WHERE FrameNum = ?1 AND ParamID = ?2",
                params![frame_num, key.id()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(raw.and_then(|text| crate::params::coerce(&text, key.data_type(), true)).and_then(|v| v.as_f64()))
    }

    fn global_param_f64(&self, key: GlobalParamKey) -> Result<Option<f64>, WriterError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT ParamValue FROM Global_Params WHERE ParamID = ?1",
                [key.id()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(raw.and_then(|text| crate::params::coerce(&text, key.data_type(), true)).and_then(|v| v.as_f64()))
    }

    /// Update a frame's calibration coefficients (`CalibrationSlope`,
    /// `CalibrationIntercept`, `a2..f2`), either for one `frame_num` or
    /// (when `frame_num` is `None`) every frame currently in
    /// `Frame_Params` (§4.5's `frame_num|all`). Does not retroactively
    /// recompute any already-stored `BPI_MZ` values; callers that need
    /// that should re-run `insert_scan_*` for affected scans. Sets
    /// `CalibrationDone` when `mark_done` is true.
    pub fn update_calibration_coefficients(
        &self,
        frame_num: Option<i64>,
        calibration: &Calibration,
        mark_done: bool,
    ) -> Result<(), WriterError> {
        let targets = match frame_num {
            Some(n) => vec![n],
            None => {
                let mut stmt = self.conn.prepare("SELECT DISTINCT FrameNum FROM Frame_Params")?;
                stmt.query_map([], |row| row.get(0))?.collect::<Result<Vec<i64>, _>>()?
            }
        };
        let coefficients = [
            (FrameParamKey::CalibrationSlope, calibration.slope),
            (FrameParamKey::CalibrationIntercept, calibration.intercept),
            (FrameParamKey::MassCalibrationCoefficientA2, calibration.a2),
            (FrameParamKey::MassCalibrationCoefficientB2, calibration.b2),
            (FrameParamKey::MassCalibrationCoefficientC2, calibration.c2),
            (FrameParamKey::MassCalibrationCoefficientD2, calibration.d2),
            (FrameParamKey::MassCalibrationCoefficientE2, calibration.e2),
            (FrameParamKey::MassCalibrationCoefficientF2, calibration.f2),
        ];
        for target in targets {
            for (key, value) in coefficients {
                self.add_update_frame_parameter(target, key, &ParamValue::Double(value))?;
            }
            if mark_done {
                self.add_update_frame_parameter(target, FrameParamKey::CalibrationDone, &ParamValue::Bool(true))?;
            }
        }
        Ok(())
    }

    /// Remove every scan row for `frame_num`. When `update_scan_count` is
    /// true, also zero the frame's `Scans` parameter to match (§4.5).
    pub fn delete_frame_scans(&self, frame_num: i64, update_scan_count: bool) -> Result<(), WriterError> {
        self.conn
            .execute("DELETE FROM Frame_Scans WHERE FrameNum = ?1", [frame_num])?;
        if update_scan_count {
            self.add_update_frame_parameter(frame_num, FrameParamKey::Scans, &ParamValue::Int(0))?;
        }
        Ok(())
    }

    /// Remove a frame entirely: its scans and its parameters. When
    /// `update_global` is true, also refreshes `NumFrames` (§4.5).
    pub fn delete_frame(&self, frame_num: i64, update_global: bool) -> Result<(), WriterError> {
        self.delete_frame_scans(frame_num, false)?;
        self.conn
            .execute("DELETE FROM Frame_Params WHERE FrameNum = ?1", [frame_num])?;
        if update_global {
            self.update_global_frame_count()?;
        }
        Ok(())
    }

    /// Remove several frames in one transaction. When `update_global` is
    /// true, `NumFrames` is refreshed once after all deletions, atomically
    /// with them (§5 "ordering guarantees").
    pub fn delete_frames(&self, frame_nums: &[i64], update_global: bool) -> Result<(), WriterError> {
        let tx = self.conn.unchecked_transaction()?;
        for &frame_num in frame_nums {
            tx.execute("DELETE FROM Frame_Scans WHERE FrameNum = ?1", [frame_num])?;
            tx.execute("DELETE FROM Frame_Params WHERE FrameNum = ?1", [frame_num])?;
        }
        if update_global {
            let count: i64 = tx.query_row("SELECT COUNT(DISTINCT FrameNum) FROM Frame_Params", [], |row| row.get(0))?;
            tx.execute(
                "INSERT INTO Global_Params (ParamID, ParamName, ParamValue, ParamDataType, ParamDescription)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(ParamID) DO UPDATE SET ParamValue = excluded.ParamValue",
                params![
                    GlobalParamKey::NumFrames.id(),
                    GlobalParamKey::NumFrames.canonical_name(),
                    count.to_string(),
                    format!("{:?}", GlobalParamKey::NumFrames.data_type()),
                    GlobalParamKey::NumFrames.description(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Recompute and store `NumFrames` from the distinct `FrameNum`s present
    /// in `Frame_Params` (§4.4).
    pub fn update_global_frame_count(&self) -> Result<(), WriterError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT FrameNum) FROM Frame_Params",
            [],
            |row| row.get(0),
        )?;
        self.add_update_global(GlobalParamKey::NumFrames, &ParamValue::Int(count as i32))?;
        Ok(())
    }

    pub fn post_log_entry(&self, entry_type: &str, message: &str, posted_by: &str) -> Result<(), WriterError> {
        schema::version::post_log_entry(&self.conn, entry_type, message, posted_by)?;
        Ok(())
    }

    /// Build the offline bin-centric index (C8) from the current
    /// scan-centric data, for faster XIC queries.
    pub fn create_bin_centric_tables(&mut self, intensity_type: IntensityType) -> Result<(), WriterError> {
        crate::bincentric::build(&mut self.conn, intensity_type)?;
        Ok(())
    }

    fn maybe_flush(&mut self) -> Result<(), WriterError> {
        self.flush(false)
    }

    /// Commit the current batch of writes with a WAL checkpoint.
    ///
    /// A no-op when the previous flush ran less than `flush_interval` ago,
    /// unless `force` is true (§4.5). `insert_scan_*` calls this with
    /// `force=false` after every scan.
    pub fn flush(&mut self, force: bool) -> Result<(), WriterError> {
        if !force && self.last_flush.elapsed() < self.config.flush_interval {
            log::warn!("flush skipped: {:?} since last flush (< {:?})", self.last_flush.elapsed(), self.config.flush_interval);
            return Ok(());
        }
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        self.last_flush = Instant::now();
        log::info!("flush committed (force={force})");
        Ok(())
    }

    /// Flush and release the database handle (§6 `Writer::close()`).
    pub fn close(mut self) -> Result<(), WriterError> {
        self.flush(true)?;
        log::info!("writer closed");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    #[cfg(test)]
    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
