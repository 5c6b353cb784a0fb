use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;

use rusqlite::{Connection, OpenFlags, OptionalExtension};

use crate::calibration::Calibration;
use crate::codec;
use crate::params::{self, FrameParamKey, GlobalParamKey, ParamValue, UnknownKeyWarnings};
use crate::schema;
use crate::types::{FrameType, IntensityType, ToleranceType};

use super::cache::{ScanKey, SpectrumCache};
use super::config::ReaderConfig;
use super::error::ReaderError;
use super::query::{choose_plan, QueryPlan};

/// One point of an extracted-ion chromatogram or 3D elution profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XicPoint {
    pub frame_num: i64,
    pub scan_num: u32,
    pub intensity: i64,
}

/// Opens an IMS-TOF SQLite file read-only and exposes the query half of the
/// public API (§5 "Reader behavior").
pub struct Reader {
    conn: Connection,
    config: ReaderConfig,
    frame_param_cache: RefCell<HashMap<i64, HashMap<i32, String>>>,
    spectrum_cache: RefCell<SpectrumCache>,
    legacy_ms1_is_zero: bool,
    pressure_is_milli_torr: bool,
    intensity_type: IntensityType,
    unknown_param_warnings: UnknownKeyWarnings,
}

impl Reader {
    pub fn open(path: impl AsRef<Path>, config: ReaderConfig) -> Result<Self, ReaderError> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Self::from_connection(conn, config)
    }

    fn from_connection(conn: Connection, config: ReaderConfig) -> Result<Self, ReaderError> {
        let legacy_ms1_is_zero = schema::detect_legacy_frame_type_encoding(&conn)?;
        let pressure_is_milli_torr = detect_pressure_units(&conn, config.milli_torr_threshold)?;
        let intensity_type = detect_intensity_type(&conn)?;
        if pressure_is_milli_torr {
            log::info!("pressure values detected as milliTorr; dividing by 1000 on read");
        }
        if legacy_ms1_is_zero {
            log::info!("legacy FrameType encoding detected (MS1 == 0); normalizing to MS1 == 1");
        }

        Ok(Self {
            conn,
            spectrum_cache: RefCell::new(SpectrumCache::new(config.spectrum_cache_capacity)),
            frame_param_cache: RefCell::new(HashMap::new()),
            legacy_ms1_is_zero,
            pressure_is_milli_torr,
            intensity_type,
            unknown_param_warnings: UnknownKeyWarnings::new(),
            config,
        })
    }

    #[cfg(test)]
    pub(crate) fn for_connection(conn: Connection, config: ReaderConfig) -> Result<Self, ReaderError> {
        Self::from_connection(conn, config)
    }

    fn frame_param_raw(&self, frame_num: i64, param_id: i32) -> Result<Option<String>, ReaderError> {
        if let Some(cached) = self.frame_param_cache.borrow().get(&frame_num) {
            return Ok(cached.get(&param_id).cloned());
        }
        let mut stmt = self
            .conn
            .prepare("SELECT ParamID, ParamValue FROM Frame_Params WHERE FrameNum = ?1")?;
        let rows: HashMap<i32, String> = stmt
            .query_map([frame_num], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<_, _>>()?;
        let value = rows.get(&param_id).cloned();
        self.frame_param_cache.borrow_mut().insert(frame_num, rows);
        Ok(value)
    }

    fn frame_param_f64(&self, frame_num: i64, key: FrameParamKey) -> Result<Option<f64>, ReaderError> {
        let raw = self.frame_param_raw(frame_num, key.id())?;
        Ok(raw.and_then(|text| params::coerce(&text, key.data_type(), true)).and_then(|v| v.as_f64()))
    }

    fn frame_param_i64(&self, frame_num: i64, key: FrameParamKey) -> Result<Option<i64>, ReaderError> {
        let raw = self.frame_param_raw(frame_num, key.id())?;
        Ok(raw.and_then(|text| params::coerce(&text, key.data_type(), true)).and_then(|v| v.as_i64()))
    }

    fn global_param_f64(&self, key: GlobalParamKey) -> Result<Option<f64>, ReaderError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT ParamValue FROM Global_Params WHERE ParamID = ?1",
                [key.id()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(raw.and_then(|text| params::coerce(&text, key.data_type(), true)).and_then(|v| v.as_f64()))
    }

    /// Look up a frame's calibration constants, §4.7.
    pub fn calibration_for_frame(&self, frame_num: i64) -> Result<Calibration, ReaderError> {
        let slope = self
            .frame_param_f64(frame_num, FrameParamKey::CalibrationSlope)?
            .ok_or(ReaderError::NotCalibrated(frame_num))?;
        let intercept = self
            .frame_param_f64(frame_num, FrameParamKey::CalibrationIntercept)?
            .unwrap_or(0.0);
        let bin_width_ns = self.global_param_f64(GlobalParamKey::BinWidth)?.unwrap_or(1.0);
        let tof_correction_time_ns = self.global_param_f64(GlobalParamKey::TofCorrectionTime)?.unwrap_or(0.0);

        Ok(Calibration {
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
        })
    }

    fn frame_type_of(&self, frame_num: i64) -> Result<Option<FrameType>, ReaderError> {
        let raw = self.frame_param_i64(frame_num, FrameParamKey::FrameType)?;
        Ok(raw
            .map(|v| schema::normalize_frame_type(v, self.legacy_ms1_is_zero))
            .and_then(FrameType::from_i32))
    }

    /// Frame numbers in `frame_range` whose `FrameType` matches `frame_type`
    /// (or all frames in range when `frame_type` is `None`), ordered.
    fn frames_in_range(&self, frame_range: Range<i64>, frame_type: Option<FrameType>) -> Result<Vec<i64>, ReaderError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT FrameNum FROM Frame_Params WHERE FrameNum >= ?1 AND FrameNum < ?2 ORDER BY FrameNum",
        )?;
        let frames: Vec<i64> = stmt
            .query_map([frame_range.start, frame_range.end], |row| row.get(0))?
            .collect::<Result<_, _>>()?;
        match frame_type {
            None => Ok(frames),
            Some(wanted) => frames
                .into_iter()
                .map(|f| Ok((f, self.frame_type_of(f)?)))
                .collect::<Result<Vec<_>, ReaderError>>()
                .map(|pairs| pairs.into_iter().filter(|(_, t)| *t == Some(wanted)).map(|(f, _)| f).collect()),
        }
    }

    fn decoded_scan(&self, frame_num: i64, scan_num: u32) -> Result<Option<codec::DecodedScan>, ReaderError> {
        let key = ScanKey { frame_num, scan_num };
        if let Some(cached) = self.spectrum_cache.borrow_mut().get(key) {
            return Ok(Some(cached.clone()));
        }
        let blob: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT Intensities FROM Frame_Scans WHERE FrameNum = ?1 AND ScanNum = ?2",
                [frame_num, scan_num as i64],
                |row| row.get(0),
            )
            .optional()?;
        let Some(blob) = blob else { return Ok(None) };
        let decoded = match self.intensity_type {
            IntensityType::Tdc16 => codec::decode_blob_i16(&blob)?,
            IntensityType::Adc32 | IntensityType::FoldedFloat => codec::decode_blob(&blob)?,
        };
        self.spectrum_cache.borrow_mut().insert(key, decoded.clone());
        Ok(Some(decoded))
    }

    /// Sum `(bin -> intensity)` across every scan in `scan_range` for every
    /// frame in `frame_range` matching `frame_type`, optionally restricted
    /// to `bin_range` (§5 `accumulate_frame_data`).
    pub fn accumulate_frame_data(
        &self,
        frame_range: Range<i64>,
        frame_type: Option<FrameType>,
        scan_range: Range<u32>,
        bin_range: Option<Range<u32>>,
    ) -> Result<BTreeMap<u32, i64>, ReaderError> {
        let frames = self.frames_in_range(frame_range, frame_type)?;
        let mut acc = BTreeMap::new();
        for frame_num in frames {
            for scan_num in scan_range.clone() {
                let Some(decoded) = self.decoded_scan(frame_num, scan_num)? else { continue };
                for (bin, intensity) in decoded.pairs {
                    if let Some(range) = &bin_range {
                        if !range.contains(&bin) {
                            continue;
                        }
                    }
                    *acc.entry(bin).or_insert(0i64) += intensity as i64;
                }
            }
        }
        Ok(acc)
    }

    /// Coalesced sparse `(mz, intensity)` spectrum, summed across the given
    /// frame/scan range. m/z values use the first matching frame's
    /// calibration (§5 `get_spectrum`).
    pub fn get_spectrum(
        &self,
        frame_range: Range<i64>,
        frame_type: Option<FrameType>,
        scan_range: Range<u32>,
        bin_range: Option<Range<u32>>,
    ) -> Result<(Vec<f64>, Vec<i64>), ReaderError> {
        let frames = self.frames_in_range(frame_range.clone(), frame_type)?;
        let reference_frame = *frames.first().ok_or(ReaderError::EmptyFrameRange)?;
        let calibration = self.calibration_for_frame(reference_frame)?;

        let acc = self.accumulate_frame_data(frame_range, frame_type, scan_range, bin_range)?;
        let mz = acc.keys().map(|bin| calibration.bin_to_mz(*bin)).collect();
        let intensity = acc.values().copied().collect();
        Ok((mz, intensity))
    }

    /// Dense intensity array of length `bins + 1` (§5 `get_spectrum_as_bins`).
    pub fn get_spectrum_as_bins(
        &self,
        frame_range: Range<i64>,
        frame_type: Option<FrameType>,
        scan_range: Range<u32>,
    ) -> Result<Vec<i64>, ReaderError> {
        let bins = self.global_param_f64(GlobalParamKey::Bins)?.unwrap_or(0.0) as usize;
        let mut dense = vec![0i64; bins + 1];
        let acc = self.accumulate_frame_data(frame_range, frame_type, scan_range, None)?;
        for (bin, intensity) in acc {
            if let Some(slot) = dense.get_mut(bin as usize) {
                *slot += intensity;
            }
        }
        Ok(dense)
    }

    /// Sum of the stored per-scan `TIC` column over the given range.
    pub fn get_tic(&self, frame_type: Option<FrameType>, frame_range: Range<i64>, scan_range: Range<u32>) -> Result<i64, ReaderError> {
        Ok(self.get_tic_by_frame(frame_type, frame_range, scan_range)?.values().sum())
    }

    /// Max of the stored per-scan `BPI` column over the given range.
    pub fn get_bpi(&self, frame_type: Option<FrameType>, frame_range: Range<i64>, scan_range: Range<u32>) -> Result<i64, ReaderError> {
        Ok(self
            .get_bpi_by_frame(frame_type, frame_range, scan_range)?
            .values()
            .copied()
            .max()
            .unwrap_or(0))
    }

    pub fn get_tic_by_frame(&self, frame_type: Option<FrameType>, frame_range: Range<i64>, scan_range: Range<u32>) -> Result<HashMap<i64, i64>, ReaderError> {
        let frames = self.frames_in_range(frame_range, frame_type)?;
        let mut result = HashMap::new();
        for frame_num in frames {
            let tic: i64 = self.conn.query_row(
                "SELECT COALESCE(SUM(TIC), 0) FROM Frame_Scans WHERE FrameNum = ?1 AND ScanNum >= ?2 AND ScanNum < ?3",
                rusqlite::params![frame_num, scan_range.start, scan_range.end],
                |row| row.get(0),
            )?;
            result.insert(frame_num, tic);
        }
        Ok(result)
    }

    pub fn get_bpi_by_frame(&self, frame_type: Option<FrameType>, frame_range: Range<i64>, scan_range: Range<u32>) -> Result<HashMap<i64, i64>, ReaderError> {
        let frames = self.frames_in_range(frame_range, frame_type)?;
        let mut result = HashMap::new();
        for frame_num in frames {
            let bpi: Option<i64> = self.conn.query_row(
                "SELECT MAX(BPI) FROM Frame_Scans WHERE FrameNum = ?1 AND ScanNum >= ?2 AND ScanNum < ?3",
                rusqlite::params![frame_num, scan_range.start, scan_range.end],
                |row| row.get(0),
            )?;
            result.insert(frame_num, bpi.unwrap_or(0));
        }
        Ok(result)
    }

    fn bin_centric_available(&self) -> Result<bool, ReaderError> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM Bin_Intensities", [], |row| row.get(0))?;
        Ok(count > 0)
    }

    fn mz_tolerance_to_bin_range(
        &self,
        reference_frame: i64,
        target_mz: f64,
        tolerance: f64,
        tolerance_type: ToleranceType,
    ) -> Result<Range<u32>, ReaderError> {
        let calibration = self.calibration_for_frame(reference_frame)?;
        let half_width = match tolerance_type {
            ToleranceType::Thomson => tolerance,
            ToleranceType::Ppm => target_mz * tolerance / 1_000_000.0,
        };
        let low = calibration.mz_to_bin((target_mz - half_width).max(0.0))?;
        let high = calibration.mz_to_bin(target_mz + half_width)?;
        Ok(low..(high + 1))
    }

    /// Extracted-ion chromatogram as sparse `(frame, scan, intensity)`
    /// points, choosing the scan-centric or bin-centric layout per §5's
    /// query plan.
    pub fn get_xic(
        &self,
        target_mz: f64,
        tolerance: f64,
        frame_type: Option<FrameType>,
        tolerance_type: ToleranceType,
    ) -> Result<Vec<XicPoint>, ReaderError> {
        let matching_frames = self.frames_in_range(i64::MIN..i64::MAX, frame_type)?;
        let reference_frame = *matching_frames.first().ok_or(ReaderError::EmptyFrameRange)?;
        let bin_range = self.mz_tolerance_to_bin_range(reference_frame, target_mz, tolerance, tolerance_type)?;

        let bin_centric_available = self.bin_centric_available()?;
        let num_frames = matching_frames.len() as u64;
        let num_scans_per_frame = self.frame_param_f64(reference_frame, FrameParamKey::Scans)?.unwrap_or(0.0) as u64;
        let num_bins_in_range = (bin_range.end - bin_range.start) as u64;

        match choose_plan(num_frames, num_scans_per_frame, num_bins_in_range, bin_centric_available) {
            QueryPlan::BinCentric => {
                // The bin-centric builder (§4.8) numbers entries
                // `scan_lc * scans_per_frame + scan_ims` over *every* frame
                // in the dataset, regardless of type -- so decoding needs
                // the unfiltered, dataset-wide frame ordering; the
                // requested `frame_type` is applied as a filter afterward,
                // not before (§4.6 "filter by frame range, scan range, and
                // frame type").
                let all_frames = self.frames_in_range(i64::MIN..i64::MAX, None)?;
                self.get_xic_bin_centric(bin_range, &all_frames, num_scans_per_frame as u32, frame_type)
            }
            QueryPlan::ScanCentric => self.get_xic_scan_centric(&matching_frames, bin_range),
        }
    }

    fn get_xic_scan_centric(&self, frames: &[i64], bin_range: Range<u32>) -> Result<Vec<XicPoint>, ReaderError> {
        let mut points = Vec::new();
        for &frame_num in frames {
            let scans: u32 = self.frame_param_f64(frame_num, FrameParamKey::Scans)?.unwrap_or(0.0) as u32;
            for scan_num in 0..scans {
                let Some(decoded) = self.decoded_scan(frame_num, scan_num)? else { continue };
                let intensity: i64 = decoded
                    .pairs
                    .iter()
                    .filter(|(bin, _)| bin_range.contains(bin))
                    .map(|(_, intensity)| *intensity as i64)
                    .sum();
                if intensity != 0 {
                    points.push(XicPoint { frame_num, scan_num, intensity });
                }
            }
        }
        Ok(points)
    }

    /// `frames` must be the full, unfiltered, `FrameNum`-ordered list (the
    /// same ordering [`crate::bincentric::build`] used to assign entry
    /// indexes); `wanted_frame_type` is applied as a post-decode filter.
    fn get_xic_bin_centric(
        &self,
        bin_range: Range<u32>,
        frames: &[i64],
        scans_per_frame: u32,
        wanted_frame_type: Option<FrameType>,
    ) -> Result<Vec<XicPoint>, ReaderError> {
        let scans_per_frame = scans_per_frame.max(1);
        let mut acc: HashMap<(i64, u32), i64> = HashMap::new();

        let mut stmt = self
            .conn
            .prepare("SELECT MZ_BIN, INTENSITIES FROM Bin_Intensities WHERE MZ_BIN >= ?1 AND MZ_BIN < ?2")?;
        let mut rows = stmt.query([bin_range.start, bin_range.end])?;
        while let Some(row) = rows.next()? {
            let blob: Vec<u8> = row.get(1)?;
            let decoded = codec::decode_blob(&blob)?;
            for (position, intensity) in decoded.pairs {
                let frame_ordinal = (position / scans_per_frame) as usize;
                let scan_num = position % scans_per_frame;
                let Some(&frame_num) = frames.get(frame_ordinal) else { continue };
                if let Some(wanted) = wanted_frame_type {
                    if self.frame_type_of(frame_num)? != Some(wanted) {
                        continue;
                    }
                }
                *acc.entry((frame_num, scan_num)).or_insert(0) += intensity as i64;
            }
        }
        Ok(acc
            .into_iter()
            .map(|((frame_num, scan_num), intensity)| XicPoint { frame_num, scan_num, intensity })
            .collect())
    }

    /// Dense `(frame, scan)` matrix equivalent of [`Reader::get_xic`].
    pub fn get_xic_as_array(
        &self,
        target_mz: f64,
        tolerance: f64,
        frame_type: Option<FrameType>,
        tolerance_type: ToleranceType,
    ) -> Result<Vec<Vec<i64>>, ReaderError> {
        let points = self.get_xic(target_mz, tolerance, frame_type, tolerance_type)?;
        let frames = self.frames_in_range(i64::MIN..i64::MAX, frame_type)?;
        let frame_index: HashMap<i64, usize> = frames.iter().enumerate().map(|(i, f)| (*f, i)).collect();
        let max_scan = points.iter().map(|p| p.scan_num).max().unwrap_or(0) as usize;

        let mut matrix = vec![vec![0i64; max_scan + 1]; frames.len()];
        for point in points {
            if let Some(&row) = frame_index.get(&point.frame_num) {
                matrix[row][point.scan_num as usize] += point.intensity;
            }
        }
        Ok(matrix)
    }

    /// Alias kept for parity with the original API surface: identical to
    /// [`Reader::get_xic`] but named for its typical caller (a 2D
    /// frame/scan heatmap for one m/z window).
    pub fn get_frames_and_scan_intensities_for_mz(
        &self,
        target_mz: f64,
        tolerance: f64,
        frame_type: Option<FrameType>,
        tolerance_type: ToleranceType,
    ) -> Result<Vec<XicPoint>, ReaderError> {
        self.get_xic(target_mz, tolerance, frame_type, tolerance_type)
    }

    /// Sum of intensity per IMS drift scan across `frame_range`, restricted
    /// to `mz_range` (§5 `get_drift_time_profile`).
    pub fn get_drift_time_profile(
        &self,
        frame_range: Range<i64>,
        frame_type: Option<FrameType>,
        bin_range: Option<Range<u32>>,
    ) -> Result<BTreeMap<u32, i64>, ReaderError> {
        let frames = self.frames_in_range(frame_range, frame_type)?;
        let max_scans = frames
            .iter()
            .map(|f| self.frame_param_f64(*f, FrameParamKey::Scans).map(|v| v.unwrap_or(0.0) as u32))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .max()
            .unwrap_or(0);

        let mut profile = BTreeMap::new();
        for frame_num in frames {
            let scans: u32 = self.frame_param_f64(frame_num, FrameParamKey::Scans)?.unwrap_or(0.0) as u32;
            for scan_num in 0..scans.min(max_scans) {
                let Some(decoded) = self.decoded_scan(frame_num, scan_num)? else { continue };
                let intensity: i64 = decoded
                    .pairs
                    .iter()
                    .filter(|(bin, _)| bin_range.as_ref().map(|r| r.contains(bin)).unwrap_or(true))
                    .map(|(_, intensity)| *intensity as i64)
                    .sum();
                *profile.entry(scan_num).or_insert(0) += intensity;
            }
        }
        Ok(profile)
    }

    /// Sparse `(frame, scan, intensity)` points restricted to `bin_range`,
    /// for 2D/3D heatmap rendering (§5 `get_3d_elution_profile`).
    pub fn get_3d_elution_profile(
        &self,
        frame_range: Range<i64>,
        frame_type: Option<FrameType>,
        scan_range: Range<u32>,
        bin_range: Range<u32>,
    ) -> Result<Vec<XicPoint>, ReaderError> {
        let frames = self.frames_in_range(frame_range, frame_type)?;
        let mut points = Vec::new();
        for frame_num in frames {
            for scan_num in scan_range.clone() {
                let Some(decoded) = self.decoded_scan(frame_num, scan_num)? else { continue };
                let intensity: i64 = decoded
                    .pairs
                    .iter()
                    .filter(|(bin, _)| bin_range.contains(bin))
                    .map(|(_, intensity)| *intensity as i64)
                    .sum();
                if intensity != 0 {
                    points.push(XicPoint { frame_num, scan_num, intensity });
                }
            }
        }
        Ok(points)
    }

    /// Pressure-corrected drift time for one scan (§4.6, §5
    /// `get_drift_time`).
    pub fn get_drift_time(&self, frame_num: i64, scan_num: u32) -> Result<f64, ReaderError> {
        let average_tof_length_ns = self
            .frame_param_f64(frame_num, FrameParamKey::AverageTofLength)?
            .unwrap_or(0.0);
        let raw = crate::calibration::raw_drift_time_ms(average_tof_length_ns, scan_num);

        let mut pressure = self.frame_param_f64(frame_num, FrameParamKey::PressureBack)?;
        if pressure.unwrap_or(0.0) <= 0.0 {
            pressure = self.frame_param_f64(frame_num, FrameParamKey::PressureFunnel)?;
        }
        let pressure = pressure.map(|p| if self.pressure_is_milli_torr { p / 1000.0 } else { p });

        Ok(crate::calibration::corrected_drift_time_ms(raw, pressure, self.config.standard_pressure_torr))
    }

    /// Every recognized frame parameter for `frame_num`, coerced to its
    /// typed [`ParamValue`]. Rows whose `ParamID` is not a known
    /// [`FrameParamKey`] are skipped, each warned about exactly once per ID
    /// across this reader's lifetime (§4.3, §8 scenario 6) -- the frame is
    /// still returned successfully, just without that key.
    pub fn frame_params(&self, frame_num: i64) -> Result<HashMap<FrameParamKey, ParamValue>, ReaderError> {
        if !self.frame_param_cache.borrow().contains_key(&frame_num) {
            // populate the raw cache as a side effect
            self.frame_param_raw(frame_num, -1)?;
        }
        let raw = self.frame_param_cache.borrow();
        let Some(rows) = raw.get(&frame_num) else {
            return Ok(HashMap::new());
        };

        let mut typed = HashMap::new();
        for (&param_id, text) in rows {
            let Some(key) = FrameParamKey::from_id(param_id) else {
                self.unknown_param_warnings.warn_once(param_id, "frame");
                continue;
            };
            if let Some(value) = params::coerce(text, key.data_type(), true) {
                typed.insert(key, value);
            }
        }
        Ok(typed)
    }

    /// The `FragmentationProfile` frame parameter decoded back into its
    /// ordered double sequence (§3 "Frame parameters" invariant). `None`
    /// when the frame has no `FragmentationProfile` value, or it is not
    /// valid Base64-encoded `f64` bytes.
    pub fn fragmentation_profile(&self, frame_num: i64) -> Result<Option<Vec<f64>>, ReaderError> {
        let raw = self.frame_param_raw(frame_num, FrameParamKey::FragmentationProfile.id())?;
        Ok(raw.and_then(|text| params::fragmentation_profile_from_storage(&text)))
    }

    /// Every stored `(ParamName, ParamValue)` pair from `Global_Params`,
    /// ordered by `ParamID` -- used by the `imstof-convert info` subcommand
    /// and otherwise mostly a debugging aid.
    pub fn all_global_params(&self) -> Result<Vec<(String, String)>, ReaderError> {
        let mut stmt = self
            .conn
            .prepare("SELECT ParamName, ParamValue FROM Global_Params ORDER BY ParamID")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Number of distinct frames recorded in `Frame_Params`.
    pub fn frame_count(&self) -> Result<i64, ReaderError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(DISTINCT FrameNum) FROM Frame_Params", [], |row| row.get(0))?)
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Read the dataset-wide `TOFIntensityType` global parameter, defaulting to
/// `ADC-int32` when absent (brand-new or minimal test fixtures) or
/// unrecognized (§3 "Invariant: ... one of {ADC-int32, TDC-int16,
/// FOLDED-float}").
fn detect_intensity_type(conn: &Connection) -> Result<IntensityType, ReaderError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT ParamValue FROM Global_Params WHERE ParamID = ?1",
            [GlobalParamKey::TofIntensityType.id()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(raw.and_then(|s| IntensityType::from_str(&s)).unwrap_or(IntensityType::Adc32))
}

fn detect_pressure_units(conn: &Connection, milli_torr_threshold: f64) -> Result<bool, ReaderError> {
    let pressure_param_id = FrameParamKey::PressureBack.id();
    let average: Option<f64> = conn
        .query_row(
            "SELECT AVG(CAST(ParamValue AS DOUBLE)) FROM Frame_Params WHERE ParamID = ?1",
            [pressure_param_id],
            |row| row.get::<_, Option<f64>>(0),
        )
        .optional()?
        .flatten();
    Ok(average.map(|avg| avg > milli_torr_threshold).unwrap_or(false))
}
