//! End-to-end scenarios from spec §8, driven entirely through the public
//! `imstof_store` API against a real (temp-file) SQLite database rather
//! than the `:memory:` handles the unit tests use.

use imstof_store::params::{FrameParamKey, GlobalParamKey, ParamValue};
use imstof_store::reader::{Reader, ReaderConfig};
use imstof_store::schema;
use imstof_store::types::{FrameType, IntensityType, ToleranceType};
use imstof_store::writer::{NewFrame, Writer, WriterConfig};
use rusqlite::Connection;
use tempfile::NamedTempFile;

fn calibrate(writer: &Writer, frame_num: i64, slope: f64, intercept: f64) {
    writer
        .add_update_frame_parameter(frame_num, FrameParamKey::CalibrationSlope, &ParamValue::Double(slope))
        .unwrap();
    writer
        .add_update_frame_parameter(frame_num, FrameParamKey::CalibrationIntercept, &ParamValue::Double(intercept))
        .unwrap();
}

/// Scenario 1 ("Minimal write/read") plus scenario 2 ("Sparse input"),
/// against a real file reopened read-only.
#[test]
fn minimal_write_then_sparse_scan_round_trips_on_reopen() {
    let file = NamedTempFile::new().unwrap();

    {
        let mut writer = Writer::open(file.path(), WriterConfig::default()).unwrap();
        writer.add_update_global(GlobalParamKey::BinWidth, &ParamValue::Double(1.0)).unwrap();
        writer.add_update_global(GlobalParamKey::Bins, &ParamValue::Int(10_000)).unwrap();
        writer.add_update_global(GlobalParamKey::TofCorrectionTime, &ParamValue::Double(0.0)).unwrap();
        writer
            .insert_frame(NewFrame { frame_num: 1, frame_type: FrameType::Ms1, scans: 2 })
            .unwrap();
        calibrate(&writer, 1, 0.5, 0.0);

        let dense: Vec<i32> = (0..16)
            .map(|bin| match bin {
                10 => 5,
                12 => 7,
                15 => 3,
                _ => 0,
            })
            .collect();
        let non_zero = writer.insert_scan_dense(1, 0, &dense).unwrap();
        assert_eq!(non_zero, 3);

        let sparse_non_zero = writer
            .insert_scan_sparse(1, 1, &[(5, 100), (5000, 200), (5001, 50)], 0)
            .unwrap();
        assert_eq!(sparse_non_zero, 3);

        writer.close().unwrap();
    }

    let reader = Reader::open(file.path(), ReaderConfig::default()).unwrap();

    let (mz, intensity) = reader.get_spectrum(1..2, Some(FrameType::Ms1), 0..1, None).unwrap();
    assert_eq!(intensity, vec![5, 7, 3]);
    assert!((mz[1] - 0.000036).abs() < 1e-9);
    assert_eq!(reader.get_tic(Some(FrameType::Ms1), 1..2, 0..1).unwrap(), 15);
    assert_eq!(reader.get_bpi(Some(FrameType::Ms1), 1..2, 0..1).unwrap(), 7);

    let (_, sparse_intensity) = reader.get_spectrum(1..2, Some(FrameType::Ms1), 1..2, None).unwrap();
    assert_eq!(sparse_intensity, vec![100, 200, 50]);
}

/// Scenario 3 ("XIC, bin-centric"): after building the bin-centric index,
/// a zero-tolerance XIC at the bin-5000 m/z finds exactly the one point
/// written there, and widening the tolerance to cover bin 5001 sums both.
/// Also exercises the frame-type filter fix: a second, MS2 frame is
/// interleaved so the bin-centric entry-index decode has to skip it
/// correctly rather than mis-attributing positions.
#[test]
fn xic_bin_centric_matches_scenario_3_with_mixed_frame_types() {
    let file = NamedTempFile::new().unwrap();
    let frame_num;
    {
        let mut writer = Writer::open(file.path(), WriterConfig::default()).unwrap();
        writer.add_update_global(GlobalParamKey::BinWidth, &ParamValue::Double(1.0)).unwrap();
        writer.add_update_global(GlobalParamKey::TofCorrectionTime, &ParamValue::Double(0.0)).unwrap();

        writer
            .insert_frame(NewFrame { frame_num: 1, frame_type: FrameType::Ms2, scans: 2 })
            .unwrap();
        calibrate(&writer, 1, 0.5, 0.0);
        writer.insert_scan_sparse(1, 0, &[(5000, 999)], 0).unwrap();
        writer.insert_scan_sparse(1, 1, &[(4999, 1)], 0).unwrap();

        writer
            .insert_frame(NewFrame { frame_num: 2, frame_type: FrameType::Ms1, scans: 2 })
            .unwrap();
        calibrate(&writer, 2, 0.5, 0.0);
        writer.insert_scan_sparse(2, 0, &[(4999, 70)], 0).unwrap();
        writer.insert_scan_sparse(2, 1, &[(5000, 200), (5001, 50)], 0).unwrap();
        frame_num = 2;

        writer.create_bin_centric_tables(IntensityType::Adc32).unwrap();
        writer.close().unwrap();
    }

    let reader = Reader::open(file.path(), ReaderConfig::default()).unwrap();
    let calibration = reader.calibration_for_frame(frame_num).unwrap();
    let mz_5000 = calibration.bin_to_mz(5000);
    let mz_4999 = calibration.bin_to_mz(4999);
    let mz_5001 = calibration.bin_to_mz(5001);

    let exact = reader
        .get_xic(mz_5000, 0.0, Some(FrameType::Ms1), ToleranceType::Thomson)
        .unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].frame_num, frame_num);
    assert_eq!(exact[0].scan_num, 1);
    assert_eq!(exact[0].intensity, 200);

    // The tolerance window `[mz_5000 - width, mz_5000 + width]` with
    // `width = mz_5001 - mz_5000` is wide enough to also cover bin 4999, so
    // frame 2 scan 0's `(4999, 70)` decoy is included alongside scan 1's
    // `(5000, 200)` and `(5001, 50)`.
    let widened = reader
        .get_xic(mz_5000, mz_5001 - mz_5000, Some(FrameType::Ms1), ToleranceType::Thomson)
        .unwrap();
    let total: i64 = widened.iter().map(|p| p.intensity).sum();
    assert_eq!(total, 320);
    assert!(widened.iter().all(|p| p.frame_num == frame_num));

    // the MS2 frame's bins 4999/5000 must never leak into an MS1-filtered query
    let ms1_only_points = reader
        .get_xic(mz_4999, 0.0, Some(FrameType::Ms1), ToleranceType::Thomson)
        .unwrap();
    assert!(ms1_only_points.iter().all(|p| p.frame_num == frame_num));
}

/// Scenario 4 ("Legacy migration"): a file containing only the legacy
/// wide-column tables is converted to the modern layout on writer open,
/// `NumFrames` matches the distinct frame count, and reopening is a no-op.
#[test]
fn legacy_file_converts_on_writer_open_and_reader_sees_modern_tables() {
    let file = NamedTempFile::new().unwrap();

    {
        let conn = Connection::open(file.path()).unwrap();
        schema::legacy::create_legacy_tables(&conn).unwrap();
        conn.execute(
            "INSERT INTO Global_Parameters (DateStarted, NumFrames, TimeOffset, BinWidth, Bins, TOFCorrectionTime, TOFIntensityType, DatasetType, Instrument_Name, InstrumentClass)
             VALUES ('1/1/2024 12:00:00 AM', 0, 0, 1.0, 1000, 0.0, 'ADC-int32', 'IMS', 'TestInstrument', 'TOF')",
            [],
        )
        .unwrap();
        for frame_num in [1, 2] {
            conn.execute(
                "INSERT INTO Frame_Parameters (FrameNum, StartTime, Duration, Accumulations, FrameType, Scans, AverageTOFLength, CalibrationSlope, CalibrationIntercept)
                 VALUES (?1, 0.0, 1.0, 1, 1, 2, 100000.0, 0.5, 0.0)",
                [frame_num],
            )
            .unwrap();
        }
    }

    {
        let mut writer = Writer::open(file.path(), WriterConfig::default()).unwrap();
        writer.flush(true).unwrap();
    }

    let reader = Reader::open(file.path(), ReaderConfig::default()).unwrap();
    assert_eq!(reader.frame_count().unwrap(), 2);
    let num_frames = reader
        .all_global_params()
        .unwrap()
        .into_iter()
        .find(|(name, _)| name == "NumFrames")
        .map(|(_, value)| value);
    assert_eq!(num_frames.as_deref(), Some("2"));

    // reopening a file whose modern tables already exist must not error or
    // re-run the conversion.
    let mut writer = Writer::open(file.path(), WriterConfig::default()).unwrap();
    writer.flush(true).unwrap();
}

/// Scenario 6 ("Unknown param ID"): a row with a `ParamID` the reader does
/// not recognize is skipped but does not fail the read, and is warned
/// about at most once regardless of how many frames carry it.
#[test]
fn unknown_frame_param_id_is_skipped_not_fatal() {
    let file = NamedTempFile::new().unwrap();
    const UNKNOWN_PARAM_ID: i32 = 9001;

    {
        let writer = Writer::open(file.path(), WriterConfig::default()).unwrap();
        writer
            .insert_frame(NewFrame { frame_num: 1, frame_type: FrameType::Ms1, scans: 1 })
            .unwrap();
        writer.close().unwrap();
    }
    {
        let conn = Connection::open(file.path()).unwrap();
        conn.execute(
            "INSERT INTO Frame_Param_Keys (ParamID, ParamName, ParamDataType, ParamDescription)
             VALUES (?1, 'SomeFutureParam', 'Double', 'not yet known to this reader version')",
            [UNKNOWN_PARAM_ID],
        ).unwrap();
        conn.execute(
            "INSERT INTO Frame_Params (FrameNum, ParamID, ParamValue) VALUES (1, ?1, '3.14')",
            [UNKNOWN_PARAM_ID],
        ).unwrap();
    }

    let reader = Reader::open(file.path(), ReaderConfig::default()).unwrap();
    let params = reader.frame_params(1).unwrap();
    assert!(params.contains_key(&FrameParamKey::FrameType));
    assert!(params.contains_key(&FrameParamKey::Scans));
    // the unknown ID contributes no entry, but the read still succeeds.
    assert_eq!(params.len(), 2);
}
