use super::*;
use crate::params::{FrameParamKey, GlobalParamKey, ParamValue};
use crate::types::{FrameType, IntensityType};

fn open_writer() -> Writer {
    Writer::open(":memory:", WriterConfig::default()).unwrap()
}

#[test]
fn insert_frame_and_parameter_round_trip() {
    let writer = open_writer();
    writer
        .insert_frame(NewFrame {
            frame_num: 1,
            frame_type: FrameType::Ms1,
            scans: 4,
        })
        .unwrap();
    writer
        .add_update_frame_parameter(1, FrameParamKey::AmbientTemperature, &ParamValue::Double(298.0))
        .unwrap();

    let conn = writer.connection();
    let scans: i64 = conn
        .query_row(
            "SELECT ParamValue FROM Frame_Params WHERE FrameNum = 1 AND ParamID = ?1",
            [FrameParamKey::Scans.id()],
            |row| row.get::<_, String>(0),
        )
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(scans, 4);
}

#[test]
fn insert_scan_sparse_rejects_non_increasing_bins() {
    let mut writer = open_writer();
    writer
        .insert_frame(NewFrame {
            frame_num: 1,
            frame_type: FrameType::Ms1,
            scans: 1,
        })
        .unwrap();
    let err = writer
        .insert_scan_sparse(1, 0, &[(10, 5), (5, 7)], 0)
        .unwrap_err();
    assert!(matches!(
        err,
        WriterError::NonIncreasingBins {
            previous: 10,
            next: 5
        }
    ));
}

#[test]
fn insert_scan_sparse_stores_blob_and_summary_stats() {
    let mut writer = open_writer();
    writer
        .insert_frame(NewFrame {
            frame_num: 1,
            frame_type: FrameType::Ms1,
            scans: 1,
        })
        .unwrap();
    writer.insert_scan_sparse(1, 0, &[(5, 10), (5000, 40)], 0).unwrap();

    let conn = writer.connection();
    let (non_zero, tic): (i64, i64) = conn
        .query_row(
            "SELECT NonZeroCount, TIC FROM Frame_Scans WHERE FrameNum = 1 AND ScanNum = 0",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(non_zero, 2);
    assert_eq!(tic, 50);
}

#[test]
fn update_global_frame_count_reflects_distinct_frames() {
    let writer = open_writer();
    for frame_num in [1, 2, 3] {
        writer
            .insert_frame(NewFrame {
                frame_num,
                frame_type: FrameType::Ms1,
                scans: 1,
            })
            .unwrap();
    }
    writer.update_global_frame_count().unwrap();

    let conn = writer.connection();
    let num_frames: String = conn
        .query_row(
            "SELECT ParamValue FROM Global_Params WHERE ParamID = ?1",
            [GlobalParamKey::NumFrames.id()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(num_frames, "3");
}

#[test]
fn delete_frame_removes_scans_and_parameters() {
    let mut writer = open_writer();
    writer
        .insert_frame(NewFrame {
            frame_num: 1,
            frame_type: FrameType::Ms1,
            scans: 1,
        })
        .unwrap();
    writer.insert_scan_sparse(1, 0, &[(0, 5)], 0).unwrap();
    writer.delete_frame(1, true).unwrap();

    let conn = writer.connection();
    let scan_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM Frame_Scans WHERE FrameNum = 1", [], |row| row.get(0))
        .unwrap();
    let param_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM Frame_Params WHERE FrameNum = 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(scan_count, 0);
    assert_eq!(param_count, 0);
}

#[test]
fn post_log_entry_is_recorded() {
    let writer = open_writer();
    writer.post_log_entry("Info", "conversion started", "imstof-convert").unwrap();

    let conn = writer.connection();
    let message: String = conn
        .query_row("SELECT Message FROM Log_Entries", [], |row| row.get(0))
        .unwrap();
    assert_eq!(message, "conversion started");
}

#[test]
fn update_calibration_coefficients_then_insert_scan_computes_bpi_mz() {
    let mut writer = open_writer();
    writer
        .insert_frame(NewFrame {
            frame_num: 1,
            frame_type: FrameType::Ms1,
            scans: 1,
        })
        .unwrap();
    writer
        .add_update_global(GlobalParamKey::BinWidth, &ParamValue::Double(1.0))
        .unwrap();
    writer
        .update_calibration_coefficients(
            Some(1),
            &crate::calibration::Calibration {
                slope: 0.5,
                intercept: 0.0,
                a2: 0.0,
                b2: 0.0,
                c2: 0.0,
                d2: 0.0,
                e2: 0.0,
                f2: 0.0,
                bin_width_ns: 1.0,
                tof_correction_time_ns: 0.0,
            },
            true,
        )
        .unwrap();
    writer.insert_scan_sparse(1, 0, &[(12, 99)], 0).unwrap();

    let conn = writer.connection();
    let bpi_mz: f64 = conn
        .query_row(
            "SELECT BPI_MZ FROM Frame_Scans WHERE FrameNum = 1 AND ScanNum = 0",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!((bpi_mz - 0.000036).abs() < 1e-9);
}

#[test]
fn insert_scan_dense_i16_stores_blob_and_summary_stats() {
    let mut writer = open_writer();
    writer
        .insert_frame(NewFrame {
            frame_num: 1,
            frame_type: FrameType::Ms1,
            scans: 1,
        })
        .unwrap();
    let dense: Vec<i16> = vec![0, 0, 5, 0, 7, 0];
    writer.insert_scan_dense_i16(1, 0, &dense).unwrap();

    let conn = writer.connection();
    let (non_zero, tic): (i64, i64) = conn
        .query_row(
            "SELECT NonZeroCount, TIC FROM Frame_Scans WHERE FrameNum = 1 AND ScanNum = 0",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(non_zero, 2);
    assert_eq!(tic, 12);
}

#[test]
fn create_bin_centric_tables_populates_bin_intensities() {
    let mut writer = open_writer();
    writer
        .insert_frame(NewFrame {
            frame_num: 1,
            frame_type: FrameType::Ms1,
            scans: 2,
        })
        .unwrap();
    writer.insert_scan_sparse(1, 0, &[(5, 10)], 0).unwrap();
    writer.insert_scan_sparse(1, 1, &[(5, 20)], 0).unwrap();

    writer.create_bin_centric_tables(IntensityType::Adc32).unwrap();

    let conn = writer.connection();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM Bin_Intensities WHERE MZ_BIN = 5", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}
