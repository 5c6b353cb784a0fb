use super::*;
use crate::params::{FrameParamKey, GlobalParamKey, ParamValue};
use crate::types::{FrameType, ToleranceType};
use crate::writer::{NewFrame, Writer, WriterConfig};
use tempfile::NamedTempFile;

fn build_minimal_dataset(path: &std::path::Path) {
    let mut writer = Writer::open(path, WriterConfig::default()).unwrap();
    writer.add_update_global(GlobalParamKey::BinWidth, &ParamValue::Double(1.0)).unwrap();
    writer.add_update_global(GlobalParamKey::Bins, &ParamValue::Int(1000)).unwrap();
    writer.add_update_global(GlobalParamKey::TofCorrectionTime, &ParamValue::Double(0.0)).unwrap();
    writer
        .insert_frame(NewFrame {
            frame_num: 1,
            frame_type: FrameType::Ms1,
            scans: 2,
        })
        .unwrap();
    writer
        .add_update_frame_parameter(1, FrameParamKey::CalibrationSlope, &ParamValue::Double(0.5))
        .unwrap();
    writer
        .add_update_frame_parameter(1, FrameParamKey::CalibrationIntercept, &ParamValue::Double(0.0))
        .unwrap();
    writer
        .add_update_frame_parameter(1, FrameParamKey::AverageTofLength, &ParamValue::Double(100_000.0))
        .unwrap();
    writer
        .add_update_frame_parameter(1, FrameParamKey::PressureBack, &ParamValue::Double(2.0))
        .unwrap();

    let dense: Vec<i32> = (0..1001)
        .map(|bin| match bin {
            10 => 5,
            12 => 7,
            15 => 3,
            _ => 0,
        })
        .collect();
    writer.insert_scan_dense(1, 0, &dense).unwrap();
    writer.insert_scan_dense(1, 1, &[0; 1001]).unwrap();
    writer.flush(true).unwrap();
}

fn open_reader(path: &std::path::Path) -> Reader {
    Reader::open(path, ReaderConfig::default()).unwrap()
}

#[test]
fn get_spectrum_returns_sparse_bins_matching_scenario_1() {
    let file = NamedTempFile::new().unwrap();
    build_minimal_dataset(file.path());
    let reader = open_reader(file.path());

    let (mz, intensity) = reader.get_spectrum(1..2, Some(FrameType::Ms1), 0..1, None).unwrap();
    assert_eq!(intensity, vec![5, 7, 3]);
    assert!((mz[1] - 0.000036).abs() < 1e-9);

    let tic = reader.get_tic(Some(FrameType::Ms1), 1..2, 0..1).unwrap();
    assert_eq!(tic, 15);
    let bpi = reader.get_bpi(Some(FrameType::Ms1), 1..2, 0..1).unwrap();
    assert_eq!(bpi, 7);
}

#[test]
fn get_spectrum_as_bins_is_dense_and_bins_plus_one_long() {
    let file = NamedTempFile::new().unwrap();
    build_minimal_dataset(file.path());
    let reader = open_reader(file.path());

    let dense = reader.get_spectrum_as_bins(1..2, Some(FrameType::Ms1), 0..1).unwrap();
    assert_eq!(dense.len(), 1001);
    assert_eq!(dense[10], 5);
    assert_eq!(dense[12], 7);
    assert_eq!(dense[15], 3);
}

#[test]
fn get_drift_time_applies_pressure_correction_matching_scenario_5() {
    let file = NamedTempFile::new().unwrap();
    build_minimal_dataset(file.path());
    let reader = open_reader(file.path());

    let dt = reader.get_drift_time(1, 50).unwrap();
    assert!((dt - 10.0).abs() < 1e-9);
}

#[test]
fn tdc16_dataset_decodes_through_the_int16_path() {
    let file = NamedTempFile::new().unwrap();
    let mut writer = Writer::open(file.path(), WriterConfig::default()).unwrap();
    writer
        .add_update_global(GlobalParamKey::TofIntensityType, &ParamValue::String("TDC-int16".to_string()))
        .unwrap();
    writer.add_update_global(GlobalParamKey::BinWidth, &ParamValue::Double(1.0)).unwrap();
    writer
        .insert_frame(NewFrame {
            frame_num: 1,
            frame_type: FrameType::Ms1,
            scans: 1,
        })
        .unwrap();
    writer
        .add_update_frame_parameter(1, FrameParamKey::CalibrationSlope, &ParamValue::Double(0.5))
        .unwrap();
    writer
        .add_update_frame_parameter(1, FrameParamKey::CalibrationIntercept, &ParamValue::Double(0.0))
        .unwrap();
    let dense: Vec<i16> = vec![0, 0, 5, 0, 7, 0];
    writer.insert_scan_dense_i16(1, 0, &dense).unwrap();
    writer.flush(true).unwrap();

    let reader = open_reader(file.path());
    let (_, intensity) = reader.get_spectrum(1..2, Some(FrameType::Ms1), 0..1, None).unwrap();
    assert_eq!(intensity, vec![5, 7]);
}

#[test]
fn get_xic_scan_centric_finds_the_target_bin() {
    let file = NamedTempFile::new().unwrap();
    build_minimal_dataset(file.path());
    let reader = open_reader(file.path());

    let mz_at_bin_12 = reader.calibration_for_frame(1).unwrap().bin_to_mz(12);
    let points = reader
        .get_xic(mz_at_bin_12, 0.0000001, Some(FrameType::Ms1), ToleranceType::Thomson)
        .unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].intensity, 7);
    assert_eq!(points[0].scan_num, 0);
}

#[test]
fn fragmentation_profile_round_trips_through_reader_and_writer() {
    let file = NamedTempFile::new().unwrap();
    build_minimal_dataset(file.path());

    let profile = vec![0.0, 12.5, -4.0, 100.25];
    {
        let writer = Writer::open(file.path(), WriterConfig::default()).unwrap();
        writer.set_fragmentation_profile(1, &profile).unwrap();
    }

    let reader = open_reader(file.path());
    assert_eq!(reader.fragmentation_profile(1).unwrap(), Some(profile));
    assert_eq!(reader.fragmentation_profile(2).unwrap(), None);
}
