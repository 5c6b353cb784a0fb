//! Per-frame parameter keys (§3 "Frame parameters").

use base64::prelude::*;

use super::value::ParamDataType;

/// One key per open-ended per-frame metadata entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FrameParamKey {
    StartTimeMinutes,
    DurationSeconds,
    Accumulations,
    FrameType,
    Scans,
    AverageTofLength,
    CalibrationSlope,
    CalibrationIntercept,
    MassCalibrationCoefficientA2,
    MassCalibrationCoefficientB2,
    MassCalibrationCoefficientC2,
    MassCalibrationCoefficientD2,
    MassCalibrationCoefficientE2,
    MassCalibrationCoefficientF2,
    PressureFront,
    PressureBack,
    PressureFunnel,
    PressureTrap,
    VoltEntranceHpfIn,
    VoltEntranceHpfOut,
    VoltEntranceCondLmt,
    VoltTrapIn,
    VoltTrapOut,
    VoltJetDist,
    VoltQuad1,
    VoltCond2,
    VoltQuad2,
    VoltImsOut,
    VoltExitHpfIn,
    VoltExitHpfOut,
    VoltExitCondLmt,
    /// Ordered sequence of 64-bit floats, stored as bytes, exposed as a
    /// double sequence (§3 invariant).
    FragmentationProfile,
    Decoded,
    CalibrationDone,
    MultiplexingEncodingSequence,
    AmbientTemperature,
}

struct Entry {
    key: FrameParamKey,
    id: i32,
    name: &'static str,
    data_type: ParamDataType,
    description: &'static str,
}

macro_rules! table {
    ($($key:ident, $id:literal, $name:literal, $ty:ident, $desc:literal;)*) => {
        const TABLE: &[Entry] = &[
            $(Entry { key: FrameParamKey::$key, id: $id, name: $name, data_type: ParamDataType::$ty, description: $desc },)*
        ];
    };
}

table! {
    StartTimeMinutes, 0, "StartTime", Double, "Frame start time in minutes";
    DurationSeconds, 1, "Duration", Double, "Frame duration in seconds";
    Accumulations, 2, "Accumulations", Int, "Number of accumulations folded into this frame";
    FrameType, 3, "FrameType", Int, "MS1, MS2, Calibration, or Prescan";
    Scans, 4, "Scans", Int, "Number of IMS drift scans in this frame";
    AverageTofLength, 5, "AverageTOFLength", Double, "Average TOF pulse length in nanoseconds";
    CalibrationSlope, 6, "CalibrationSlope", Double, "m/z calibration slope (k)";
    CalibrationIntercept, 7, "CalibrationIntercept", Double, "m/z calibration intercept (t0)";
    MassCalibrationCoefficientA2, 8, "MassCalibrationCoefficienta2", Double, "Mass error polynomial coefficient a2";
    MassCalibrationCoefficientB2, 9, "MassCalibrationCoefficientb2", Double, "Mass error polynomial coefficient b2";
    MassCalibrationCoefficientC2, 10, "MassCalibrationCoefficientc2", Double, "Mass error polynomial coefficient c2";
    MassCalibrationCoefficientD2, 11, "MassCalibrationCoefficientd2", Double, "Mass error polynomial coefficient d2";
    MassCalibrationCoefficientE2, 12, "MassCalibrationCoefficiente2", Double, "Mass error polynomial coefficient e2";
    MassCalibrationCoefficientF2, 13, "MassCalibrationCoefficientf2", Double, "Mass error polynomial coefficient f2";
    PressureFront, 14, "PressureFront", Double, "Front drift tube pressure (Torr)";
    PressureBack, 15, "PressureBack", Double, "Back drift tube pressure (Torr)";
    PressureFunnel, 16, "PressureFunnel", Double, "Ion funnel pressure (Torr)";
    PressureTrap, 17, "PressureTrap", Double, "Trap region pressure (Torr)";
    VoltEntranceHpfIn, 18, "VoltEntranceHPFIn", Double, "Entrance high pressure funnel, inlet voltage";
    VoltEntranceHpfOut, 19, "VoltEntranceHPFOut", Double, "Entrance high pressure funnel, outlet voltage";
    VoltEntranceCondLmt, 20, "VoltEntranceCondLmt", Double, "Entrance conductance limit voltage";
    VoltTrapIn, 21, "VoltTrapIn", Double, "Trap inlet voltage";
    VoltTrapOut, 22, "VoltTrapOut", Double, "Trap outlet voltage";
    VoltJetDist, 23, "VoltJetDist", Double, "Jet disruptor voltage";
    VoltQuad1, 24, "VoltQuad1", Double, "First quadrupole voltage";
    VoltCond2, 25, "VoltCond2", Double, "Second conductance limit voltage";
    VoltQuad2, 26, "VoltQuad2", Double, "Second quadrupole voltage";
    VoltImsOut, 27, "VoltIMSOut", Double, "IMS drift tube exit voltage";
    VoltExitHpfIn, 28, "VoltExitHPFIn", Double, "Exit high pressure funnel, inlet voltage";
    VoltExitHpfOut, 29, "VoltExitHPFOut", Double, "Exit high pressure funnel, outlet voltage";
    VoltExitCondLmt, 30, "VoltExitCondLmt", Double, "Exit conductance limit voltage";
    FragmentationProfile, 31, "FragmentationProfile", String, "Ordered double sequence, stored as bytes";
    Decoded, 32, "Decoded", Bool, "Whether this frame has been demultiplexed";
    CalibrationDone, 33, "CalibrationDone", Bool, "Whether calibration has been applied to this frame";
    MultiplexingEncodingSequence, 34, "MultiplexingEncodingSequence", String, "Bit sequence used for demultiplexing";
    AmbientTemperature, 35, "AmbientTemperature", Double, "Ambient temperature at acquisition time";
}

impl FrameParamKey {
    pub fn id(self) -> i32 {
        entry_for(self).id
    }

    pub fn canonical_name(self) -> &'static str {
        entry_for(self).name
    }

    pub fn data_type(self) -> ParamDataType {
        entry_for(self).data_type
    }

    pub fn description(self) -> &'static str {
        entry_for(self).description
    }

    pub fn from_id(id: i32) -> Option<Self> {
        TABLE.iter().find(|e| e.id == id).map(|e| e.key)
    }

    /// Lookup by name: exact match first, then case-insensitive, then the
    /// legacy alias table (§4.3).
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(e) = TABLE.iter().find(|e| e.name == name) {
            return Some(e.key);
        }
        if let Some(e) = TABLE.iter().find(|e| e.name.eq_ignore_ascii_case(name)) {
            return Some(e.key);
        }
        super::legacy::frame_alias(name)
    }

    pub fn all() -> impl Iterator<Item = FrameParamKey> {
        TABLE.iter().map(|e| e.key)
    }
}

fn entry_for(key: FrameParamKey) -> &'static Entry {
    TABLE
        .iter()
        .find(|e| e.key == key)
        .expect("every FrameParamKey variant has a table entry")
}

/// Encode an ordered sequence of 64-bit floats as the bytes-stored-as-text
/// representation of `FrameParamKey::FragmentationProfile` (§3 "Frame
/// parameters" invariant). The bytes are little-endian `f64`s, Base64'd so
/// they fit the `ParamValue` text column the same way a `TEXT` column
/// stores an embedded BLOB.
pub fn fragmentation_profile_to_storage(values: &[f64]) -> String {
    let mut bytes = Vec::with_capacity(values.len() * 8);
    for v in values {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    BASE64_STANDARD.encode(bytes)
}

/// Decode the stored text form back into the double sequence. Returns
/// `None` if the text is not valid Base64 or its length is not a multiple
/// of 8 bytes.
pub fn fragmentation_profile_from_storage(text: &str) -> Option<Vec<f64>> {
    let bytes = BASE64_STANDARD.decode(text.trim()).ok()?;
    if bytes.len() % 8 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(8)
            .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
            .collect(),
    )
}
