//! Global (process-wide) parameter keys (§3 "Global parameters").

use super::value::ParamDataType;

/// One key per process-wide scalar describing an acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum GlobalParamKey {
    InstrumentName,
    DateStarted,
    NumFrames,
    TimeOffset,
    BinWidth,
    Bins,
    TofCorrectionTime,
    TofIntensityType,
    DatasetType,
    PrescanTofPulses,
    PrescanAccumulations,
    PrescanTicThreshold,
    PrescanContinuous,
    InstrumentClass,
    PpmBinStartMz,
    PpmBinEndMz,
    DriftTubeLength,
    DriftGas,
}

struct Entry {
    key: GlobalParamKey,
    id: i32,
    name: &'static str,
    data_type: ParamDataType,
    description: &'static str,
}

macro_rules! table {
    ($($key:ident, $id:literal, $name:literal, $ty:ident, $desc:literal;)*) => {
        const TABLE: &[Entry] = &[
            $(Entry { key: GlobalParamKey::$key, id: $id, name: $name, data_type: ParamDataType::$ty, description: $desc },)*
        ];
    };
}

table! {
    InstrumentName, 0, "InstrumentName", String, "Name of the instrument that acquired this dataset";
    DateStarted, 1, "DateStarted", Date, "Acquisition start timestamp (M/d/yyyy h:mm:ss tt)";
    NumFrames, 2, "NumFrames", Int, "Number of distinct frames in this dataset";
    TimeOffset, 3, "TimeOffset", Int, "TOF bin offset applied when encoding intensities";
    BinWidth, 4, "BinWidth", Double, "Width of one TOF bin in nanoseconds";
    Bins, 5, "Bins", Int, "Number of TOF bins per scan";
    TofCorrectionTime, 6, "TOFCorrectionTime", Double, "Fixed TOF correction time in nanoseconds";
    TofIntensityType, 7, "TOFIntensityType", String, "ADC-int32, TDC-int16, or FOLDED-float";
    DatasetType, 8, "DatasetType", String, "Acquisition/dataset kind label";
    PrescanTofPulses, 9, "PrescanTOFPulses", Int, "Number of TOF pulses in a prescan";
    PrescanAccumulations, 10, "PrescanAccumulations", Int, "Number of accumulations in a prescan";
    PrescanTicThreshold, 11, "PrescanTICThreshold", Int, "TIC threshold that gates prescan triggering";
    PrescanContinuous, 12, "PrescanContinuous", Bool, "Whether prescanning runs continuously";
    InstrumentClass, 13, "InstrumentClass", String, "TOF or PpmBinBased";
    PpmBinStartMz, 14, "PPMBinStartMz", Double, "Start m/z of ppm-bin spacing (PpmBinBased only)";
    PpmBinEndMz, 15, "PPMBinEndMz", Double, "End m/z of ppm-bin spacing (PpmBinBased only)";
    DriftTubeLength, 16, "DriftTubeLength", Double, "Physical drift tube length in centimeters";
    DriftGas, 17, "DriftGas", String, "Drift gas identity (e.g. N2, He)";
}

impl GlobalParamKey {
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
        super::legacy::global_alias(name)
    }

    pub fn all() -> impl Iterator<Item = GlobalParamKey> {
        TABLE.iter().map(|e| e.key)
    }
}

fn entry_for(key: GlobalParamKey) -> &'static Entry {
    TABLE
        .iter()
        .find(|e| e.key == key)
        .expect("every GlobalParamKey variant has a table entry")
}
