//! Shared enums that appear across the writer, reader, schema, and
//! calibration modules (§6 "Public API shape").

/// The kind of acquisition a frame represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum FrameType {
    Ms1 = 1,
    Ms2 = 2,
    Calibration = 3,
    Prescan = 4,
}

impl FrameType {
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            1 => Some(FrameType::Ms1),
            2 => Some(FrameType::Ms2),
            3 => Some(FrameType::Calibration),
            4 => Some(FrameType::Prescan),
            _ => None,
        }
    }
}

/// The unit in which an XIC tolerance is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToleranceType {
    Ppm,
    Thomson,
}

/// Whether a dataset's bin axis is linear-in-TOF or ppm-spaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum InstrumentClass {
    Tof = 0,
    PpmBinBased = 1,
}

/// The physical meaning of stored intensity words (§1, §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityType {
    /// ADC-sourced 32-bit integer intensities (the default).
    Adc32,
    /// TDC-sourced 16-bit integer intensities.
    Tdc16,
    /// Folded (summed/averaged) floating point intensities.
    FoldedFloat,
}

impl IntensityType {
    pub fn as_str(self) -> &'static str {
        match self {
            IntensityType::Adc32 => "ADC-int32",
            IntensityType::Tdc16 => "TDC-int16",
            IntensityType::FoldedFloat => "FOLDED-float",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ADC-int32" => Some(IntensityType::Adc32),
            "TDC-int16" => Some(IntensityType::Tdc16),
            "FOLDED-float" => Some(IntensityType::FoldedFloat),
            _ => None,
        }
    }
}

/// Whether stored pressures are in Torr or milliTorr (§4.6 pressure-unit
/// detection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureUnits {
    Torr,
    MilliTorr,
}
