//! Legacy column/parameter name aliases (§4.3, §4.4).
//!
//! The legacy fixed-column schema (`Global_Parameters` /
//! `Frame_Parameters`) used historical names that do not match the modern
//! enum's canonical names. Both [`GlobalParamKey::from_name`] and
//! [`FrameParamKey::from_name`] fall back here after an exact and a
//! case-insensitive match fail.

use super::{FrameParamKey, GlobalParamKey};

/// Historical `Frame_Parameters` column name -> modern [`FrameParamKey`].
const FRAME_ALIASES: &[(&str, FrameParamKey)] = &[
    ("voltEntranceIFTIn", FrameParamKey::VoltEntranceHpfIn),
    ("voltEntranceIFTOut", FrameParamKey::VoltEntranceHpfOut),
    ("voltExitIFTIn", FrameParamKey::VoltExitHpfIn),
    ("voltExitIFTOut", FrameParamKey::VoltExitHpfOut),
    ("a2", FrameParamKey::MassCalibrationCoefficientA2),
    ("b2", FrameParamKey::MassCalibrationCoefficientB2),
    ("c2", FrameParamKey::MassCalibrationCoefficientC2),
    ("d2", FrameParamKey::MassCalibrationCoefficientD2),
    ("e2", FrameParamKey::MassCalibrationCoefficientE2),
    ("f2", FrameParamKey::MassCalibrationCoefficientF2),
    ("Temperature", FrameParamKey::AmbientTemperature),
    ("PressureBack", FrameParamKey::PressureBack),
    ("HighPressureFunnelPressure", FrameParamKey::PressureFunnel),
    ("IonFunnelTrapPressure", FrameParamKey::PressureTrap),
    ("StartTime", FrameParamKey::StartTimeMinutes),
    ("IMFProfile", FrameParamKey::MultiplexingEncodingSequence),
];

/// Historical `Global_Parameters` column name -> modern [`GlobalParamKey`].
const GLOBAL_ALIASES: &[(&str, GlobalParamKey)] = &[
    ("DateStarted", GlobalParamKey::DateStarted),
    ("NumFrames", GlobalParamKey::NumFrames),
    ("TOFIntensityType", GlobalParamKey::TofIntensityType),
    ("PrescanTOFPulses", GlobalParamKey::PrescanTofPulses),
    ("PrescanAccumulations", GlobalParamKey::PrescanAccumulations),
    ("PrescanTICThreshold", GlobalParamKey::PrescanTicThreshold),
    ("PrescanContinuous", GlobalParamKey::PrescanContinuous),
    ("Instrument_Name", GlobalParamKey::InstrumentName),
];

pub(super) fn frame_alias(name: &str) -> Option<FrameParamKey> {
    FRAME_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .map(|(_, key)| *key)
}

pub(super) fn global_alias(name: &str) -> Option<GlobalParamKey> {
    GLOBAL_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .map(|(_, key)| *key)
}
