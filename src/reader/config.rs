/// Configuration for [`super::Reader`] (§5 "Reader behavior").
#[derive(Debug, Clone, Copy)]
pub struct ReaderConfig {
    /// Number of decoded scans kept in the spectrum LRU cache (§5 state).
    pub spectrum_cache_capacity: usize,

    /// Reference pressure used by [`crate::calibration::corrected_drift_time_ms`].
    pub standard_pressure_torr: f64,

    /// Pressure values at or above this threshold are assumed to already be
    /// in milliTorr rather than Torr, and are divided by 1000 before use
    /// (§4.6 pressure-unit detection).
    pub milli_torr_threshold: f64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            spectrum_cache_capacity: 10,
            standard_pressure_torr: crate::calibration::STANDARD_PRESSURE_TORR,
            milli_torr_threshold: 100.0,
        }
    }
}
