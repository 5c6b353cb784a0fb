//! Bin <-> m/z calibration and pressure-corrected drift time (C7).
//!
//! Calibration constants are per-frame: slope `k`, intercept `t0`, and six
//! polynomial residual-correction coefficients `a2..f2` (default zero).
//! With bin width `w` (ns), TOF correction time `Tc` (ns), and bin `b`:
//!
//! ```text
//! t  = b * w / 1000                                         (microseconds)
//! mz = (k * (t - Tc/1000 - t0))^2
//!      + (a2*t + b2*t^3 + c2*t^5 + d2*t^7 + e2*t^9 + f2*t^11)
//! ```
//!
//! See spec §4.7.

/// Per-frame calibration constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub slope: f64,
    pub intercept: f64,
    pub a2: f64,
    pub b2: f64,
    pub c2: f64,
    pub d2: f64,
    pub e2: f64,
    pub f2: f64,
    /// TOF bin width in nanoseconds (a global parameter, not per-frame).
    pub bin_width_ns: f64,
    /// TOF correction time in nanoseconds (a global parameter).
    pub tof_correction_time_ns: f64,
}

impl Calibration {
    /// Whether any polynomial residual coefficient is non-zero. When true,
    /// [`Calibration::mz_to_bin`] must refuse (§4.7).
    pub fn has_polynomial_correction(&self) -> bool {
        [self.a2, self.b2, self.c2, self.d2, self.e2, self.f2]
            .iter()
            .any(|c| *c != 0.0)
    }

    fn drift_time_us(&self, bin: f64) -> f64 {
        bin * self.bin_width_ns / 1000.0
    }

    fn polynomial(&self, t: f64) -> f64 {
        self.a2 * t
            + self.b2 * t.powi(3)
            + self.c2 * t.powi(5)
            + self.d2 * t.powi(7)
            + self.e2 * t.powi(9)
            + self.f2 * t.powi(11)
    }

    /// Convert a TOF bin number to m/z.
    pub fn bin_to_mz(&self, bin: u32) -> f64 {
        let t = self.drift_time_us(bin as f64);
        let corrected = self.slope * (t - self.tof_correction_time_ns / 1000.0 - self.intercept);
        corrected * corrected + self.polynomial(t)
    }

    /// Convert an m/z value back to the nearest TOF bin.
    ///
    /// Only defined when no polynomial residual correction is configured;
    /// queries that need the inverse under a polynomial correction must
    /// degrade to the slower scan-centric path instead (§4.7).
    pub fn mz_to_bin(&self, mz: f64) -> Result<u32, CalibrationError> {
        if self.has_polynomial_correction() {
            return Err(CalibrationError::PolynomialInverseUnsupported);
        }
        if mz < 0.0 {
            return Err(CalibrationError::NegativeMz(mz));
        }
        let t = mz.sqrt() / self.slope + self.intercept;
        let bin = t * 1000.0 / self.bin_width_ns + self.tof_correction_time_ns / (1000.0 * self.bin_width_ns);
        Ok(bin.round().max(0.0) as u32)
    }
}

/// Errors from calibration conversion.
#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    #[error("m/z-to-bin inverse is unsupported when polynomial residual correction is configured")]
    PolynomialInverseUnsupported,
    #[error("negative m/z {0} has no corresponding bin")]
    NegativeMz(f64),
}

/// Standard pressure used as the pressure-correction reference (§4.6).
pub const STANDARD_PRESSURE_TORR: f64 = 4.0;

/// Apply pressure correction to a raw drift time, per §4.6:
/// `dt_corrected = dt_raw * standard_pressure_torr / frame_pressure` when a
/// back-of-drift-tube or funnel pressure is known and positive; otherwise
/// the raw value passes through unchanged. Callers normally pass
/// [`ReaderConfig::standard_pressure_torr`](crate::reader::ReaderConfig),
/// which defaults to [`STANDARD_PRESSURE_TORR`].
pub fn corrected_drift_time_ms(raw_drift_time_ms: f64, frame_pressure_torr: Option<f64>, standard_pressure_torr: f64) -> f64 {
    match frame_pressure_torr {
        Some(p) if p > 0.0 => raw_drift_time_ms * standard_pressure_torr / p,
        _ => raw_drift_time_ms,
    }
}

/// Raw (uncorrected) drift time in milliseconds for `scan` within a frame
/// whose average TOF pulse length is `average_tof_length_ns`.
pub fn raw_drift_time_ms(average_tof_length_ns: f64, scan: u32) -> f64 {
    average_tof_length_ns * scan as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calib(slope: f64, intercept: f64) -> Calibration {
        Calibration {
            slope,
            intercept,
            a2: 0.0,
            b2: 0.0,
            c2: 0.0,
            d2: 0.0,
            e2: 0.0,
            f2: 0.0,
            bin_width_ns: 1.0,
            tof_correction_time_ns: 0.0,
        }
    }

    #[test]
    fn bin_to_mz_matches_spec_scenario_1() {
        let c = calib(0.5, 0.0);
        let mz = c.bin_to_mz(12);
        assert!((mz - 0.000036).abs() < 1e-12);
    }

    #[test]
    fn inverse_round_trips_within_one_bin_without_polynomial_terms() {
        let c = calib(0.5, 0.0);
        for bin in [0u32, 1, 12, 100, 10_000] {
            let mz = c.bin_to_mz(bin);
            let back = c.mz_to_bin(mz).unwrap();
            let diff = (back as i64 - bin as i64).abs();
            assert!(diff <= 1, "bin {bin} round-tripped to {back}");
        }
    }

    #[test]
    fn inverse_refuses_with_polynomial_correction() {
        let mut c = calib(0.5, 0.0);
        c.a2 = 0.001;
        assert!(matches!(
            c.mz_to_bin(100.0),
            Err(CalibrationError::PolynomialInverseUnsupported)
        ));
    }

    #[test]
    fn drift_time_correction_matches_spec_scenario_5() {
        let raw = raw_drift_time_ms(100_000.0, 50);
        assert!((raw - 5.0).abs() < 1e-9);
        let corrected = corrected_drift_time_ms(raw, Some(2.0), STANDARD_PRESSURE_TORR);
        assert!((corrected - 10.0).abs() < 1e-9);
        let uncorrected = corrected_drift_time_ms(raw, None, STANDARD_PRESSURE_TORR);
        assert!((uncorrected - raw).abs() < 1e-9);
        let zero_pressure = corrected_drift_time_ms(raw, Some(0.0), STANDARD_PRESSURE_TORR);
        assert!((zero_pressure - raw).abs() < 1e-9);
    }
}
