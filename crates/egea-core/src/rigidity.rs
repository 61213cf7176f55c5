//! Tire rigidity estimation
//!
//! The rigidity follows a calibrated line through the ratio of the 25 Hz
//! reference force amplitude H25 and the platform amplitude ep:
//! `rig = a_rig * (H25 / ep) + b_rig`. Out-of-band values raise inflation
//! warnings; they never fail a test on their own.

use crate::params::EgeaParams;
use crate::results::RigidityResult;
use crate::signal::std_dev;

/// Rigidity calculator bound to the calibrated line coefficients.
#[derive(Debug, Clone)]
pub struct RigidityCalculator {
    params: EgeaParams,
}

impl RigidityCalculator {
    /// Create a calculator bound to a parameter snapshot.
    pub fn new(params: &EgeaParams) -> Self {
        Self {
            params: params.clone(),
        }
    }

    /// Rigidity from a measured 25 Hz reference amplitude, using the
    /// configured platform amplitude.
    pub fn calculate(&self, h25: f64) -> RigidityResult {
        self.calculate_with_amplitude(h25, self.params.platform_amplitude_mm)
    }

    /// Rigidity from a measured 25 Hz reference amplitude and an explicit
    /// platform amplitude in mm.
    pub fn calculate_with_amplitude(&self, h25: f64, platform_amplitude: f64) -> RigidityResult {
        let rigidity = self.params.a_rig * (h25 / platform_amplitude) + self.params.b_rig;

        RigidityResult {
            rigidity,
            h25,
            platform_amplitude,
            warning_underinflation: rigidity < self.params.rig_lo_lim,
            warning_overinflation: rigidity > self.params.rig_hi_lim,
        }
    }

    /// Rough H25 substitute when no dedicated 25 Hz calibration sweep was
    /// recorded: twice the standard deviation of the force trace. An
    /// approximation only — prefer a measured amplitude whenever the rig
    /// provides one.
    pub fn h25_fallback(tire_force: &[f64]) -> f64 {
        2.0 * std_dev(tire_force)
    }
}
