//! Dynamic calibration of the unloaded platform
//!
//! Before a test, the rig oscillates the empty platform through the sweep
//! and records the force sensor. Whatever the sensor reports then is
//! mechanical and electrical noise; it must stay inside a frequency-
//! proportional budget (`dyn_cal_err` N per Hz) or phase and amplitude
//! readings taken later against a loaded wheel cannot be trusted.

use tracing::{debug, warn};

use crate::params::EgeaParams;
use crate::results::DynamicCalibrationResult;
use crate::signal::{validate_force_trace, SignalProcessor};

/// Unloaded-platform calibration check.
#[derive(Debug, Clone)]
pub struct DynamicCalibrator {
    params: EgeaParams,
    signal: SignalProcessor,
}

impl DynamicCalibrator {
    /// Create a calibrator bound to a parameter snapshot.
    pub fn new(params: &EgeaParams) -> Self {
        Self {
            params: params.clone(),
            signal: SignalProcessor::new(params),
        }
    }

    /// Validate an unloaded-platform force trace.
    ///
    /// `platform_mass` does not enter the budget formula; it is recorded for
    /// rig telemetry only.
    pub fn calibrate(
        &self,
        platform_force: &[f64],
        time: &[f64],
        platform_mass: f64,
    ) -> DynamicCalibrationResult {
        debug!(platform_mass, "dynamic calibration start");

        // The budget works on force alone, so a nominal weight stands in for
        // the validation's positivity check
        if let Err(err) = validate_force_trace(platform_force, time, 1.0, self.params.min_samples) {
            warn!(%err, "calibration rejected input");
            return DynamicCalibrationResult {
                max_fp: Vec::new(),
                delta_period: Vec::new(),
                frequencies: Vec::new(),
                is_valid: false,
                error_message: Some(err.to_string()),
            };
        }

        let sample_rate = 1.0 / (time[1] - time[0]);
        let tops = self.signal.find_platform_tops(platform_force, sample_rate);

        let mut max_fp = Vec::new();
        let mut delta_period = Vec::new();
        let mut frequencies = Vec::new();

        for bounds in tops.windows(2) {
            let frequency = self.signal.cycle_frequency(bounds[0], bounds[1], time);
            if !(self.params.min_calc_freq..=self.params.max_calc_freq).contains(&frequency) {
                continue;
            }

            let cycle = &platform_force[bounds[0]..bounds[1]];
            let amplitude = cycle.iter().fold(0.0_f64, |acc, &v| acc.max(v.abs()));

            max_fp.push(amplitude);
            delta_period.push(0.0);
            frequencies.push(frequency);
        }

        let mut worst_excess = 0.0_f64;
        for (amplitude, frequency) in max_fp.iter().zip(&frequencies) {
            let allowed = self.params.dyn_cal_err * frequency;
            if *amplitude > allowed {
                worst_excess = worst_excess.max(amplitude - allowed);
            }
        }

        let is_valid = worst_excess <= 0.0;
        let error_message = if is_valid {
            None
        } else {
            warn!(worst_excess, "calibration over budget");
            Some(format!(
                "calibration noise exceeds budget by {worst_excess:.2} N"
            ))
        };

        DynamicCalibrationResult {
            max_fp,
            delta_period,
            frequencies,
            is_valid,
            error_message,
        }
    }
}
