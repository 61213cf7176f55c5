//! SPECSUS2018 parameters and configuration
//!
//! All tolerances and limits the analysis engine depends on, with the
//! defaults mandated by the EGEA suspension-tester specification. A
//! parameter set is built once, validated eagerly, and then passed by
//! reference into every analyzer — there is no process-wide mutable state.
//!
//! ## Key parameters
//!
//! | Parameter | Default | Meaning |
//! |-----------|---------|---------|
//! | `min_calc_freq` / `max_calc_freq` | 6 / 18 Hz | analyzed frequency window |
//! | `phase_shift_min` (M1 / N1) | 35° / 30° | absolute pass criterion φmin |
//! | `rfst_fmin_pct` / `rfst_fmax_pct` | 25 % | static-weight crossing window |
//! | `pass_mul_ph` / `stop_mul_ph`, `eps_ph` | 2 / 4, 0.01 | per-cycle phase filter contract |
//! | `amplitude_pass_hz` / `amplitude_stop_hz` | 50 / 130 Hz | wideband amplitude filter edges |
//! | `a_rig`, `b_rig` | 0.571, 46.0 | tire rigidity line |
//! | `dyn_cal_err` | 4 N/Hz | dynamic calibration error budget |
//!
//! ## Example
//!
//! ```rust
//! use egea_core::params::{EgeaParams, VehicleType};
//!
//! let params = EgeaParams::builder()
//!     .frequency_window(6.0, 18.0)
//!     .platform_amplitude_mm(3.0)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.phase_shift_min(VehicleType::M1), 35.0);
//! assert_eq!(params.f_under_lim(500.0), 5.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{EgeaError, EgeaResult};

/// Vehicle class under test.
///
/// The absolute phase-shift criterion differs per class; everything else is
/// shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    /// Passenger cars.
    M1,
    /// Light commercial vehicles.
    N1,
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::M1 => write!(f, "M1"),
            Self::N1 => write!(f, "N1"),
        }
    }
}

impl Default for VehicleType {
    fn default() -> Self {
        Self::M1
    }
}

/// Complete parameter set for one test evaluation.
///
/// Immutable after construction; analyzers hold a copy and never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EgeaParams {
    /// Lower bound of the analyzed frequency window in Hz.
    pub min_calc_freq: f64,
    /// Upper bound of the analyzed frequency window in Hz.
    pub max_calc_freq: f64,
    /// Absolute φmin criterion for M1 vehicles in degrees.
    pub phase_shift_min_m1: f64,
    /// Absolute φmin criterion for N1 vehicles in degrees.
    pub phase_shift_min_n1: f64,
    /// Lower static-weight window margin as % of the cycle peak-to-peak force.
    pub rfst_fmin_pct: f64,
    /// Upper static-weight window margin as % of the cycle peak-to-peak force.
    pub rfst_fmax_pct: f64,
    /// Phase filter passband edge as a multiple of the cycle frequency.
    pub pass_mul_ph: u32,
    /// Phase filter stopband edge as a multiple of the cycle frequency.
    pub stop_mul_ph: u32,
    /// Phase filter ripple budget.
    pub eps_ph: f64,
    /// Amplitude filter passband edge in Hz.
    pub amplitude_pass_hz: f64,
    /// Amplitude filter stopband edge in Hz.
    pub amplitude_stop_hz: f64,
    /// Underflow limit as % of the static weight.
    pub f_under_lim_pct: f64,
    /// Hardware overflow limit in N, when the rig reports one.
    pub f_over_lim: Option<f64>,
    /// Nominal platform oscillation amplitude ep in mm.
    pub platform_amplitude_mm: f64,
    /// Rigidity line slope coefficient.
    pub a_rig: f64,
    /// Rigidity line intercept in N/mm.
    pub b_rig: f64,
    /// Rigidity below this limit raises the underinflation warning, N/mm.
    pub rig_lo_lim: f64,
    /// Rigidity above this limit raises the overinflation warning, N/mm.
    pub rig_hi_lim: f64,
    /// Dynamic calibration error budget in N per Hz.
    pub dyn_cal_err: f64,
    /// Relative axle criterion for RFAmax imbalance in %.
    pub rc_rfa_max_pct: f64,
    /// Relative axle criterion for φmin imbalance in %.
    pub rc_phi_min_pct: f64,
    /// Relative axle criterion for rigidity imbalance in %.
    pub rc_rigidity_pct: f64,
    /// Minimum number of samples per input trace.
    pub min_samples: usize,
}

impl Default for EgeaParams {
    fn default() -> Self {
        Self {
            min_calc_freq: 6.0,
            max_calc_freq: 18.0,
            phase_shift_min_m1: 35.0,
            phase_shift_min_n1: 30.0,
            rfst_fmin_pct: 25.0,
            rfst_fmax_pct: 25.0,
            pass_mul_ph: 2,
            stop_mul_ph: 4,
            eps_ph: 0.01,
            amplitude_pass_hz: 50.0,
            amplitude_stop_hz: 130.0,
            f_under_lim_pct: 1.0,
            f_over_lim: None,
            platform_amplitude_mm: 3.0,
            a_rig: 0.571,
            b_rig: 46.0,
            rig_lo_lim: 160.0,
            rig_hi_lim: 400.0,
            dyn_cal_err: 4.0,
            rc_rfa_max_pct: 30.0,
            rc_phi_min_pct: 30.0,
            rc_rigidity_pct: 35.0,
            min_samples: 100,
        }
    }
}

impl EgeaParams {
    /// Create a builder seeded with the SPECSUS2018 defaults.
    pub fn builder() -> EgeaParamsBuilder {
        EgeaParamsBuilder::default()
    }

    /// Absolute φmin criterion for the given vehicle class, in degrees.
    pub fn phase_shift_min(&self, vehicle_type: VehicleType) -> f64 {
        match vehicle_type {
            VehicleType::M1 => self.phase_shift_min_m1,
            VehicleType::N1 => self.phase_shift_min_n1,
        }
    }

    /// Underflow limit for a given static weight: `Fst * FUnderLimPerc / 100`.
    pub fn f_under_lim(&self, static_weight: f64) -> f64 {
        static_weight * self.f_under_lim_pct / 100.0
    }

    /// Minimum dwell at the 25 Hz sweep start before measurement may begin,
    /// in milliseconds: `Fst * 0.16 + 1200`.
    pub fn delta_t25_ms(&self, static_weight: f64) -> f64 {
        static_weight * 0.16 + 1200.0
    }

    /// Plausibility window for a wheel weight in daN (100–1100).
    pub fn weight_in_range(&self, weight_dan: f64) -> bool {
        (100.0..=1100.0).contains(&weight_dan)
    }

    fn validate(&self) -> EgeaResult<()> {
        if self.min_calc_freq >= self.max_calc_freq {
            return Err(EgeaError::EmptyFrequencyWindow {
                min: self.min_calc_freq,
                max: self.max_calc_freq,
            });
        }
        for (name, value) in [
            ("min_calc_freq", self.min_calc_freq),
            ("phase_shift_min_m1", self.phase_shift_min_m1),
            ("phase_shift_min_n1", self.phase_shift_min_n1),
            ("eps_ph", self.eps_ph),
            ("amplitude_pass_hz", self.amplitude_pass_hz),
            ("platform_amplitude_mm", self.platform_amplitude_mm),
            ("dyn_cal_err", self.dyn_cal_err),
            ("rig_lo_lim", self.rig_lo_lim),
        ] {
            if value <= 0.0 {
                return Err(EgeaError::NonPositiveParameter { name, value });
            }
        }
        if self.amplitude_stop_hz <= self.amplitude_pass_hz {
            return Err(EgeaError::NonPositiveParameter {
                name: "amplitude_stop_hz - amplitude_pass_hz",
                value: self.amplitude_stop_hz - self.amplitude_pass_hz,
            });
        }
        for (name, value) in [
            ("rfst_fmin_pct", self.rfst_fmin_pct),
            ("rfst_fmax_pct", self.rfst_fmax_pct),
            ("f_under_lim_pct", self.f_under_lim_pct),
            ("rc_rfa_max_pct", self.rc_rfa_max_pct),
            ("rc_phi_min_pct", self.rc_phi_min_pct),
            ("rc_rigidity_pct", self.rc_rigidity_pct),
        ] {
            if value <= 0.0 || value >= 100.0 {
                return Err(EgeaError::PercentageOutOfRange { name, value });
            }
        }
        if self.pass_mul_ph >= self.stop_mul_ph {
            return Err(EgeaError::FilterEdgesInverted {
                pass_mul: self.pass_mul_ph,
                stop_mul: self.stop_mul_ph,
            });
        }
        if self.min_samples < 2 {
            return Err(EgeaError::MinSamplesTooSmall(self.min_samples));
        }
        Ok(())
    }
}

/// Builder for [`EgeaParams`].
///
/// `build` validates the final set and fails fast on a setup mistake; this
/// is the only place the engine raises a hard error.
#[derive(Debug, Default)]
pub struct EgeaParamsBuilder {
    params: EgeaParams,
}

impl EgeaParamsBuilder {
    /// Set the analyzed frequency window in Hz.
    pub fn frequency_window(mut self, min_hz: f64, max_hz: f64) -> Self {
        self.params.min_calc_freq = min_hz;
        self.params.max_calc_freq = max_hz;
        self
    }

    /// Set the absolute φmin criteria per vehicle class, in degrees.
    pub fn phase_shift_min(mut self, m1_deg: f64, n1_deg: f64) -> Self {
        self.params.phase_shift_min_m1 = m1_deg;
        self.params.phase_shift_min_n1 = n1_deg;
        self
    }

    /// Set the static-weight crossing window margins in percent.
    pub fn rfst_window_pct(mut self, fmin_pct: f64, fmax_pct: f64) -> Self {
        self.params.rfst_fmin_pct = fmin_pct;
        self.params.rfst_fmax_pct = fmax_pct;
        self
    }

    /// Set the nominal platform amplitude ep in mm.
    pub fn platform_amplitude_mm(mut self, ep_mm: f64) -> Self {
        self.params.platform_amplitude_mm = ep_mm;
        self
    }

    /// Set the rigidity line coefficients.
    pub fn rigidity_line(mut self, a_rig: f64, b_rig: f64) -> Self {
        self.params.a_rig = a_rig;
        self.params.b_rig = b_rig;
        self
    }

    /// Set the rigidity warning limits in N/mm.
    pub fn rigidity_limits(mut self, lo: f64, hi: f64) -> Self {
        self.params.rig_lo_lim = lo;
        self.params.rig_hi_lim = hi;
        self
    }

    /// Set the dynamic calibration error budget in N/Hz.
    pub fn dyn_cal_err(mut self, n_per_hz: f64) -> Self {
        self.params.dyn_cal_err = n_per_hz;
        self
    }

    /// Set the hardware overflow limit in N.
    pub fn f_over_lim(mut self, limit_n: f64) -> Self {
        self.params.f_over_lim = Some(limit_n);
        self
    }

    /// Set the relative axle criteria in percent (RFAmax, φmin, rigidity).
    pub fn relative_criteria_pct(mut self, rfa: f64, phi: f64, rig: f64) -> Self {
        self.params.rc_rfa_max_pct = rfa;
        self.params.rc_phi_min_pct = phi;
        self.params.rc_rigidity_pct = rig;
        self
    }

    /// Set the minimum sample count accepted per trace.
    pub fn min_samples(mut self, n: usize) -> Self {
        self.params.min_samples = n;
        self
    }

    /// Validate and return the parameter set.
    pub fn build(self) -> EgeaResult<EgeaParams> {
        self.params.validate()?;
        Ok(self.params)
    }
}
