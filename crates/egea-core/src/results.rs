//! Test result records
//!
//! Plain immutable data produced by the analyzers and consumed by the
//! criteria evaluation and, outside this crate, by whatever transport or
//! display layer the caller runs. Every type serializes as-is; none carries
//! behavior beyond derived accessors. Results are created once per test
//! invocation and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::params::VehicleType;
use crate::signal::{gaussian_smooth, resample_equidistant};

/// Final classification of a wheel or axle test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestVerdict {
    /// All criteria met.
    Pass,
    /// Measurement valid, at least one criterion missed.
    Fail,
    /// Measurement itself unusable (no valid cycles, saturation, bad input).
    Invalid,
}

/// One detected oscillation cycle of the phase-shift measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseShiftPeriod {
    /// Position of this cycle in the sweep, 1-based.
    pub period_index: usize,
    /// Cycle frequency in Hz.
    pub frequency: f64,
    /// Phase lag between platform motion and tire force, degrees in [0, 180].
    pub phase_shift: f64,
    /// Crossing midpoint of the force trace, cycle-relative seconds.
    pub fref: f64,
    /// Platform peak instant, cycle-relative seconds.
    pub top_p: f64,
    /// Maximum force in the cycle, N.
    pub max_force: f64,
    /// Minimum force in the cycle, N.
    pub min_force: f64,
    /// Peak-to-peak force in the cycle, N.
    pub delta_force: f64,
    /// Static wheel weight, N.
    pub static_weight: f64,
    /// Cycle passed all per-cycle checks.
    pub is_valid: bool,
}

impl PhaseShiftPeriod {
    /// Relative force amplitude of this cycle as % of the static weight.
    pub fn rfa(&self) -> f64 {
        if self.static_weight == 0.0 {
            return 0.0;
        }
        let amplitude = (self.max_force - self.static_weight)
            .abs()
            .max((self.min_force - self.static_weight).abs());
        amplitude / self.static_weight * 100.0
    }
}

/// Aggregated phase-shift analysis over a full sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseShiftResult {
    /// Every analyzed cycle, valid or not, in sweep order.
    pub periods: Vec<PhaseShiftPeriod>,
    /// Minimum phase shift across valid cycles, degrees.
    pub min_phase_shift: Option<f64>,
    /// Frequency at which the minimum occurred, Hz.
    pub min_phase_frequency: Option<f64>,
    /// Phase shift near the 18 Hz top of the window, degrees.
    pub max_phase_shift: Option<f64>,
    /// Largest per-cycle relative force amplitude, %.
    pub rfa_max_value: Option<f64>,
    /// Frequency of the RFAmax cycle, Hz.
    pub rfa_max_frequency: Option<f64>,
    /// Static wheel weight, N.
    pub static_weight: f64,
    /// Force dipped below the underflow limit somewhere in the sweep.
    pub f_under_flag: bool,
    /// Force exceeded the hardware overflow limit somewhere in the sweep.
    pub f_over_flag: bool,
    /// Diagnostics for traces rejected before analysis.
    pub error_message: Option<String>,
}

impl PhaseShiftResult {
    /// An empty result for a sweep that produced no usable cycles.
    pub fn empty(static_weight: f64) -> Self {
        Self {
            periods: Vec::new(),
            min_phase_shift: None,
            min_phase_frequency: None,
            max_phase_shift: None,
            rfa_max_value: None,
            rfa_max_frequency: None,
            static_weight,
            f_under_flag: false,
            f_over_flag: false,
            error_message: None,
        }
    }

    /// Usable measurement: a minimum exists, at least one period survived
    /// and the signal never underflowed.
    pub fn is_valid(&self) -> bool {
        self.min_phase_shift.is_some() && !self.periods.is_empty() && !self.f_under_flag
    }

    /// Integer-truncated φmin as shown on the tester display.
    pub fn integer_min_phase(&self) -> Option<i64> {
        self.min_phase_shift.map(|p| p as i64)
    }

    /// Phase shifts of the valid periods, in sweep order.
    pub fn phase_shifts(&self) -> Vec<f64> {
        self.periods
            .iter()
            .filter(|p| p.is_valid)
            .map(|p| p.phase_shift)
            .collect()
    }

    /// Frequencies of the valid periods, in sweep order.
    pub fn frequencies(&self) -> Vec<f64> {
        self.periods
            .iter()
            .filter(|p| p.is_valid)
            .map(|p| p.frequency)
            .collect()
    }

    /// Phase-over-frequency curve resampled onto an equidistant axis and
    /// Gaussian-smoothed, for display and reporting.
    pub fn equidistant_curve(&self, freq_step: f64, smooth_order: usize) -> (Vec<f64>, Vec<f64>) {
        let (grid, phases) = resample_equidistant(&self.frequencies(), &self.phase_shifts(), freq_step);
        let smoothed = gaussian_smooth(&phases, smooth_order);
        (grid, smoothed)
    }
}

/// Whole-trace force analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceAnalysisResult {
    /// Minimum of the amplitude-filtered force trace, N.
    pub fmin: f64,
    /// Maximum of the amplitude-filtered force trace, N.
    pub fmax: f64,
    /// Maximum force amplitude relative to the static weight, N.
    pub fa_max: f64,
    /// Resonance estimate from the extremum instant, Hz (0 when undefined).
    pub resonant_frequency: f64,
    /// Relative force amplitude, % of static weight.
    pub rfa_max: f64,
    /// Static wheel weight, N.
    pub static_weight: f64,
    /// Underflow flag on the filtered trace.
    pub f_under_flag: bool,
    /// Overflow flag on the filtered trace.
    pub f_over_flag: bool,
}

/// Tire rigidity estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidityResult {
    /// Estimated tire rigidity, N/mm.
    pub rigidity: f64,
    /// Force amplitude at the 25 Hz reference, N.
    pub h25: f64,
    /// Platform amplitude ep used, mm.
    pub platform_amplitude: f64,
    /// Rigidity below the low limit.
    pub warning_underinflation: bool,
    /// Rigidity above the high limit.
    pub warning_overinflation: bool,
}

impl RigidityResult {
    /// Neither inflation warning raised.
    pub fn pressure_ok(&self) -> bool {
        !(self.warning_underinflation || self.warning_overinflation)
    }
}

/// Outcome of the unloaded-platform calibration check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicCalibrationResult {
    /// Largest absolute platform force per analyzed cycle, N.
    pub max_fp: Vec<f64>,
    /// Per-cycle phase deviation, degrees (reserved, currently zero).
    pub delta_period: Vec<f64>,
    /// Frequency of each analyzed cycle, Hz.
    pub frequencies: Vec<f64>,
    /// Every cycle stayed inside the frequency-proportional budget.
    pub is_valid: bool,
    /// Worst violation, when any.
    pub error_message: Option<String>,
}

impl DynamicCalibrationResult {
    /// A trivially valid result for runs without a calibration trace.
    pub fn skipped() -> Self {
        Self {
            max_fp: Vec::new(),
            delta_period: Vec::new(),
            frequencies: Vec::new(),
            is_valid: true,
            error_message: None,
        }
    }

    /// Largest cycle amplitude recorded, N.
    pub fn worst_amplitude(&self) -> Option<f64> {
        self.max_fp.iter().copied().reduce(f64::max)
    }
}

/// Complete verdict for a single wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelTestResult {
    /// Wheel position label, e.g. "FL".
    pub wheel_id: String,
    /// Vehicle class the criteria were evaluated against.
    pub vehicle_type: VehicleType,
    /// Phase-shift analysis.
    pub phase_shift_result: PhaseShiftResult,
    /// Force analysis.
    pub force_analysis: ForceAnalysisResult,
    /// Rigidity estimate.
    pub rigidity_result: RigidityResult,
    /// Calibration outcome (trivially valid when no trace was supplied).
    pub dynamic_calibration: DynamicCalibrationResult,
    /// φmin met the class threshold.
    pub absolute_criterion_pass: bool,
    /// Left/right comparison passed; true until an axle evaluation runs.
    pub relative_criterion_pass: bool,
    /// Absolute criterion met, no saturation, measurement valid.
    pub overall_pass: bool,
    /// Collected diagnostics.
    pub error_messages: Vec<String>,
}

impl WheelTestResult {
    /// Pass/Fail/Invalid classification.
    pub fn verdict(&self) -> TestVerdict {
        if !self.phase_shift_result.is_valid() {
            TestVerdict::Invalid
        } else if self.overall_pass {
            TestVerdict::Pass
        } else {
            TestVerdict::Fail
        }
    }

    /// Compact summary for display layers.
    pub fn summary(&self) -> WheelSummary {
        WheelSummary {
            wheel_id: self.wheel_id.clone(),
            min_phase_shift: self.phase_shift_result.min_phase_shift,
            integer_min_phase: self.phase_shift_result.integer_min_phase(),
            rfa_max: self.force_analysis.rfa_max,
            rigidity: self.rigidity_result.rigidity,
            absolute_pass: self.absolute_criterion_pass,
            overall_pass: self.overall_pass,
            static_weight: self.phase_shift_result.static_weight,
        }
    }
}

/// Display-oriented digest of a wheel test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelSummary {
    pub wheel_id: String,
    pub min_phase_shift: Option<f64>,
    pub integer_min_phase: Option<i64>,
    pub rfa_max: f64,
    pub rigidity: f64,
    pub absolute_pass: bool,
    pub overall_pass: bool,
    pub static_weight: f64,
}

/// Verdict for a complete axle: two wheels plus their balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxleTestResult {
    /// Axle label, e.g. "Front".
    pub axle_id: String,
    pub left_wheel: WheelTestResult,
    pub right_wheel: WheelTestResult,
    /// Sum of both static wheel weights, N.
    pub axle_weight: f64,
    /// RFAmax imbalance, %.
    pub d_rfa_max: Option<f64>,
    /// φmin imbalance, %.
    pub d_phi_min: Option<f64>,
    /// Integer-displayed φmin imbalance, %.
    pub d_i_phi_min: Option<f64>,
    /// Rigidity imbalance, %.
    pub d_rigidity: Option<f64>,
    /// RFAmax imbalance within its threshold.
    pub relative_rfa_max_pass: bool,
    /// φmin imbalance within its threshold.
    pub relative_phi_min_pass: bool,
    /// Rigidity imbalance within its threshold.
    pub relative_rigidity_pass: bool,
}

impl AxleTestResult {
    /// Axle passes only when both wheels pass individually and every
    /// relative criterion holds.
    pub fn overall_pass(&self) -> bool {
        self.left_wheel.overall_pass
            && self.right_wheel.overall_pass
            && self.relative_rfa_max_pass
            && self.relative_phi_min_pass
            && self.relative_rigidity_pass
    }

    /// Pass/Fail/Invalid classification for the axle.
    pub fn verdict(&self) -> TestVerdict {
        match (self.left_wheel.verdict(), self.right_wheel.verdict()) {
            (TestVerdict::Invalid, _) | (_, TestVerdict::Invalid) => TestVerdict::Invalid,
            _ if self.overall_pass() => TestVerdict::Pass,
            _ => TestVerdict::Fail,
        }
    }
}
