//! Test orchestration
//!
//! The caller-facing composition root: takes one recorded sweep per wheel,
//! runs calibration, phase, force and rigidity analysis, applies the
//! criteria and hands back a verdict record. Holds no state between runs —
//! two wheels, or two hundred, may be evaluated concurrently as long as
//! each call gets its own input.
//!
//! ## Example
//!
//! ```rust,no_run
//! use egea_core::params::{EgeaParams, VehicleType};
//! use egea_core::processor::{EgeaProcessor, WheelTestInput};
//!
//! # fn acquire() -> (Vec<f64>, Vec<f64>, Vec<f64>) { unimplemented!() }
//! let (position, force, time) = acquire();
//! let params = EgeaParams::builder().build().unwrap();
//! let processor = EgeaProcessor::new(&params);
//!
//! let input = WheelTestInput::new("FL", VehicleType::M1, position, force, time, 500.0);
//! let result = processor.run_wheel_test(&input);
//! println!("φmin = {:?}, pass = {}", result.phase_shift_result.min_phase_shift, result.overall_pass);
//! ```

use tracing::{info, warn};

use crate::calibration::DynamicCalibrator;
use crate::criteria::CriteriaEvaluator;
use crate::force::ForceAnalyzer;
use crate::params::{EgeaParams, VehicleType};
use crate::phase_shift::PhaseShiftAnalyzer;
use crate::results::{
    AxleTestResult, DynamicCalibrationResult, ForceAnalysisResult, PhaseShiftResult,
    RigidityResult, WheelTestResult,
};
use crate::rigidity::RigidityCalculator;
use crate::signal::validate_test_traces;

/// Recorded sweep and metadata for one wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelTestInput {
    /// Wheel position label, e.g. "FL".
    pub wheel_id: String,
    /// Vehicle class to evaluate against.
    pub vehicle_type: VehicleType,
    /// Platform position trace, mm.
    pub platform_position: Vec<f64>,
    /// Tire contact force trace, N.
    pub tire_force: Vec<f64>,
    /// Sample instants, seconds, strictly increasing.
    pub time: Vec<f64>,
    /// Static wheel weight Fst, N.
    pub static_weight: f64,
    /// Unloaded-platform force trace for dynamic calibration, when recorded.
    pub platform_force: Option<Vec<f64>>,
    /// Platform mass, kg; telemetry only.
    pub platform_mass: f64,
    /// Measured 25 Hz reference amplitude for the rigidity estimate, N.
    pub h25: Option<f64>,
}

impl WheelTestInput {
    /// Assemble a test input from the mandatory traces.
    pub fn new(
        wheel_id: impl Into<String>,
        vehicle_type: VehicleType,
        platform_position: Vec<f64>,
        tire_force: Vec<f64>,
        time: Vec<f64>,
        static_weight: f64,
    ) -> Self {
        Self {
            wheel_id: wheel_id.into(),
            vehicle_type,
            platform_position,
            tire_force,
            time,
            static_weight,
            platform_force: None,
            platform_mass: 20.0,
            h25: None,
        }
    }

    /// Attach an unloaded-platform trace for dynamic calibration.
    pub fn with_platform_force(mut self, platform_force: Vec<f64>, platform_mass: f64) -> Self {
        self.platform_force = Some(platform_force);
        self.platform_mass = platform_mass;
        self
    }

    /// Attach a measured 25 Hz reference amplitude.
    pub fn with_h25(mut self, h25: f64) -> Self {
        self.h25 = Some(h25);
        self
    }
}

/// Composition root for complete wheel and axle tests.
#[derive(Debug, Clone)]
pub struct EgeaProcessor {
    params: EgeaParams,
    phase: PhaseShiftAnalyzer,
    force: ForceAnalyzer,
    rigidity: RigidityCalculator,
    calibration: DynamicCalibrator,
    criteria: CriteriaEvaluator,
}

impl EgeaProcessor {
    /// Create a processor bound to a parameter snapshot.
    pub fn new(params: &EgeaParams) -> Self {
        Self {
            params: params.clone(),
            phase: PhaseShiftAnalyzer::new(params),
            force: ForceAnalyzer::new(params),
            rigidity: RigidityCalculator::new(params),
            calibration: DynamicCalibrator::new(params),
            criteria: CriteriaEvaluator::new(params),
        }
    }

    /// Run the complete analysis chain for one wheel.
    pub fn run_wheel_test(&self, input: &WheelTestInput) -> WheelTestResult {
        if let Err(err) = validate_test_traces(
            &input.platform_position,
            &input.tire_force,
            &input.time,
            input.static_weight,
            self.params.min_samples,
        ) {
            warn!(wheel = %input.wheel_id, %err, "wheel test rejected input");
            return self.rejected_result(input, err.to_string());
        }

        let mut error_messages = Vec::new();

        let dynamic_calibration = match &input.platform_force {
            Some(platform_force) => {
                let result =
                    self.calibration
                        .calibrate(platform_force, &input.time, input.platform_mass);
                if let Some(message) = &result.error_message {
                    error_messages.push(message.clone());
                }
                result
            }
            None => DynamicCalibrationResult::skipped(),
        };

        let phase_shift_result = self.phase.analyze(
            &input.platform_position,
            &input.tire_force,
            &input.time,
            input.static_weight,
        );
        if let Some(message) = &phase_shift_result.error_message {
            error_messages.push(message.clone());
        }

        let force_analysis =
            self.force
                .analyze(&input.tire_force, &input.time, input.static_weight);

        let h25 = input
            .h25
            .unwrap_or_else(|| RigidityCalculator::h25_fallback(&input.tire_force));
        let rigidity_result = self.rigidity.calculate(h25);

        let absolute_criterion_pass = self
            .criteria
            .absolute_criterion(&phase_shift_result, input.vehicle_type);
        let overall_pass = self
            .criteria
            .wheel_overall_pass(&phase_shift_result, absolute_criterion_pass);

        info!(
            wheel = %input.wheel_id,
            phi_min = ?phase_shift_result.min_phase_shift,
            overall_pass,
            "wheel test complete"
        );

        WheelTestResult {
            wheel_id: input.wheel_id.clone(),
            vehicle_type: input.vehicle_type,
            phase_shift_result,
            force_analysis,
            rigidity_result,
            dynamic_calibration,
            absolute_criterion_pass,
            relative_criterion_pass: true,
            overall_pass,
            error_messages,
        }
    }

    /// Run both wheels of an axle and evaluate the relative criteria.
    #[cfg(feature = "parallel")]
    pub fn run_axle_test(
        &self,
        axle_id: &str,
        left: &WheelTestInput,
        right: &WheelTestInput,
    ) -> AxleTestResult {
        let (left_result, right_result) =
            rayon::join(|| self.run_wheel_test(left), || self.run_wheel_test(right));
        self.criteria.evaluate_axle(axle_id, left_result, right_result)
    }

    /// Run both wheels of an axle and evaluate the relative criteria.
    #[cfg(not(feature = "parallel"))]
    pub fn run_axle_test(
        &self,
        axle_id: &str,
        left: &WheelTestInput,
        right: &WheelTestInput,
    ) -> AxleTestResult {
        let left_result = self.run_wheel_test(left);
        let right_result = self.run_wheel_test(right);
        self.criteria.evaluate_axle(axle_id, left_result, right_result)
    }

    /// Neutral result for input that failed validation.
    fn rejected_result(&self, input: &WheelTestInput, message: String) -> WheelTestResult {
        let mut phase = PhaseShiftResult::empty(input.static_weight);
        phase.error_message = Some(message.clone());

        WheelTestResult {
            wheel_id: input.wheel_id.clone(),
            vehicle_type: input.vehicle_type,
            phase_shift_result: phase,
            force_analysis: ForceAnalysisResult {
                fmin: 0.0,
                fmax: 0.0,
                fa_max: 0.0,
                resonant_frequency: 0.0,
                rfa_max: 0.0,
                static_weight: input.static_weight,
                f_under_flag: false,
                f_over_flag: false,
            },
            rigidity_result: RigidityResult {
                rigidity: 0.0,
                h25: 0.0,
                platform_amplitude: self.params.platform_amplitude_mm,
                warning_underinflation: false,
                warning_overinflation: false,
            },
            dynamic_calibration: DynamicCalibrationResult::skipped(),
            absolute_criterion_pass: false,
            relative_criterion_pass: true,
            overall_pass: false,
            error_messages: vec![message],
        }
    }
}
