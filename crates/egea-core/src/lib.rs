//! # EGEA Suspension Analysis Core
//!
//! Analysis engine for suspension ("shock absorber") test rigs following
//! the EGEA SPECSUS2018 procedure. A rig oscillates a vehicle wheel on a
//! platform through a frequency sweep while recording platform position and
//! tire contact force; this crate turns those two traces plus the static
//! wheel weight into a pass/fail verdict.
//!
//! ## Measurement pipeline
//!
//! ```text
//! position ─┬─> PhaseShiftAnalyzer ──> φmin, φmax, RFAmax, flags ─┐
//! force ────┤                                                     │
//! time ─────┼─> ForceAnalyzer ───────> Fmin/Fmax, FAmax, fres ────┼─> CriteriaEvaluator
//!           ├─> RigidityCalculator ──> rigidity, warnings ────────┘        │
//!           └─> DynamicCalibrator ───> noise budget check                  v
//!                                                        wheel verdict, axle verdict
//! ```
//!
//! The primary metric is the minimum phase shift φmin between platform
//! motion and tire force across the sweep: a worn damper lets the wheel
//! bounce nearly in phase with the platform, a healthy one forces a lag.
//! Per vehicle class, φmin must clear an absolute threshold; on an axle the
//! two wheels must also behave alike (relative criteria).
//!
//! ## Example
//!
//! ```rust,no_run
//! use egea_core::prelude::*;
//!
//! # fn acquire_sweep() -> (Vec<f64>, Vec<f64>, Vec<f64>) { unimplemented!() }
//! let params = EgeaParams::builder()
//!     .frequency_window(6.0, 18.0)
//!     .build()
//!     .expect("valid configuration");
//! let processor = EgeaProcessor::new(&params);
//!
//! let (position, force, time) = acquire_sweep();
//! let input = WheelTestInput::new("FL", VehicleType::M1, position, force, time, 520.0);
//! let result = processor.run_wheel_test(&input);
//!
//! match result.verdict() {
//!     TestVerdict::Pass => println!("damper ok, φmin {:?}", result.phase_shift_result.min_phase_shift),
//!     TestVerdict::Fail => println!("damper worn"),
//!     TestVerdict::Invalid => println!("measurement unusable: {:?}", result.error_messages),
//! }
//! ```
//!
//! The engine performs no I/O and keeps no state between runs; acquisition,
//! transport and persistence live with the caller. All results are plain
//! serializable data.

pub mod calibration;
pub mod criteria;
pub mod filters;
pub mod force;
pub mod params;
pub mod phase_shift;
pub mod processor;
pub mod results;
pub mod rigidity;
pub mod signal;
pub mod types;

// Re-export main types
pub use calibration::DynamicCalibrator;
pub use criteria::{imbalance, CriteriaEvaluator};
pub use force::ForceAnalyzer;
pub use params::{EgeaParams, EgeaParamsBuilder, VehicleType};
pub use phase_shift::PhaseShiftAnalyzer;
pub use processor::{EgeaProcessor, WheelTestInput};
pub use results::{
    AxleTestResult, DynamicCalibrationResult, ForceAnalysisResult, PhaseShiftPeriod,
    PhaseShiftResult, RigidityResult, TestVerdict, WheelSummary, WheelTestResult,
};
pub use rigidity::RigidityCalculator;
pub use signal::SignalProcessor;
pub use types::{Crossing, CrossingDirection, EgeaError, EgeaResult, Sample};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::params::{EgeaParams, VehicleType};
    pub use crate::processor::{EgeaProcessor, WheelTestInput};
    pub use crate::results::{AxleTestResult, TestVerdict, WheelTestResult};
    pub use crate::types::{EgeaError, EgeaResult};
}
