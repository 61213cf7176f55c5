//! Core types for the suspension analysis engine
//!
//! Defines the shared sample aliases and the error taxonomy. Only
//! configuration mistakes surface as hard errors; degraded or saturated
//! field data is reported through result flags and diagnostic messages so a
//! noisy trace never aborts a test run.

use serde::{Deserialize, Serialize};

/// A real-valued sample (platform position in mm, force in N, time in s).
pub type Sample = f64;

/// Result type for engine operations.
pub type EgeaResult<T> = Result<T, EgeaError>;

/// Errors raised by the analysis engine.
///
/// `Config*` variants are raised once, at parameter construction, and
/// indicate a setup mistake. The input variants describe malformed sensor
/// traces; the orchestration layer folds them into invalid test results
/// rather than propagating them to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EgeaError {
    #[error("frequency window is empty: min {min} Hz >= max {max} Hz")]
    EmptyFrequencyWindow { min: f64, max: f64 },

    #[error("{name} must be positive, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },

    #[error("{name} must lie inside (0, 100) %, got {value}")]
    PercentageOutOfRange { name: &'static str, value: f64 },

    #[error("phase filter passband multiplier {pass_mul} must be below stopband multiplier {stop_mul}")]
    FilterEdgesInverted { pass_mul: u32, stop_mul: u32 },

    #[error("minimum sample count must be at least 2, got {0}")]
    MinSamplesTooSmall(usize),

    #[error("trace length mismatch: position {position}, force {force}, time {time}")]
    LengthMismatch {
        position: usize,
        force: usize,
        time: usize,
    },

    #[error("trace too short: {actual} samples, at least {required} required")]
    TooFewSamples { actual: usize, required: usize },

    #[error("time vector must be strictly increasing (violated at sample {0})")]
    NonMonotonicTime(usize),

    #[error("static weight must be positive, got {0} N")]
    NonPositiveStaticWeight(f64),
}

/// Direction in which the force trace crosses the static weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossingDirection {
    /// Force rising through the static weight.
    Up,
    /// Force falling through the static weight.
    Down,
}

/// A single interpolated crossing of the static weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crossing {
    /// Interpolated crossing time in seconds.
    pub time: f64,
    /// Rising or falling edge.
    pub direction: CrossingDirection,
}
