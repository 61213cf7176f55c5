//! Whole-trace force analysis
//!
//! Extracts the force extrema of the complete sweep from the wideband-
//! filtered trace and derives the maximum force amplitude FAmax, its
//! relative form RFAmax and the resonance estimate. Saturation changes
//! which extremum is trustworthy, so the amplitude computation branches on
//! the under/overflow flags.

use tracing::warn;

use crate::params::EgeaParams;
use crate::results::ForceAnalysisResult;
use crate::signal::{validate_force_trace, SignalProcessor};

/// Whole-trace force analyzer.
#[derive(Debug, Clone)]
pub struct ForceAnalyzer {
    params: EgeaParams,
    signal: SignalProcessor,
}

impl ForceAnalyzer {
    /// Create an analyzer bound to a parameter snapshot.
    pub fn new(params: &EgeaParams) -> Self {
        Self {
            params: params.clone(),
            signal: SignalProcessor::new(params),
        }
    }

    /// Analyze the full force trace of one sweep.
    pub fn analyze(&self, tire_force: &[f64], time: &[f64], static_weight: f64) -> ForceAnalysisResult {
        if let Err(err) =
            validate_force_trace(tire_force, time, static_weight, self.params.min_samples)
        {
            warn!(%err, "force analysis rejected input");
            return ForceAnalysisResult {
                fmin: 0.0,
                fmax: 0.0,
                fa_max: 0.0,
                resonant_frequency: 0.0,
                rfa_max: 0.0,
                static_weight,
                f_under_flag: true,
                f_over_flag: false,
            };
        }

        let sample_rate = 1.0 / (time[1] - time[0]);
        let filtered = self.signal.apply_force_amplitude_filter(tire_force, sample_rate);

        let fmin = filtered.iter().copied().fold(f64::INFINITY, f64::min);
        let fmax = filtered.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let (f_under_flag, f_over_flag) =
            self.signal.detect_signal_overflow_underflow(&filtered, static_weight);

        let (fa_max, resonant_frequency) = if !f_under_flag && !f_over_flag {
            let t_at_fmin = time[argmin(&filtered)];
            (static_weight - fmin, half_inverse(t_at_fmin))
        } else if f_under_flag && !f_over_flag {
            let t_at_fmax = time[argmax(&filtered)];
            (fmax - static_weight, half_inverse(t_at_fmax))
        } else {
            // Both extrema clipped; bound the amplitude by the saturation
            // limits and leave the resonance undefined
            let over_lim = self.params.f_over_lim.unwrap_or(fmax);
            let under_lim = self.params.f_under_lim(static_weight);
            let fa = (over_lim - static_weight).max(static_weight - under_lim);
            (fa, 0.0)
        };

        let rfa_max = if static_weight > 0.0 {
            fa_max / static_weight * 100.0
        } else {
            0.0
        };

        ForceAnalysisResult {
            fmin,
            fmax,
            fa_max,
            resonant_frequency,
            rfa_max,
            static_weight,
            f_under_flag,
            f_over_flag,
        }
    }
}

/// Resonance estimate from the extremum instant; 0 when the extremum sits
/// at the trace start.
fn half_inverse(t: f64) -> f64 {
    if t > 0.0 {
        1.0 / (2.0 * t)
    } else {
        0.0
    }
}

fn argmin(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v < values[best] {
            best = i;
        }
    }
    best
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}
