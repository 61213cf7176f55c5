//! Phase-shift analysis over a frequency sweep
//!
//! The central measurement of the suspension test: for every platform
//! oscillation cycle inside the analysis window, estimate the phase lag
//! between platform motion and tire contact force, then aggregate the
//! per-cycle estimates into the sweep minimum φmin that the pass/fail
//! criteria consume.
//!
//! A cycle runs from one platform TOP to the next. Within a cycle the force
//! trace is lowpass-filtered (zero-phase, passband scaled to the cycle
//! frequency), the instant Fref is taken as the midpoint of the falling and
//! rising crossings of the static weight, and the lag follows from the
//! distance between Fref and the platform extremum. Degenerate cycles —
//! frequency out of window, static weight too close to a force extremum, no
//! crossing pair — are dropped silently; the sweep stays valid as long as
//! one cycle survives and the signal never underflowed.

use tracing::{debug, warn};

use crate::params::EgeaParams;
use crate::results::{PhaseShiftPeriod, PhaseShiftResult};
use crate::signal::{min_max, validate_test_traces, SignalProcessor};

/// Half-width of the band around the window top in which a cycle counts as
/// the φmax reference, Hz.
const PHI_MAX_BAND_HZ: f64 = 0.5;

/// Per-sweep phase-shift analyzer.
#[derive(Debug, Clone)]
pub struct PhaseShiftAnalyzer {
    params: EgeaParams,
    signal: SignalProcessor,
}

impl PhaseShiftAnalyzer {
    /// Create an analyzer bound to a parameter snapshot.
    pub fn new(params: &EgeaParams) -> Self {
        Self {
            params: params.clone(),
            signal: SignalProcessor::new(params),
        }
    }

    /// Analyze one sweep recording.
    ///
    /// Malformed input yields an empty result carrying the diagnostic; it
    /// never panics on field data.
    pub fn analyze(
        &self,
        platform_position: &[f64],
        tire_force: &[f64],
        time: &[f64],
        static_weight: f64,
    ) -> PhaseShiftResult {
        if let Err(err) = validate_test_traces(
            platform_position,
            tire_force,
            time,
            static_weight,
            self.params.min_samples,
        ) {
            warn!(%err, "phase analysis rejected input");
            let mut result = PhaseShiftResult::empty(static_weight);
            result.error_message = Some(err.to_string());
            return result;
        }

        let sample_rate = 1.0 / (time[1] - time[0]);

        // Saturation is judged on the raw trace, before any filtering
        let (f_under_flag, f_over_flag) =
            self.signal.detect_signal_overflow_underflow(tire_force, static_weight);

        let tops = self.signal.find_platform_tops(platform_position, sample_rate);
        if tops.len() < 2 {
            warn!(tops = tops.len(), "not enough platform tops for analysis");
        }

        let mut periods = Vec::new();
        for (i, bounds) in tops.windows(2).enumerate() {
            if let Some(period) = self.analyze_cycle(
                platform_position,
                tire_force,
                time,
                static_weight,
                bounds[0],
                bounds[1],
                i + 1,
                sample_rate,
            ) {
                periods.push(period);
            }
        }

        let valid: Vec<&PhaseShiftPeriod> = periods.iter().filter(|p| p.is_valid).collect();
        if valid.is_empty() {
            debug!("sweep produced no valid cycles");
            let mut result = PhaseShiftResult::empty(static_weight);
            result.periods = periods;
            result.f_under_flag = f_under_flag;
            result.f_over_flag = f_over_flag;
            return result;
        }

        let mut min_period = valid[0];
        for &period in &valid[1..] {
            if period.phase_shift < min_period.phase_shift {
                min_period = period;
            }
        }

        let max_phase_shift = valid
            .iter()
            .find(|p| (p.frequency - self.params.max_calc_freq).abs() < PHI_MAX_BAND_HZ)
            .map(|p| p.phase_shift);

        let mut rfa_max_value = None;
        let mut rfa_max_frequency = None;
        let mut best_rfa = 0.0;
        for period in &valid {
            let rfa = period.rfa();
            if rfa > best_rfa {
                best_rfa = rfa;
                rfa_max_value = Some(rfa);
                rfa_max_frequency = Some(period.frequency);
            }
        }

        PhaseShiftResult {
            min_phase_shift: Some(min_period.phase_shift),
            min_phase_frequency: Some(min_period.frequency),
            max_phase_shift,
            rfa_max_value,
            rfa_max_frequency,
            periods,
            static_weight,
            f_under_flag,
            f_over_flag,
            error_message: None,
        }
    }

    /// Analyze one cycle; `None` drops it from the period list.
    #[allow(clippy::too_many_arguments)]
    fn analyze_cycle(
        &self,
        platform_position: &[f64],
        tire_force: &[f64],
        time: &[f64],
        static_weight: f64,
        start_idx: usize,
        end_idx: usize,
        period_index: usize,
        sample_rate: f64,
    ) -> Option<PhaseShiftPeriod> {
        let frequency = self.signal.cycle_frequency(start_idx, end_idx, time);
        if !(self.params.min_calc_freq..=self.params.max_calc_freq).contains(&frequency) {
            debug!(period_index, frequency, "cycle outside analysis window");
            return None;
        }

        let cycle_force = &tire_force[start_idx..end_idx];
        let cycle_time = &time[start_idx..end_idx];
        let cycle_platform = &platform_position[start_idx..end_idx];

        if !self.signal.validate_rfst_conditions(cycle_force, static_weight) {
            debug!(period_index, "static weight too close to a force extremum");
            return None;
        }

        let filtered_force = self
            .signal
            .apply_egea_phase_filter(cycle_force, sample_rate, frequency);

        let peak_in_cycle = argmax(cycle_platform);
        let top_p = cycle_time[peak_in_cycle] - cycle_time[0];

        let fref_abs =
            match self
                .signal
                .fref_crossing_midpoint(&filtered_force, cycle_time, static_weight)
            {
                Some(t) => t,
                None => {
                    debug!(period_index, "no usable crossing pair");
                    return None;
                }
            };
        let fref = fref_abs - cycle_time[0];

        // The crossing midpoint marks the force valley; the platform valley
        // trails the TOP by half a period
        let raw_deg = (fref - top_p - 0.5 / frequency) * frequency * 360.0;
        let phase_shift = normalize_phase_deg(raw_deg);

        let (min_force, max_force) = min_max(cycle_force)?;

        Some(PhaseShiftPeriod {
            period_index,
            frequency,
            phase_shift,
            fref,
            top_p,
            max_force,
            min_force,
            delta_force: max_force - min_force,
            static_weight,
            is_valid: true,
        })
    }
}

/// Fold an angle in degrees into [0, 180].
fn normalize_phase_deg(raw_deg: f64) -> f64 {
    let phase = raw_deg.rem_euclid(360.0);
    if phase > 180.0 {
        360.0 - phase
    } else {
        phase
    }
}

/// Index of the largest element (first occurrence).
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}
