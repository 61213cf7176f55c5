//! Zero-phase filtering
//!
//! Runs a filter forward and backward over the signal so the passband keeps
//! its timing exactly — the phase estimates downstream depend on crossing
//! times, so any group delay here would bias them. Edges are padded with an
//! odd reflection of the signal to suppress start-up transients.

use super::iir::LowpassFilter;

/// Apply `filter` forward and backward over `signal`.
///
/// Signals too short to pad are returned unfiltered; a degenerate cycle is
/// dropped later by its own validity checks, not here.
pub fn filtfilt(filter: &mut LowpassFilter, signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    if n < 4 {
        return signal.to_vec();
    }

    let mut padlen = 3 * (filter.order() + 1);
    if padlen >= n {
        padlen = n - 1;
    }

    // Odd reflection about both endpoints
    let mut extended = Vec::with_capacity(n + 2 * padlen);
    for i in (1..=padlen).rev() {
        extended.push(2.0 * signal[0] - signal[i]);
    }
    extended.extend_from_slice(signal);
    for j in 1..=padlen {
        extended.push(2.0 * signal[n - 1] - signal[n - 1 - j]);
    }

    // Prime with the first padded sample so the baseline does not excite a
    // start-up transient the padding cannot absorb
    filter.prime_dc(extended[0]);
    let mut forward = filter.process_signal(&extended);

    forward.reverse();
    filter.prime_dc(forward[0]);
    let mut backward = filter.process_signal(&forward);
    backward.reverse();

    backward[padlen..padlen + n].to_vec()
}
