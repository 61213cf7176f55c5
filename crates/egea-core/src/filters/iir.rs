//! Lowpass IIR filters as cascaded biquad sections
//!
//! Butterworth designs via the bilinear transform, split into second-order
//! sections for numerical stability. The force traces this engine filters
//! are real-valued, so only the real processing path exists here.
//!
//! ## Example
//!
//! ```rust
//! use egea_core::filters::LowpassFilter;
//!
//! // 3rd-order lowpass at 20 Hz for a 1 kHz trace
//! let mut filter = LowpassFilter::butterworth(3, 20.0, 1000.0);
//! assert!(filter.is_stable());
//!
//! let settled: f64 = (0..500).map(|_| filter.process_sample(1.0)).last().unwrap();
//! assert!((settled - 1.0).abs() < 1e-3); // unity DC gain
//! ```

use num_complex::Complex64;
use std::f64::consts::PI;

/// A single biquad (second-order section).
///
/// Transfer function: `H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)`,
/// evaluated in Direct Form II Transposed.
#[derive(Debug, Clone)]
pub struct Biquad {
    /// Numerator coefficients [b0, b1, b2].
    b: [f64; 3],
    /// Denominator coefficients [a1, a2], a0 normalized to 1.
    a: [f64; 2],
    /// DF2T state.
    state: [f64; 2],
}

impl Biquad {
    /// Create a section from raw coefficients.
    pub fn new(b: [f64; 3], a: [f64; 2]) -> Self {
        Self {
            b,
            a,
            state: [0.0; 2],
        }
    }

    /// Process one sample.
    #[inline]
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let output = self.b[0] * input + self.state[0];
        self.state[0] = self.b[1] * input - self.a[0] * output + self.state[1];
        self.state[1] = self.b[2] * input - self.a[1] * output;
        output
    }

    /// Clear the delay line.
    pub fn reset(&mut self) {
        self.state = [0.0; 2];
    }

    /// Load the steady-state response to a constant input, so a signal with
    /// a non-zero baseline enters the filter without a start-up transient.
    /// Valid for unity-DC-gain sections.
    pub fn set_dc_state(&mut self, input: f64) {
        self.state[0] = input * (1.0 - self.b[0]);
        self.state[1] = input * (self.b[2] - self.a[1]);
    }

    /// Poles inside the unit circle: `|a2| < 1` and `|a1| < 1 + a2`.
    pub fn is_stable(&self) -> bool {
        self.a[1].abs() < 1.0 && self.a[0].abs() < 1.0 + self.a[1]
    }
}

/// Lowpass filter as a cascade of biquad sections.
#[derive(Debug, Clone)]
pub struct LowpassFilter {
    sections: Vec<Biquad>,
    order: usize,
}

impl LowpassFilter {
    /// Design a Butterworth lowpass filter.
    ///
    /// `order` 1..=20, `cutoff_hz` the -3 dB point, strictly below the
    /// Nyquist frequency.
    pub fn butterworth(order: usize, cutoff_hz: f64, sample_rate: f64) -> Self {
        assert!((1..=20).contains(&order), "order must be 1-20");
        assert!(
            cutoff_hz > 0.0 && cutoff_hz < sample_rate / 2.0,
            "cutoff must lie below Nyquist"
        );

        let wc = prewarp(cutoff_hz, sample_rate);
        let sections = poles_to_sections(&butterworth_poles(order), wc, sample_rate);
        Self { sections, order }
    }

    /// Filter order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of biquad sections in the cascade.
    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// Process one sample through the cascade.
    #[inline]
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let mut output = input;
        for section in &mut self.sections {
            output = section.process_sample(output);
        }
        output
    }

    /// Process a whole signal, preserving filter state across samples.
    pub fn process_signal(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&s| self.process_sample(s)).collect()
    }

    /// Clear all section delay lines.
    pub fn reset(&mut self) {
        for section in &mut self.sections {
            section.reset();
        }
    }

    /// Prime every section with the steady-state response to `value`.
    /// Each section has unity DC gain, so the value propagates unchanged
    /// down the cascade.
    pub fn prime_dc(&mut self, value: f64) {
        for section in &mut self.sections {
            section.set_dc_state(value);
        }
    }

    /// All sections stable.
    pub fn is_stable(&self) -> bool {
        self.sections.iter().all(Biquad::is_stable)
    }

    /// Complex frequency response `H(e^jw)` at `freq_hz`.
    pub fn frequency_response(&self, freq_hz: f64, sample_rate: f64) -> Complex64 {
        let omega = 2.0 * PI * freq_hz / sample_rate;
        let z_inv = Complex64::new(omega.cos(), -omega.sin());
        let z_inv2 = z_inv * z_inv;

        let mut response = Complex64::new(1.0, 0.0);
        for section in &self.sections {
            let num = section.b[0] + section.b[1] * z_inv + section.b[2] * z_inv2;
            let den = 1.0 + section.a[0] * z_inv + section.a[1] * z_inv2;
            response *= num / den;
        }
        response
    }

    /// Magnitude response in dB at `freq_hz`.
    pub fn magnitude_response_db(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        20.0 * self.frequency_response(freq_hz, sample_rate).norm().log10()
    }
}

/// Pre-warp an analog edge frequency for the bilinear transform.
fn prewarp(freq_hz: f64, sample_rate: f64) -> f64 {
    2.0 * sample_rate * (PI * freq_hz / sample_rate).tan()
}

/// Butterworth analog prototype poles on the left half of the unit circle.
fn butterworth_poles(order: usize) -> Vec<Complex64> {
    (0..order)
        .map(|k| {
            let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            Complex64::new(theta.cos(), theta.sin())
        })
        .collect()
}

/// Map analog prototype poles to digital biquad sections.
///
/// Each conjugate pair becomes one second-order section, taken from its
/// upper-half-plane representative; a real pole (odd orders) becomes a
/// first-order section.
fn poles_to_sections(poles: &[Complex64], wc: f64, sample_rate: f64) -> Vec<Biquad> {
    let k = 2.0 * sample_rate;
    let mut sections = Vec::new();

    for &pole in poles {
        if pole.im.abs() < 1e-10 {
            let p = pole.re * wc;
            let alpha = k - p;
            let beta = k + p;
            sections.push(Biquad::new(
                [-p / alpha, -p / alpha, 0.0],
                [-beta / alpha, 0.0],
            ));
        } else if pole.im > 0.0 {
            let p = pole * wc;
            let mag_sq = p.norm_sqr();
            let k2 = k * k;
            let d = k2 - 2.0 * k * p.re + mag_sq;
            sections.push(Biquad::new(
                [mag_sq / d, 2.0 * mag_sq / d, mag_sq / d],
                [2.0 * (mag_sq - k2) / d, (k2 + 2.0 * k * p.re + mag_sq) / d],
            ));
        }
        // The im < 0 conjugate is covered by its partner
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unity_biquad_passes_through() {
        let mut bq = Biquad::new([1.0, 0.0, 0.0], [0.0, 0.0]);
        assert!((bq.process_sample(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_biquad_stability_check() {
        assert!(Biquad::new([1.0, 0.0, 0.0], [0.5, 0.2]).is_stable());
        assert!(!Biquad::new([1.0, 0.0, 0.0], [2.0, 0.5]).is_stable());
    }

    #[test]
    fn test_butterworth_section_count() {
        assert_eq!(LowpassFilter::butterworth(3, 20.0, 1000.0).num_sections(), 2);
        assert_eq!(LowpassFilter::butterworth(4, 50.0, 1000.0).num_sections(), 2);
        assert_eq!(LowpassFilter::butterworth(5, 50.0, 1000.0).num_sections(), 3);
    }

    #[test]
    fn test_butterworth_is_stable_across_orders() {
        for order in 1..=8 {
            let filter = LowpassFilter::butterworth(order, 40.0, 1000.0);
            assert!(filter.is_stable(), "unstable at order {order}");
        }
    }

    #[test]
    fn test_dc_passthrough() {
        let mut filter = LowpassFilter::butterworth(4, 20.0, 1000.0);
        let mut out = 0.0;
        for _ in 0..2000 {
            out = filter.process_sample(1.0);
        }
        assert!((out - 1.0).abs() < 1e-6, "DC gain {out}");
    }

    #[test]
    fn test_cutoff_is_minus_three_db() {
        let filter = LowpassFilter::butterworth(3, 20.0, 1000.0);
        let db = filter.magnitude_response_db(20.0, 1000.0);
        assert!((db + 3.0).abs() < 0.3, "cutoff response {db} dB");
    }

    #[test]
    fn test_stopband_attenuation() {
        let filter = LowpassFilter::butterworth(3, 20.0, 1000.0);
        // Two octaves above cutoff a 3rd-order design is at least 30 dB down
        let db = filter.magnitude_response_db(80.0, 1000.0);
        assert!(db < -30.0, "stopband response {db} dB");
    }

    #[test]
    fn test_dc_priming_removes_startup_transient() {
        let mut filter = LowpassFilter::butterworth(4, 20.0, 1000.0);
        filter.prime_dc(500.0);
        for _ in 0..50 {
            let out = filter.process_sample(500.0);
            assert!((out - 500.0).abs() < 1e-9, "transient: {out}");
        }
    }

    #[test]
    fn test_reset_clears_state() {
        let mut filter = LowpassFilter::butterworth(3, 20.0, 1000.0);
        for _ in 0..100 {
            filter.process_sample(5.0);
        }
        filter.reset();
        let first = filter.process_sample(1.0);
        assert!(first.abs() < 0.5, "state leaked through reset: {first}");
    }
}
