//! Digital filters used by the analysis pipeline
//!
//! Two building blocks: cascaded-biquad lowpass filters designed by the
//! bilinear transform, and a zero-phase (forward-backward) applicator. The
//! analysis contract fixes only the passband/stopband edges and the
//! zero-phase property; the Butterworth cascade is the implementation
//! choice.

pub mod iir;
pub mod zero_phase;

pub use iir::{Biquad, LowpassFilter};
pub use zero_phase::filtfilt;
