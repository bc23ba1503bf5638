//! Per-sample modulation rules.
//!
//! Every scheme is a pure mapping from a bit and a [`SampleContext`] to one
//! output sample, so the modulated signal can be built by a single pass over
//! the time axis with no shared buffers.
//!
//! - [`keying`] - ASK, FSK, PSK (shape a sine carrier)
//! - [`pulse`] - PAM, PWM, PPM (shape a rectangular pulse)

pub mod keying;
pub mod pulse;

use dso_types::{Bit, ModulationType};

/// Everything a rule may look at when producing one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleContext {
    /// Absolute time of the sample in seconds.
    pub t: f64,
    /// Sample offset within the current bit window (0-based).
    pub offset: usize,
    /// Samples per bit window.
    pub samples_per_bit: usize,
    /// Carrier amplitude.
    pub amplitude: f64,
    /// Carrier frequency in Hz.
    pub frequency: f64,
    /// Carrier value at this sample.
    pub carrier: f64,
}

/// A modulation rule evaluated one sample at a time.
pub trait Modulator {
    /// Returns the modulated sample for `bit` at the position described by `ctx`.
    fn sample(&self, bit: Bit, ctx: &SampleContext) -> f64;
}

impl Modulator for ModulationType {
    fn sample(&self, bit: Bit, ctx: &SampleContext) -> f64 {
        match self {
            ModulationType::Ask => keying::ask(bit, ctx),
            ModulationType::Fsk => keying::fsk(bit, ctx),
            ModulationType::Psk => keying::psk(bit, ctx),
            ModulationType::Pam => pulse::pam(bit, ctx),
            ModulationType::Pwm => pulse::pwm(bit, ctx),
            ModulationType::Ppm => pulse::ppm(bit, ctx),
        }
    }
}

/// Number of whole samples covering `fraction` of a window (truncated).
#[inline]
pub fn active_samples(samples_per_bit: usize, fraction: f64) -> usize {
    (samples_per_bit as f64 * fraction).floor() as usize
}
