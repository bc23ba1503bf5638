//! Digital step and carrier signal builders.

use std::f64::consts::TAU;

use dso_types::BitSequence;

use crate::timebase::Timebase;

/// Evaluates `amplitude * sin(2 * pi * frequency * t)`.
#[inline]
pub fn sine(amplitude: f64, frequency: f64, t: f64, phase: f64) -> f64 {
    amplitude * (TAU * frequency * t + phase).sin()
}

/// Repeats each bit `samples_per_bit` times.
pub fn digital_signal(bits: &BitSequence, timebase: &Timebase) -> Vec<u8> {
    let spb = timebase.samples_per_bit();
    bits.iter()
        .flat_map(|bit| std::iter::repeat(bit.as_u8()).take(spb))
        .collect()
}

/// Evaluates the carrier sine at every time sample.
///
/// Depends only on amplitude and frequency, never on the bits or the scheme.
pub fn carrier_signal(time: &[f64], amplitude: f64, frequency: f64) -> Vec<f64> {
    time.iter()
        .map(|&t| sine(amplitude, frequency, t, 0.0))
        .collect()
}
