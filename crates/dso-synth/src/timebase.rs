//! Sampling constants and time axis construction.

use crate::error::{SynthError, SynthResult};

/// Sample rate in Hz.
pub const SAMPLE_RATE_HZ: usize = 1000;

/// Bits per second.
pub const BIT_RATE: usize = 1;

/// Fixed sampling grid shared by all four output sequences.
///
/// The sample rate is always a non-zero multiple of the bit rate, so every bit
/// window holds a whole number of samples and the time step is `1 / sample_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timebase {
    sample_rate: usize,
    bit_rate: usize,
}

impl Default for Timebase {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE_HZ,
            bit_rate: BIT_RATE,
        }
    }
}

impl Timebase {
    /// Creates a timebase, rejecting rates that do not divide into whole bit windows.
    pub fn new(sample_rate: usize, bit_rate: usize) -> SynthResult<Self> {
        if bit_rate == 0 || sample_rate == 0 || sample_rate % bit_rate != 0 {
            return Err(SynthError::InvalidTimebase {
                sample_rate,
                bit_rate,
            });
        }
        Ok(Self {
            sample_rate,
            bit_rate,
        })
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> usize {
        self.sample_rate
    }

    /// Bits per second.
    pub fn bit_rate(&self) -> usize {
        self.bit_rate
    }

    /// Samples in one bit window.
    pub fn samples_per_bit(&self) -> usize {
        self.sample_rate / self.bit_rate
    }

    /// Signal duration in seconds for `num_bits` bits.
    pub fn duration_seconds(&self, num_bits: usize) -> f64 {
        num_bits as f64 / self.bit_rate as f64
    }

    /// Total sample count for `num_bits` bits.
    pub fn num_samples(&self, num_bits: usize) -> usize {
        num_bits * self.samples_per_bit()
    }

    /// Builds the time axis for `num_bits` bits.
    ///
    /// Points are evenly spaced over `[0, duration)`; the endpoint is excluded.
    /// Each value is `k * step`, not a running sum.
    pub fn time_axis(&self, num_bits: usize) -> Vec<f64> {
        let num_samples = self.num_samples(num_bits);
        if num_samples == 0 {
            return Vec::new();
        }
        let step = self.duration_seconds(num_bits) / num_samples as f64;
        (0..num_samples).map(|k| k as f64 * step).collect()
    }

    /// Index range of bit `index` within the sample arrays.
    pub fn window(&self, index: usize) -> std::ops::Range<usize> {
        let spb = self.samples_per_bit();
        index * spb..(index + 1) * spb
    }
}
