//! Error types for waveform synthesis.

use thiserror::Error;

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;

/// Errors that can occur during synthesis.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SynthError {
    /// The output sequences disagree in length.
    #[error("waveform length mismatch: {signal} has {actual} samples, expected {expected}")]
    LengthMismatch {
        /// Name of the offending sequence.
        signal: &'static str,
        /// Expected sample count.
        expected: usize,
        /// Actual sample count.
        actual: usize,
    },

    /// The sample rate is zero or not a whole multiple of the bit rate.
    #[error("invalid timebase: {sample_rate} Hz at {bit_rate} bit/s (sample rate must be a non-zero multiple of the bit rate)")]
    InvalidTimebase {
        /// Requested sample rate in Hz.
        sample_rate: usize,
        /// Requested bit rate in bits per second.
        bit_rate: usize,
    },
}

impl SynthError {
    /// Returns the stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            SynthError::LengthMismatch { .. } => "SYNTH_001",
            SynthError::InvalidTimebase { .. } => "SYNTH_002",
        }
    }
}
