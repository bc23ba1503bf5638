//! Carrier keying schemes: ASK, FSK, PSK.

use std::f64::consts::PI;

use dso_types::Bit;

use super::SampleContext;
use crate::signals::sine;

/// FSK space (bit 0) frequency as a fraction of the carrier frequency.
pub const FSK_SPACE_RATIO: f64 = 0.5;

/// PSK phase offset for bit 0.
pub const PSK_ZERO_PHASE: f64 = PI;

/// ASK: the carrier itself for 1, silence for 0.
pub fn ask(bit: Bit, ctx: &SampleContext) -> f64 {
    match bit {
        Bit::One => ctx.carrier,
        Bit::Zero => 0.0,
    }
}

/// FSK: carrier frequency for 1, half the carrier frequency for 0.
pub fn fsk(bit: Bit, ctx: &SampleContext) -> f64 {
    let frequency = match bit {
        Bit::One => ctx.frequency,
        Bit::Zero => ctx.frequency * FSK_SPACE_RATIO,
    };
    sine(ctx.amplitude, frequency, ctx.t, 0.0)
}

/// PSK: phase 0 for 1, phase pi for 0.
pub fn psk(bit: Bit, ctx: &SampleContext) -> f64 {
    let phase = match bit {
        Bit::One => 0.0,
        Bit::Zero => PSK_ZERO_PHASE,
    };
    sine(ctx.amplitude, ctx.frequency, ctx.t, phase)
}
