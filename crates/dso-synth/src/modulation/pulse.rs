//! Pulse schemes: PAM, PWM, PPM.

use dso_types::Bit;

use super::{active_samples, SampleContext};

/// PWM duty fraction for bit 1.
pub const PWM_DUTY_ONE: f64 = 0.75;

/// PWM duty fraction for bit 0.
pub const PWM_DUTY_ZERO: f64 = 0.25;

/// PPM pulse width as a fraction of the bit window.
pub const PPM_PULSE_FRACTION: f64 = 0.2;

/// PAM: constant amplitude for 1, zero for 0.
pub fn pam(bit: Bit, ctx: &SampleContext) -> f64 {
    match bit {
        Bit::One => ctx.amplitude,
        Bit::Zero => 0.0,
    }
}

/// PWM: high for the first 75% (bit 1) or 25% (bit 0) of the window.
pub fn pwm(bit: Bit, ctx: &SampleContext) -> f64 {
    let duty = match bit {
        Bit::One => PWM_DUTY_ONE,
        Bit::Zero => PWM_DUTY_ZERO,
    };
    if ctx.offset < active_samples(ctx.samples_per_bit, duty) {
        ctx.amplitude
    } else {
        0.0
    }
}

/// PPM: a fixed-width pulse at the window start (bit 1) or end (bit 0).
pub fn ppm(bit: Bit, ctx: &SampleContext) -> f64 {
    let width = active_samples(ctx.samples_per_bit, PPM_PULSE_FRACTION);
    let in_pulse = match bit {
        Bit::One => ctx.offset < width,
        Bit::Zero => ctx.offset >= ctx.samples_per_bit - width,
    };
    if in_pulse {
        ctx.amplitude
    } else {
        0.0
    }
}
