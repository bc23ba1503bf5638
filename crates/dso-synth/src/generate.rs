//! Top-level synthesis entry point.

use dso_types::{Bit, ModulateParams};

use crate::error::SynthResult;
use crate::modulation::{Modulator, SampleContext};
use crate::signals::{carrier_signal, digital_signal};
use crate::timebase::Timebase;
use crate::waveform::WaveformSet;

/// Synthesizes the four output sequences on the default timebase.
pub fn synthesize(params: &ModulateParams) -> SynthResult<WaveformSet> {
    synthesize_with(params, &Timebase::default())
}

/// Synthesizes the four output sequences on an explicit timebase.
pub fn synthesize_with(params: &ModulateParams, timebase: &Timebase) -> SynthResult<WaveformSet> {
    let num_bits = params.bits.len();
    let spb = timebase.samples_per_bit();

    let time = timebase.time_axis(num_bits);
    let digital = digital_signal(&params.bits, timebase);
    let carrier = carrier_signal(&time, params.amplitude, params.frequency);

    let bits: &[Bit] = params.bits.as_slice();
    let modulated = time
        .iter()
        .zip(&carrier)
        .enumerate()
        .map(|(k, (&t, &carrier))| {
            let ctx = SampleContext {
                t,
                offset: k % spb,
                samples_per_bit: spb,
                amplitude: params.amplitude,
                frequency: params.frequency,
                carrier,
            };
            params.modulation.sample(bits[k / spb], &ctx)
        })
        .collect();

    WaveformSet::new(time, digital, carrier, modulated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dso_types::{BitSequence, ModulationType};

    fn params(modulation: ModulationType, amplitude: f64, frequency: f64, bits: &str) -> ModulateParams {
        let bits: BitSequence = bits.parse().unwrap();
        ModulateParams::new(modulation, amplitude, frequency, bits).unwrap()
    }

    #[test]
    fn test_lengths_match_bit_count() {
        let waves = synthesize(&params(ModulationType::Fsk, 1.0, 5.0, "00111001")).unwrap();
        assert_eq!(waves.len(), 8000);
        assert_eq!(waves.digital.len(), 8000);
        assert_eq!(waves.carrier.len(), 8000);
        assert_eq!(waves.modulated.len(), 8000);
    }

    #[test]
    fn test_deterministic() {
        let p = params(ModulationType::Psk, 2.0, 3.0, "1010");
        let a = synthesize(&p).unwrap();
        let b = synthesize(&p).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_custom_timebase() {
        let tb = Timebase::new(100, 2).unwrap();
        let waves = synthesize_with(&params(ModulationType::Pwm, 1.0, 1.0, "10"), &tb).unwrap();
        // 50 samples per bit, 1 second total
        assert_eq!(waves.len(), 100);
        assert!(waves.time[99] < 1.0);
        assert_eq!(waves.modulated[36], 1.0);
        assert_eq!(waves.modulated[37], 0.0);
        assert_eq!(waves.modulated[50 + 11], 1.0);
        assert_eq!(waves.modulated[50 + 12], 0.0);
    }
}
