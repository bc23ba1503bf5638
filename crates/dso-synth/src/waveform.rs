//! The synthesized output record.

use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};

/// Four co-indexed sample sequences of equal length.
///
/// Deserialization goes through [`WaveformSet::new`], so a decoded set obeys the
/// same length invariant as a synthesized one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWaveformSet")]
pub struct WaveformSet {
    /// Sample times in seconds, strictly increasing from 0.
    pub time: Vec<f64>,
    /// Bit value (0 or 1) active at each sample.
    pub digital: Vec<u8>,
    /// Unmodulated carrier sine.
    pub carrier: Vec<f64>,
    /// Modulated output.
    pub modulated: Vec<f64>,
}

#[derive(Deserialize)]
struct RawWaveformSet {
    time: Vec<f64>,
    digital: Vec<u8>,
    carrier: Vec<f64>,
    modulated: Vec<f64>,
}

impl TryFrom<RawWaveformSet> for WaveformSet {
    type Error = SynthError;

    fn try_from(raw: RawWaveformSet) -> SynthResult<Self> {
        WaveformSet::new(raw.time, raw.digital, raw.carrier, raw.modulated)
    }
}

impl WaveformSet {
    /// Assembles a set, checking that all four sequences share one length.
    pub fn new(
        time: Vec<f64>,
        digital: Vec<u8>,
        carrier: Vec<f64>,
        modulated: Vec<f64>,
    ) -> SynthResult<Self> {
        let expected = time.len();
        for (signal, actual) in [
            ("digital", digital.len()),
            ("carrier", carrier.len()),
            ("modulated", modulated.len()),
        ] {
            if actual != expected {
                return Err(SynthError::LengthMismatch {
                    signal,
                    expected,
                    actual,
                });
            }
        }

        Ok(Self {
            time,
            digital,
            carrier,
            modulated,
        })
    }

    /// Number of samples in each sequence.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Returns true if the set holds no samples.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// BLAKE3 hash over the little-endian bytes of all four sequences, as hex.
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for &t in &self.time {
            hasher.update(&t.to_le_bytes());
        }
        hasher.update(&self.digital);
        for &c in &self.carrier {
            hasher.update(&c.to_le_bytes());
        }
        for &m in &self.modulated {
            hasher.update(&m.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_mismatch() {
        let err = WaveformSet::new(vec![0.0, 0.001], vec![1, 1], vec![0.0], vec![0.0, 0.0])
            .unwrap_err();
        assert_eq!(
            err,
            SynthError::LengthMismatch {
                signal: "carrier",
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_hash_format() {
        let set = WaveformSet::new(vec![0.0], vec![1], vec![0.0], vec![0.0]).unwrap();
        let hash = set.content_hash();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_serialized_field_names() {
        let set = WaveformSet::new(vec![0.0], vec![1], vec![0.5], vec![0.25]).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(
            json,
            r#"{"time":[0.0],"digital":[1],"carrier":[0.5],"modulated":[0.25]}"#
        );
        let decoded: WaveformSet = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, set);
    }

    #[test]
    fn test_deserialize_rejects_mismatch() {
        let json = r#"{"time":[0.0,0.001],"digital":[1,1],"carrier":[0.5,0.5],"modulated":[0.25]}"#;
        let err = serde_json::from_str::<WaveformSet>(json).unwrap_err();
        assert!(err.to_string().contains("modulated has 1 samples, expected 2"));
    }
}
