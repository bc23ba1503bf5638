//! Wire request shape, defaults, and validation.
//!
//! [`ModulateRequest`] mirrors the JSON body accepted by the `/modulate`
//! endpoint. Every field is optional and falls back to a default. Numeric
//! fields accept either a JSON number or a numeric string; no other coercion
//! is performed. [`ModulateRequest::into_params`] turns the wire shape into a
//! validated [`ModulateParams`].

use serde::{Deserialize, Serialize};

use crate::bits::BitSequence;
use crate::error::{ErrorCode, RequestError, RequestResult, ValidationError};
use crate::modulation::ModulationType;

/// Default modulation type name.
pub const DEFAULT_TYPE: &str = "ASK";
/// Default carrier amplitude.
pub const DEFAULT_AMPLITUDE: f64 = 1.0;
/// Default carrier frequency in Hz.
pub const DEFAULT_FREQUENCY: f64 = 5.0;
/// Default bitstream.
pub const DEFAULT_BITSTREAM: &str = "00111001";
/// Default upper bound on bitstream length.
pub const DEFAULT_MAX_BITS: usize = 4096;

/// A numeric request field as it arrived on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    /// A JSON number.
    Number(f64),
    /// A string expected to hold a decimal number.
    Text(String),
    /// Anything else (null, bool, array, object).
    Other(serde_json::Value),
}

impl NumberOrString {
    /// Coerces the value to a finite, strictly positive `f64`.
    pub fn to_positive_f64(&self, field: &str) -> Result<f64, ValidationError> {
        let value = match self {
            NumberOrString::Number(n) => *n,
            NumberOrString::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                ValidationError::with_field(
                    ErrorCode::NonNumericValue,
                    format!("{} must be a number, got {:?}", field, s),
                    field,
                )
            })?,
            NumberOrString::Other(v) => {
                return Err(ValidationError::with_field(
                    ErrorCode::NonNumericValue,
                    format!("{} must be a number, got {}", field, v),
                    field,
                ));
            }
        };

        if !value.is_finite() {
            return Err(ValidationError::with_field(
                ErrorCode::NonFiniteValue,
                format!("{} must be finite, got {}", field, value),
                field,
            ));
        }
        if value <= 0.0 {
            return Err(ValidationError::with_field(
                ErrorCode::NonPositiveValue,
                format!("{} must be greater than 0, got {}", field, value),
                field,
            ));
        }
        Ok(value)
    }
}

impl From<f64> for NumberOrString {
    fn from(value: f64) -> Self {
        NumberOrString::Number(value)
    }
}

/// Request limits applied during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of bits accepted in one request.
    pub max_bits: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_bits: DEFAULT_MAX_BITS,
        }
    }
}

/// The JSON body of a modulation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulateRequest {
    /// Modulation type name (ASK, FSK, PSK, PAM, PWM, PPM).
    #[serde(rename = "type", default = "default_type")]
    pub modulation_type: String,
    /// Carrier amplitude.
    #[serde(default = "default_amplitude")]
    pub amplitude: NumberOrString,
    /// Carrier frequency in Hz.
    #[serde(default = "default_frequency")]
    pub frequency: NumberOrString,
    /// Bitstream of '0' and '1' characters.
    #[serde(default = "default_bitstream")]
    pub bitstream: String,
}

fn default_type() -> String {
    DEFAULT_TYPE.to_string()
}

fn default_amplitude() -> NumberOrString {
    NumberOrString::Number(DEFAULT_AMPLITUDE)
}

fn default_frequency() -> NumberOrString {
    NumberOrString::Number(DEFAULT_FREQUENCY)
}

fn default_bitstream() -> String {
    DEFAULT_BITSTREAM.to_string()
}

impl Default for ModulateRequest {
    fn default() -> Self {
        Self {
            modulation_type: default_type(),
            amplitude: default_amplitude(),
            frequency: default_frequency(),
            bitstream: default_bitstream(),
        }
    }
}

impl ModulateRequest {
    /// Parses a request from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validates the request and converts it into synthesis parameters.
    ///
    /// Fields are checked in order: type, amplitude, frequency, bitstream.
    /// The first failure is returned.
    pub fn into_params(self, limits: &Limits) -> RequestResult<ModulateParams> {
        let modulation: ModulationType = self.modulation_type.parse()?;
        let amplitude = self.amplitude.to_positive_f64("amplitude")?;
        let frequency = self.frequency.to_positive_f64("frequency")?;

        let bit_count = self.bitstream.chars().count();
        if bit_count > limits.max_bits {
            return Err(RequestError::Validation(ValidationError::with_field(
                ErrorCode::BitstreamTooLong,
                format!(
                    "bitstream has {} bits, limit is {}",
                    bit_count, limits.max_bits
                ),
                "bitstream",
            )));
        }
        let bits: BitSequence = self.bitstream.parse()?;

        Ok(ModulateParams {
            modulation,
            amplitude,
            frequency,
            bits,
        })
    }
}

/// Validated synthesis parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ModulateParams {
    /// Modulation scheme.
    pub modulation: ModulationType,
    /// Carrier amplitude (finite, > 0).
    pub amplitude: f64,
    /// Carrier frequency in Hz (finite, > 0).
    pub frequency: f64,
    /// Bits to modulate.
    pub bits: BitSequence,
}

impl ModulateParams {
    /// Builds parameters directly, applying the same checks as request validation.
    pub fn new(
        modulation: ModulationType,
        amplitude: f64,
        frequency: f64,
        bits: BitSequence,
    ) -> RequestResult<Self> {
        let amplitude = NumberOrString::from(amplitude).to_positive_f64("amplitude")?;
        let frequency = NumberOrString::from(frequency).to_positive_f64("frequency")?;
        Ok(Self {
            modulation,
            amplitude,
            frequency,
            bits,
        })
    }
}
