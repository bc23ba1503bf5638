//! Supported modulation schemes.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RequestError;

/// Modulation scheme applied to each bit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModulationType {
    /// Amplitude shift keying: carrier on for 1, silence for 0.
    #[default]
    Ask,
    /// Frequency shift keying: full carrier frequency for 1, half for 0.
    Fsk,
    /// Phase shift keying: phase 0 for 1, phase pi for 0.
    Psk,
    /// Pulse amplitude modulation: constant level for 1, zero for 0.
    Pam,
    /// Pulse width modulation: 75% duty for 1, 25% duty for 0.
    Pwm,
    /// Pulse position modulation: pulse at window start for 1, at window end for 0.
    Ppm,
}

impl ModulationType {
    /// All supported schemes in canonical order.
    pub const ALL: [ModulationType; 6] = [
        ModulationType::Ask,
        ModulationType::Fsk,
        ModulationType::Psk,
        ModulationType::Pam,
        ModulationType::Pwm,
        ModulationType::Ppm,
    ];

    /// Returns the canonical wire name (e.g., "ASK").
    pub fn as_str(&self) -> &'static str {
        match self {
            ModulationType::Ask => "ASK",
            ModulationType::Fsk => "FSK",
            ModulationType::Psk => "PSK",
            ModulationType::Pam => "PAM",
            ModulationType::Pwm => "PWM",
            ModulationType::Ppm => "PPM",
        }
    }

    /// Returns true for schemes that modulate a sine carrier.
    pub fn is_keying(&self) -> bool {
        matches!(
            self,
            ModulationType::Ask | ModulationType::Fsk | ModulationType::Psk
        )
    }
}

impl std::fmt::Display for ModulationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModulationType {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ModulationType::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| RequestError::UnknownModulationType(s.to_string()))
    }
}

impl Serialize for ModulationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModulationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
