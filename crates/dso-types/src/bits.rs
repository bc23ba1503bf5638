//! Bit and bit sequence types.

use std::str::FromStr;

use crate::error::{ErrorCode, ValidationError};

/// A single binary symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    /// Returns the bit as 0 or 1.
    pub fn as_u8(self) -> u8 {
        match self {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }

    /// Returns true for `Bit::One`.
    pub fn is_one(self) -> bool {
        self == Bit::One
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Bit::Zero),
            '1' => Some(Bit::One),
            _ => None,
        }
    }
}

/// A non-empty, ordered sequence of bits parsed one-to-one from a bitstream string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitSequence(Vec<Bit>);

impl BitSequence {
    /// Builds a sequence from bits, rejecting an empty input.
    pub fn new(bits: Vec<Bit>) -> Result<Self, ValidationError> {
        if bits.is_empty() {
            return Err(empty_error());
        }
        Ok(Self(bits))
    }

    /// Number of bits (N).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no bits (never the case for a parsed sequence).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the bits as a slice.
    pub fn as_slice(&self) -> &[Bit] {
        &self.0
    }

    /// Iterates over the bits in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Bit> {
        self.0.iter()
    }
}

impl FromStr for BitSequence {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(empty_error());
        }

        let bits = s
            .chars()
            .enumerate()
            .map(|(index, c)| {
                Bit::from_char(c).ok_or_else(|| {
                    ValidationError::with_field(
                        ErrorCode::InvalidBitCharacter,
                        format!(
                            "bitstream may only contain '0' and '1', found {:?} at index {}",
                            c, index
                        ),
                        "bitstream",
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(bits))
    }
}

impl std::fmt::Display for BitSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in &self.0 {
            write!(f, "{}", bit.as_u8())?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a BitSequence {
    type Item = &'a Bit;
    type IntoIter = std::slice::Iter<'a, Bit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn empty_error() -> ValidationError {
    ValidationError::with_field(
        ErrorCode::EmptyBitstream,
        "bitstream must contain at least one bit",
        "bitstream",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_preserves_order() {
        let seq: BitSequence = "0011".parse().unwrap();
        assert_eq!(seq.as_slice(), &[Bit::Zero, Bit::Zero, Bit::One, Bit::One]);
        assert_eq!(seq.to_string(), "0011");
    }

    #[test]
    fn test_parse_empty() {
        let err = "".parse::<BitSequence>().unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyBitstream);
    }

    #[test]
    fn test_parse_rejects_non_binary() {
        let err = "0120".parse::<BitSequence>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidBitCharacter);
        assert!(err.message.contains("index 2"));
        assert_eq!(err.field.as_deref(), Some("bitstream"));
    }

    #[test]
    fn test_parse_rejects_whitespace() {
        assert!("10 1".parse::<BitSequence>().is_err());
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(BitSequence::new(vec![]).is_err());
        assert_eq!(BitSequence::new(vec![Bit::One]).unwrap().len(), 1);
    }
}
