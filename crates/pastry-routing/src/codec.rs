//! Fixed-radix identifier encoding
//!
//! Node keys are written most-significant digit first in radix `2^b`, using
//! `0-9` then `A-F`. Encodings are never padded, so keys of different
//! magnitude have digit strings of different length.

use crate::error::{PastryError, Result};
use serde::{Deserialize, Serialize};

/// Largest supported radix exponent (radix 16)
pub const MAX_RADIX_EXPONENT: u32 = 4;

const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// How the value zero is written
///
/// Column labels always use [`ZeroEncoding::Digit`]. Node keys default to
/// [`ZeroEncoding::Empty`], under which key 0 has no digits and can never be
/// placed in a routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroEncoding {
    /// Zero is the empty string
    #[default]
    Empty,
    /// Zero is the single digit `"0"`
    Digit,
}

/// Converts between integer keys and their radix `2^b` digit strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierCodec {
    radix_exponent: u32,
    radix: u64,
    zero: ZeroEncoding,
}

impl IdentifierCodec {
    /// Create a codec for radix `2^radix_exponent` that writes zero as `"0"`
    pub fn new(radix_exponent: u32) -> Result<Self> {
        Self::with_zero_encoding(radix_exponent, ZeroEncoding::Digit)
    }

    /// Create a codec with an explicit zero convention
    pub fn with_zero_encoding(radix_exponent: u32, zero: ZeroEncoding) -> Result<Self> {
        if radix_exponent == 0 || radix_exponent > MAX_RADIX_EXPONENT {
            return Err(PastryError::Configuration(format!(
                "radix exponent must be in 1..={}, got {}",
                MAX_RADIX_EXPONENT, radix_exponent
            )));
        }

        Ok(IdentifierCodec {
            radix_exponent,
            radix: 1 << radix_exponent,
            zero,
        })
    }

    pub fn radix(&self) -> u64 {
        self.radix
    }

    pub fn radix_exponent(&self) -> u32 {
        self.radix_exponent
    }

    pub fn zero_encoding(&self) -> ZeroEncoding {
        self.zero
    }

    /// Encode a key as a digit string
    pub fn encode(&self, value: u64) -> String {
        if value == 0 {
            return match self.zero {
                ZeroEncoding::Empty => String::new(),
                ZeroEncoding::Digit => "0".to_string(),
            };
        }

        let mut digits = Vec::with_capacity(64);
        let mut rest = value;
        while rest != 0 {
            digits.push(DIGITS[(rest % self.radix) as usize]);
            rest /= self.radix;
        }

        digits.iter().rev().map(|&d| char::from(d)).collect()
    }

    /// Decode a digit string back to its key
    ///
    /// The empty string decodes to 0 under either zero convention.
    pub fn decode(&self, id: &str) -> Result<u64> {
        let mut value: u64 = 0;

        for c in id.chars() {
            let digit = self.digit_value(c).ok_or_else(|| {
                PastryError::malformed(
                    id,
                    format!("invalid digit {:?} for radix {}", c, self.radix),
                )
            })?;

            value = value
                .checked_mul(self.radix)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| PastryError::malformed(id, "value does not fit in 64 bits"))?;
        }

        Ok(value)
    }

    /// Value of a single digit character, if it is valid for this radix
    pub fn digit_value(&self, c: char) -> Option<u64> {
        let value = match c {
            '0'..='9' => c as u64 - '0' as u64,
            'A'..='F' => c as u64 - 'A' as u64 + 10,
            _ => return None,
        };

        (value < self.radix).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_binary() {
        let codec = IdentifierCodec::new(1).unwrap();
        assert_eq!(codec.encode(1), "1");
        assert_eq!(codec.encode(5), "101");
        assert_eq!(codec.encode(15), "1111");
        assert_eq!(codec.encode(16), "10000");
    }

    #[test]
    fn test_encode_hex_letters() {
        let codec = IdentifierCodec::new(4).unwrap();
        assert_eq!(codec.encode(10), "A");
        assert_eq!(codec.encode(255), "FF");
        assert_eq!(codec.encode(0xBEEF), "BEEF");
        assert_eq!(codec.encode(u64::MAX), "FFFFFFFFFFFFFFFF");
    }

    #[test]
    fn test_encode_radix_eight() {
        let codec = IdentifierCodec::new(3).unwrap();
        assert_eq!(codec.encode(8), "10");
        assert_eq!(codec.encode(511), "777");
    }

    #[test]
    fn test_zero_conventions() {
        let digit = IdentifierCodec::with_zero_encoding(2, ZeroEncoding::Digit).unwrap();
        let empty = IdentifierCodec::with_zero_encoding(2, ZeroEncoding::Empty).unwrap();

        assert_eq!(digit.encode(0), "0");
        assert_eq!(empty.encode(0), "");

        // Both forms decode to zero
        assert_eq!(digit.decode("").unwrap(), 0);
        assert_eq!(empty.decode("0").unwrap(), 0);
    }

    #[test]
    fn test_invalid_radix_exponent() {
        assert!(matches!(
            IdentifierCodec::new(0),
            Err(PastryError::Configuration(_))
        ));
        assert!(matches!(
            IdentifierCodec::new(5),
            Err(PastryError::Configuration(_))
        ));
    }

    #[test]
    fn test_decode_rejects_out_of_radix_digit() {
        let codec = IdentifierCodec::new(1).unwrap();
        let err = codec.decode("102").unwrap_err();
        assert!(matches!(err, PastryError::MalformedIdentifier { ref id, .. } if id == "102"));
    }

    #[test]
    fn test_decode_rejects_lowercase_and_garbage() {
        let codec = IdentifierCodec::new(4).unwrap();
        assert!(codec.decode("ff").is_err());
        assert!(codec.decode("1G").is_err());
        assert!(codec.decode("12 ").is_err());
    }

    #[test]
    fn test_decode_overflow() {
        let codec = IdentifierCodec::new(4).unwrap();
        assert_eq!(codec.decode("FFFFFFFFFFFFFFFF").unwrap(), u64::MAX);
        assert!(codec.decode("10000000000000000").is_err());
    }

    #[test]
    fn test_digit_value_respects_radix() {
        let codec = IdentifierCodec::new(2).unwrap();
        assert_eq!(codec.digit_value('3'), Some(3));
        assert_eq!(codec.digit_value('4'), None);
    }
}
