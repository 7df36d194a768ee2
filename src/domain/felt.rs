//! Field elements and selector hashing
//!
//! Every calldata token is ultimately one felt: an integer below the Stark
//! prime. The field element itself comes from `starknet-types-core`; u256
//! limb arithmetic shares [`parse_u256`] so both accept the same notation.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use starknet_core::utils::{
    cairo_short_string_to_felt, get_selector_from_name, parse_cairo_short_string, starknet_keccak,
};
use starknet_types_core::felt::Felt as FieldElement;
use thiserror::Error;

/// Errors raised while parsing numeric felt/u256 strings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeltError {
    #[error("empty numeric value")]
    Empty,
    #[error("negative values are not supported: {0}")]
    Negative(String),
    #[error("invalid number: {0}")]
    Invalid(String),
    #[error("value does not fit in 256 bits: {0}")]
    Overflow(String),
    #[error("value is not below the field prime: {0}")]
    OutOfField(String),
}

/// Parse a decimal or `0x`-prefixed hex string into a 256-bit integer
pub fn parse_u256(raw: &str) -> Result<U256, FeltError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FeltError::Empty);
    }
    if value.starts_with('-') {
        return Err(FeltError::Negative(value.to_string()));
    }

    let (digits, radix) = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex_digits) => (hex_digits, 16),
        None => (value, 10),
    };

    let valid = !digits.is_empty()
        && digits.chars().all(|c| {
            if radix == 16 {
                c.is_ascii_hexdigit()
            } else {
                c.is_ascii_digit()
            }
        });
    if !valid {
        return Err(FeltError::Invalid(value.to_string()));
    }

    // Digits are validated above, so any remaining failure is an overflow.
    U256::from_str_radix(digits, radix).map_err(|_| FeltError::Overflow(value.to_string()))
}

/// A Starknet field element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Felt(FieldElement);

impl Felt {
    pub const ZERO: Self = Self(FieldElement::ZERO);

    /// Parse a decimal or hex string, rejecting values outside the field
    ///
    /// Unlike `FieldElement::from_hex`, values at or above the prime are an
    /// error instead of being reduced.
    pub fn parse(raw: &str) -> Result<Self, FeltError> {
        let value = parse_u256(raw)?;
        if value > U256::from_be_bytes(FieldElement::MAX.to_bytes_be()) {
            return Err(FeltError::OutOfField(raw.trim().to_string()));
        }
        Ok(Self(FieldElement::from_bytes_be(&value.to_be_bytes::<32>())))
    }

    pub fn to_hex(&self) -> String {
        format!("0x{:x}", self.as_integer())
    }

    pub fn to_dec(&self) -> String {
        self.as_integer().to_string()
    }

    /// Decode a Cairo short string (up to 31 printable ASCII bytes)
    ///
    /// Returns `None` when the felt holds any non-printable byte.
    pub fn to_short_string(&self) -> Option<String> {
        parse_cairo_short_string(&self.0)
            .ok()
            .filter(|text| text.bytes().all(|b| (0x20..0x7f).contains(&b)))
    }

    /// Encode up to 31 ASCII bytes as a Cairo short string
    pub fn from_short_string(text: &str) -> Result<Self, FeltError> {
        cairo_short_string_to_felt(text)
            .map(Self)
            .map_err(|_| FeltError::Invalid(text.to_string()))
    }

    fn as_integer(&self) -> U256 {
        U256::from_be_bytes(self.0.to_bytes_be())
    }
}

impl From<u64> for Felt {
    fn from(value: u64) -> Self {
        Self(FieldElement::from(value))
    }
}

impl FromStr for Felt {
    type Err = FeltError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Felt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Felt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Felt::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Entry point selector for a function name
///
/// Cairo identifiers are ASCII; anything else is hashed byte for byte.
pub fn selector_from_name(name: &str) -> Felt {
    Felt(get_selector_from_name(name).unwrap_or_else(|_| starknet_keccak(name.as_bytes())))
}
