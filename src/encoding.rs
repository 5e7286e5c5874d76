use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// UTF-8 bytes of `text` read as one big-endian integer.
pub fn encode_text(text: &str) -> BigUint {
    BigUint::from_bytes_be(text.as_bytes())
}

/// Inverse of [`encode_text`]. Zero decodes to the empty string.
pub fn decode_text(value: &BigUint) -> Result<String> {
    if value.is_zero() {
        return Ok(String::new());
    }
    Ok(String::from_utf8(value.to_bytes_be())?)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretKind {
    Integer,
    Text,
}

/// A caller payload before it is mapped onto the field.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Secret {
    Integer(BigUint),
    Text(String),
}

impl Secret {
    /// All-digit input is an integer; anything else is treated as text.
    pub fn parse(input: &str) -> Self {
        if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(value) = input.parse() {
                return Secret::Integer(value);
            }
        }
        Secret::Text(input.to_string())
    }

    pub fn kind(&self) -> SecretKind {
        match self {
            Secret::Integer(_) => SecretKind::Integer,
            Secret::Text(_) => SecretKind::Text,
        }
    }

    pub fn to_biguint(&self) -> BigUint {
        match self {
            Secret::Integer(value) => value.clone(),
            Secret::Text(text) => encode_text(text),
        }
    }

    /// Maps a recovered integer back to a payload of the given kind.
    pub fn from_biguint(value: BigUint, kind: SecretKind) -> Result<Self> {
        match kind {
            SecretKind::Integer => Ok(Secret::Integer(value)),
            SecretKind::Text => Ok(Secret::Text(decode_text(&value)?)),
        }
    }

    /// Prefers text when the value decodes as UTF-8, otherwise keeps the integer.
    pub fn detect(value: BigUint) -> Self {
        match decode_text(&value) {
            Ok(text) => Secret::Text(text),
            Err(_) => Secret::Integer(value),
        }
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Secret::Integer(value) => write!(f, "{value}"),
            Secret::Text(text) => f.write_str(text),
        }
    }
}
