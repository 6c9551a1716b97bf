//! Hex codec for key material and signatures.
//!
//! The legacy generation emits uppercase hex, the HMAC generation lowercase.
//! Decoding accepts either case.

use crate::{CardPayError, Result};

/// Letter case of an encoded signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexCase {
    /// `A-F`
    Upper,
    /// `a-f`
    Lower,
}

impl HexCase {
    /// Encode bytes using this case.
    pub fn encode(self, bytes: impl AsRef<[u8]>) -> String {
        match self {
            Self::Upper => encode_upper(bytes),
            Self::Lower => encode_lower(bytes),
        }
    }

    /// Re-case an already encoded string. Non-hex characters pass through.
    pub fn normalize(self, encoded: &str) -> String {
        match self {
            Self::Upper => encoded.to_ascii_uppercase(),
            Self::Lower => encoded.to_ascii_lowercase(),
        }
    }
}

/// Encode bytes as uppercase hex.
///
/// # Examples
///
/// ```
/// assert_eq!(cardpay_lib::codec::encode_upper([0x1a, 0x2b]), "1A2B");
/// ```
pub fn encode_upper(bytes: impl AsRef<[u8]>) -> String {
    hex::encode_upper(bytes)
}

/// Encode bytes as lowercase hex.
pub fn encode_lower(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Decode a hex string of either case.
///
/// # Errors
///
/// Returns [`CardPayError::InvalidKeyEncoding`] for odd-length input or any
/// character outside `0-9a-fA-F`.
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    hex::decode(encoded).map_err(|e| CardPayError::InvalidKeyEncoding(e.to_string()))
}

/// Decode a hex string into exactly `N` bytes.
///
/// Shorter input is zero-padded on the right, longer input is truncated.
/// Both generations derive their fixed-size cipher/MAC keys this way.
pub fn decode_fixed<const N: usize>(encoded: &str) -> Result<[u8; N]> {
    let bytes = decode(encoded)?;
    let mut out = [0u8; N];
    let len = bytes.len().min(N);
    out[..len].copy_from_slice(&bytes[..len]);
    Ok(out)
}
