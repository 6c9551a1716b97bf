//! Merchant secret key.
//!
//! The key is configured as a hex string and kept decoded in memory. It is
//! zeroized on drop and never printed, not even by `Debug`.

use crate::{codec, CardPayError, Result};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Shared secret used by both protocol generations.
#[derive(Clone, Zeroize, ZeroizeOnDrop, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct SecretKey {
    bytes: Vec<u8>,
}

impl SecretKey {
    /// Decode a hex-encoded key.
    ///
    /// # Errors
    ///
    /// [`CardPayError::InvalidKeyEncoding`] for odd-length or non-hex input,
    /// and for an empty key.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = codec::decode(encoded.trim())?;
        if bytes.is_empty() {
            return Err(CardPayError::InvalidKeyEncoding("key is empty".into()));
        }
        Ok(Self { bytes })
    }

    /// Number of decoded bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; empty keys are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Key material zero-padded or truncated to exactly `N` bytes.
    pub fn fixed<const N: usize>(&self) -> Zeroizing<[u8; N]> {
        let mut out = Zeroizing::new([0u8; N]);
        let len = self.bytes.len().min(N);
        out[..len].copy_from_slice(&self.bytes[..len]);
        out
    }
}

impl TryFrom<String> for SecretKey {
    type Error = CardPayError;

    fn try_from(value: String) -> Result<Self> {
        let value = Zeroizing::new(value);
        Self::from_hex(&value)
    }
}

impl std::str::FromStr for SecretKey {
    type Err = CardPayError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey([REDACTED; {} bytes])", self.bytes.len())
    }
}
