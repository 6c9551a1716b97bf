//! The two CardPay signing generations.
//!
//! Both generations sign the undelimited concatenation of field values in a
//! fixed order. They differ in everything else: field set, primitive, key
//! length and hex case. The only shared piece is [`canonical_string`].
//!
//! Functions here are the raw primitives and are not gated by the self-test.
//! Use [`crate::signing`] or the request/callback types for real traffic.

pub mod hmac256;
pub mod legacy;

use crate::codec::HexCase;
use crate::{CardPayError, Result, SecretKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use subtle::ConstantTimeEq;

/// Protocol generation selected by the merchant's deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolVariant {
    /// SHA-1 truncated to 16 bytes, encrypted with AES-256-ECB, uppercase hex.
    Legacy,
    /// HMAC-SHA256, lowercase hex.
    #[default]
    Hmac256,
}

impl ProtocolVariant {
    /// Stable lowercase name used in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Hmac256 => "hmac256",
        }
    }

    /// Length of the raw key material after padding/truncation.
    pub fn key_len(self) -> usize {
        match self {
            Self::Legacy => legacy::KEY_LEN,
            Self::Hmac256 => hmac256::KEY_LEN,
        }
    }

    /// Hex case of the emitted signature.
    pub fn hex_case(self) -> HexCase {
        match self {
            Self::Legacy => HexCase::Upper,
            Self::Hmac256 => HexCase::Lower,
        }
    }

    /// Length of the hex-encoded signature.
    pub fn signature_len(self) -> usize {
        match self {
            Self::Legacy => legacy::SIGNATURE_LEN,
            Self::Hmac256 => hmac256::SIGNATURE_LEN,
        }
    }

    /// Name of the form/callback parameter that carries the signature.
    pub fn signature_field(self) -> &'static str {
        match self {
            Self::Legacy => "SIGN",
            Self::Hmac256 => "HMAC",
        }
    }

    /// Default gateway endpoint for this generation.
    pub fn default_gateway_url(self) -> &'static str {
        match self {
            Self::Legacy => "https://moja.tatrabanka.sk/cgi-bin/e-commerce/start/e-commerce.jsp",
            Self::Hmac256 => "https://moja.tatrabanka.sk/cgi-bin/e-commerce/start/cardpay",
        }
    }

    /// Sign ordered field values. Not gated by the self-test.
    pub fn compute(self, fields: &[&str], key: &SecretKey) -> Result<String> {
        let canonical = canonical_string(fields);
        tracing::debug!(
            variant = self.as_str(),
            fields = fields.len(),
            canonical_len = canonical.len(),
            "computing signature"
        );
        let message = ascii_bytes(&canonical);
        match self {
            Self::Legacy => legacy::sign(&message, key),
            Self::Hmac256 => hmac256::sign(&message, key),
        }
    }

    /// Compare an expected signature with a supplied one.
    ///
    /// The supplied value is re-cased to this generation's convention and
    /// compared in constant time.
    pub fn signatures_match(self, expected: &str, supplied: &str) -> bool {
        let supplied = self.hex_case().normalize(supplied.trim());
        if supplied.len() != expected.len() {
            return false;
        }
        expected.as_bytes().ct_eq(supplied.as_bytes()).into()
    }
}

impl fmt::Display for ProtocolVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtocolVariant {
    type Err = CardPayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" | "aes" | "aes256" | "v1" => Ok(Self::Legacy),
            "hmac" | "hmac256" | "hmac-sha256" | "v2" => Ok(Self::Hmac256),
            other => Err(CardPayError::invalid_config(
                "variant",
                format!("unknown protocol variant {:?}", other),
            )),
        }
    }
}

/// Undelimited concatenation of field values in the given order.
pub fn canonical_string(fields: &[&str]) -> String {
    fields.concat()
}

/// ASCII encoding of the canonical string.
///
/// Characters outside ASCII become `?`, matching what the gateway's own
/// ASCII encoder produces for them.
pub fn ascii_bytes(canonical: &str) -> Vec<u8> {
    canonical
        .chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect()
}
