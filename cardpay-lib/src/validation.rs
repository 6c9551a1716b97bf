//! Field validation for outgoing payment requests.
//!
//! The gateway documents limits that historical integrations never checked
//! before signing. [`Validation::Permissive`] keeps that behavior and only
//! enforces what the signing format itself needs; [`Validation::Strict`]
//! rejects anything the gateway would refuse.

use crate::{CardPayError, Result};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Maximum number of digits in a variable symbol.
pub const MAX_VS_DIGITS: u32 = 10;

/// Largest representable variable symbol.
pub const MAX_VARIABLE_SYMBOL: u64 = 9_999_999_999;

/// Maximum return URL length in characters.
pub const MAX_RETURN_URL_LEN: usize = 256;

/// Maximum client name length in characters.
pub const MAX_CLIENT_NAME_LEN: usize = 30;

/// How strictly request fields are checked before signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validation {
    /// Only constraints required to build the canonical string.
    #[default]
    Permissive,
    /// Full gateway field rules.
    Strict,
}

/// Check the variable symbol fits in ten digits. Always enforced.
pub fn validate_variable_symbol(vs: u64) -> Result<()> {
    if vs > MAX_VARIABLE_SYMBOL {
        return Err(CardPayError::invalid_field(
            "VS",
            format!("at most {} digits allowed", MAX_VS_DIGITS),
        ));
    }
    Ok(())
}

/// Check the merchant id is positive. Always enforced.
pub fn validate_merchant_id(mid: u64) -> Result<()> {
    if mid == 0 {
        return Err(CardPayError::invalid_field("MID", "merchant id must be positive"));
    }
    Ok(())
}

/// True for characters the gateway accepts in NAME.
pub fn is_allowed_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '-' | '_' | '@')
}

/// NAME: at most 30 characters from `0-9a-zA-Z .-_@`.
pub fn validate_client_name(name: &str) -> Result<()> {
    if let Some(bad) = name.chars().find(|c| !is_allowed_name_char(*c)) {
        tracing::debug!(character = ?bad, "client name rejected");
        return Err(CardPayError::UnsupportedCharacters {
            field: "NAME",
            value: name.to_string(),
        });
    }
    if name.chars().count() > MAX_CLIENT_NAME_LEN {
        return Err(CardPayError::invalid_field(
            "NAME",
            format!("at most {} characters allowed", MAX_CLIENT_NAME_LEN),
        ));
    }
    Ok(())
}

/// RURL: absolute http(s) URL of at most 256 characters.
pub fn validate_return_url(rurl: &str) -> Result<()> {
    if rurl.chars().count() > MAX_RETURN_URL_LEN {
        return Err(CardPayError::invalid_field(
            "RURL",
            format!("at most {} characters allowed", MAX_RETURN_URL_LEN),
        ));
    }
    let parsed = url::Url::parse(rurl).map_err(|e| CardPayError::invalid_field("RURL", e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(CardPayError::invalid_field(
            "RURL",
            format!("unsupported scheme {:?}", other),
        )),
    }
}

/// IPC: client or proxy IP address.
pub fn validate_client_ip(ipc: &str) -> Result<()> {
    ipc.parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| CardPayError::invalid_field("IPC", format!("not an IP address: {:?}", ipc)))
}

impl Validation {
    /// Apply the level-dependent checks to the free-text request fields.
    pub fn check_request_fields(self, rurl: &str, ipc: &str, name: &str) -> Result<()> {
        match self {
            Self::Permissive => Ok(()),
            Self::Strict => {
                validate_return_url(rurl)?;
                validate_client_ip(ipc)?;
                validate_client_name(name)
            }
        }
    }
}
