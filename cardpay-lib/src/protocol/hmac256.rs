//! Current generation: `hex(HMAC_SHA256(key, message))`.

use crate::{codec, CardPayError, Result, SecretKey};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// HMAC key length in bytes (the SHA-256 block size).
pub const KEY_LEN: usize = 64;

/// Hex characters in a signature.
pub const SIGNATURE_LEN: usize = 64;

/// Sign the ASCII canonical message.
pub fn sign(message: &[u8], key: &SecretKey) -> Result<String> {
    let key_bytes = key.fixed::<KEY_LEN>();
    let mut mac = HmacSha256::new_from_slice(&key_bytes[..])
        .map_err(|e| CardPayError::Crypto(format!("HMAC key rejected: {}", e)))?;
    mac.update(message);
    Ok(codec::encode_lower(mac.finalize().into_bytes()))
}
