//! Legacy generation: `HEX(AES256_ECB(SHA1(message)[0..16], key))`.
//!
//! ECB without padding is only acceptable because the plaintext is exactly
//! one opaque digest block. Do not reuse this construction elsewhere.

use crate::{codec, Result, SecretKey};
use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes256;
use sha1::{Digest, Sha1};

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// Bytes of the SHA-1 digest that get encrypted (one AES block).
pub const BLOCK_LEN: usize = 16;

/// Hex characters in a signature.
pub const SIGNATURE_LEN: usize = BLOCK_LEN * 2;

/// Sign the ASCII canonical message.
pub fn sign(message: &[u8], key: &SecretKey) -> Result<String> {
    let digest = Sha1::digest(message);
    let mut block = GenericArray::clone_from_slice(&digest[..BLOCK_LEN]);

    let key_bytes = key.fixed::<KEY_LEN>();
    let cipher = Aes256::new(GenericArray::from_slice(&key_bytes[..]));
    cipher.encrypt_block(&mut block);

    Ok(codec::encode_upper(block))
}
