//! Signer and verifier over arbitrary ordered fields.
//!
//! [`crate::PaymentRequest`] and [`crate::BankCallback`] fix the field order
//! for their generation. These functions take the order from the caller,
//! for integrations that assemble fields themselves.
//!
//! Both consult the self-test gate first.

use crate::{self_test, ProtocolVariant, Result, SecretKey};

/// Sign field values in the given order.
///
/// # Examples
///
/// ```
/// use cardpay_lib::{signing, ProtocolVariant, SecretKey};
///
/// let key = SecretKey::from_hex(
///     "1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D",
/// )?;
/// let sig = signing::sign(ProtocolVariant::Legacy, &["1111", "OK", "123456"], &key)?;
/// assert_eq!(sig, "781C110AD840077E470E1D5C9F944D7D");
/// # Ok::<(), cardpay_lib::CardPayError>(())
/// ```
#[tracing::instrument(skip(fields, key), fields(variant = %variant, fields = fields.len()))]
pub fn sign(variant: ProtocolVariant, fields: &[&str], key: &SecretKey) -> Result<String> {
    self_test::ensure()?;
    variant.compute(fields, key)
}

/// Recompute the signature over `fields` and compare with `supplied`.
///
/// Returns `Ok(false)` on mismatch; errors only if the self-test failed.
#[tracing::instrument(skip(fields, supplied, key), fields(variant = %variant, fields = fields.len()))]
pub fn verify(
    variant: ProtocolVariant,
    fields: &[&str],
    supplied: &str,
    key: &SecretKey,
) -> Result<bool> {
    let expected = sign(variant, fields, key)?;
    let valid = variant.signatures_match(&expected, supplied);
    if !valid {
        tracing::warn!("signature mismatch");
    }
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(hex: &str) -> SecretKey {
        SecretKey::from_hex(hex).unwrap()
    }

    #[test]
    fn test_sign_is_deterministic() {
        let k = key("0011223344556677");
        for variant in [ProtocolVariant::Legacy, ProtocolVariant::Hmac256] {
            let a = sign(variant, &["a", "b", "c"], &k).unwrap();
            let b = sign(variant, &["a", "b", "c"], &k).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.len(), variant.signature_len());
        }
    }

    #[test]
    fn test_verify_inverse_of_sign() {
        let k = key("abcdef");
        for variant in [ProtocolVariant::Legacy, ProtocolVariant::Hmac256] {
            let sig = sign(variant, &["1", "OK", ""], &k).unwrap();
            assert!(verify(variant, &["1", "OK", ""], &sig, &k).unwrap());
            assert!(!verify(variant, &["2", "OK", ""], &sig, &k).unwrap());
        }
    }

    #[test]
    fn test_variants_are_not_interchangeable() {
        let k = key("abcdef");
        let legacy = sign(ProtocolVariant::Legacy, &["x"], &k).unwrap();
        assert!(!verify(ProtocolVariant::Hmac256, &["x"], &legacy, &k).unwrap());
    }

    #[test]
    fn test_field_boundaries_are_not_signed() {
        // Undelimited concatenation: only the joined string matters.
        let k = key("abcdef");
        let a = sign(ProtocolVariant::Hmac256, &["ab", "c"], &k).unwrap();
        let b = sign(ProtocolVariant::Hmac256, &["a", "bc"], &k).unwrap();
        assert_eq!(a, b);
    }
}
