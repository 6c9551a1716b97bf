//! Property-based tests for cardpay-lib
//!
//! These tests use proptest to check signing and parsing invariants across a
//! wide range of inputs.

#[cfg(test)]
mod signing_properties {
    use cardpay_lib::{signing, ProtocolVariant, SecretKey};
    use proptest::prelude::*;

    fn variant() -> impl Strategy<Value = ProtocolVariant> {
        prop_oneof![Just(ProtocolVariant::Legacy), Just(ProtocolVariant::Hmac256)]
    }

    fn key() -> impl Strategy<Value = SecretKey> {
        prop::collection::vec(any::<u8>(), 1..80)
            .prop_map(|bytes| SecretKey::from_hex(&hex::encode(bytes)).unwrap())
    }

    proptest! {
        /// Same inputs always give the same signature.
        #[test]
        fn sign_is_deterministic(
            v in variant(),
            k in key(),
            fields in prop::collection::vec("[ -~]{0,20}", 0..8),
        ) {
            let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
            let a = signing::sign(v, &refs, &k).unwrap();
            let b = signing::sign(v, &refs, &k).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Output length and casing are fixed per generation.
        #[test]
        fn signature_shape(v in variant(), k in key(), field in ".{0,40}") {
            let sig = signing::sign(v, &[field.as_str()], &k).unwrap();
            prop_assert_eq!(sig.len(), v.signature_len());
            prop_assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
            match v {
                ProtocolVariant::Legacy => prop_assert!(!sig.chars().any(|c| c.is_ascii_lowercase())),
                ProtocolVariant::Hmac256 => prop_assert!(!sig.chars().any(|c| c.is_ascii_uppercase())),
            }
        }

        /// verify accepts what sign produced, in either case.
        #[test]
        fn verify_inverts_sign(
            v in variant(),
            k in key(),
            fields in prop::collection::vec("[0-9A-Za-z.:/ ]{0,16}", 1..8),
        ) {
            let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
            let sig = signing::sign(v, &refs, &k).unwrap();
            prop_assert!(signing::verify(v, &refs, &sig, &k).unwrap());
            prop_assert!(signing::verify(v, &refs, &sig.to_ascii_lowercase(), &k).unwrap());
            prop_assert!(signing::verify(v, &refs, &sig.to_ascii_uppercase(), &k).unwrap());
        }

        /// Appending to any single field changes the signature.
        #[test]
        fn single_field_tamper_detected(
            v in variant(),
            k in key(),
            fields in prop::collection::vec("[0-9A-Za-z]{1,12}", 1..8),
            index in any::<prop::sample::Index>(),
            extra in "[0-9A-Za-z]{1,4}",
        ) {
            let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
            let sig = signing::sign(v, &refs, &k).unwrap();

            let mut tampered = fields.clone();
            let i = index.index(tampered.len());
            tampered[i].push_str(&extra);
            let refs: Vec<&str> = tampered.iter().map(String::as_str).collect();
            prop_assert!(!signing::verify(v, &refs, &sig, &k).unwrap());
        }

        /// Keys that differ after padding give different signatures.
        #[test]
        fn distinct_keys_distinct_signatures(
            v in variant(),
            a in prop::collection::vec(any::<u8>(), 32),
            b in prop::collection::vec(any::<u8>(), 32),
        ) {
            prop_assume!(a != b);
            let ka = SecretKey::from_hex(&hex::encode(&a)).unwrap();
            let kb = SecretKey::from_hex(&hex::encode(&b)).unwrap();
            prop_assert_ne!(
                signing::sign(v, &["1111", "OK"], &ka).unwrap(),
                signing::sign(v, &["1111", "OK"], &kb).unwrap()
            );
        }
    }
}

#[cfg(test)]
mod codec_properties {
    use cardpay_lib::codec;
    use cardpay_lib::{CardPayErrorCode, SecretKey};
    use proptest::prelude::*;

    proptest! {
        /// Decoding accepts both cases.
        #[test]
        fn decode_is_case_insensitive(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let upper = codec::encode_upper(&bytes);
            let lower = codec::encode_lower(&bytes);
            prop_assert_eq!(codec::decode(&upper).unwrap(), bytes.clone());
            prop_assert_eq!(codec::decode(&lower).unwrap(), bytes);
        }

        /// Odd-length key material is rejected.
        #[test]
        fn odd_length_rejected(s in "([0-9a-f]{2}){0,31}[0-9a-f]") {
            let err = SecretKey::from_hex(&s).unwrap_err();
            prop_assert_eq!(err.code(), CardPayErrorCode::InvalidKeyEncoding);
        }

        /// Non-hex characters are rejected.
        #[test]
        fn non_hex_rejected(prefix in "[0-9a-f]{0,8}", bad in "[g-zG-Z]") {
            let s = format!("{}{}0", prefix, bad);
            let s = if s.len() % 2 == 1 { format!("{}0", s) } else { s };
            prop_assert!(SecretKey::from_hex(&s).is_err());
        }
    }
}

#[cfg(test)]
mod amount_properties {
    use cardpay_lib::Amount;
    use proptest::prelude::*;

    proptest! {
        /// Canonical form always has exactly two decimals.
        #[test]
        fn canonical_has_two_decimals(minor in 0i64..99_999_999_999i64) {
            let amt = Amount::from_minor_units(minor).unwrap();
            let s = amt.canonical();
            let (int, frac) = s.split_once('.').unwrap();
            prop_assert_eq!(frac.len(), 2);
            prop_assert!(int.bytes().all(|b| b.is_ascii_digit()));
            prop_assert_eq!(format!("{}{}", int, frac).parse::<i64>().unwrap(), minor);
        }

        /// Parsing the canonical form yields the same amount.
        #[test]
        fn canonical_parses_back(minor in 0i64..99_999_999_999i64) {
            let amt = Amount::from_minor_units(minor).unwrap();
            prop_assert_eq!(amt.canonical().parse::<Amount>().unwrap(), amt);
        }
    }
}
