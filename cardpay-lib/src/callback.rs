//! Inbound bank notification.
//!
//! The gateway redirects the customer back to RURL with the result of the
//! payment in query/form parameters. A callback exists only long enough to be
//! verified; nothing here is persisted.
//!
//! A signature mismatch is a normal outcome (forged or corrupted callback)
//! and is reported as `Ok(false)`. A missing required parameter is a
//! [`CardPayError::MalformedCallback`].
//!
//! Echo fields are parsed to check their format, but the signature is always
//! recomputed over the text exactly as received.

use crate::timestamp::GatewayTimestamp;
use crate::{self_test, Amount, CardPayError, Currency, ProtocolVariant, Result, SecretKey};
use std::collections::HashMap;
use std::fmt;

/// RES parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultCode {
    /// Payment accepted.
    Ok,
    /// Payment failed or was cancelled.
    Fail,
    /// Bank did not receive the result in time.
    Timeout,
    /// Anything else, kept verbatim because it is part of the signed string.
    Other(String),
}

impl ResultCode {
    /// Parse the RES value.
    pub fn parse(s: &str) -> Self {
        match s {
            "OK" => Self::Ok,
            "FAIL" => Self::Fail,
            "TOUT" => Self::Timeout,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire form.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "OK",
            Self::Fail => "FAIL",
            Self::Timeout => "TOUT",
            Self::Other(s) => s,
        }
    }

    /// True only for `OK`. Meaningful only after the signature verified.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A callback parameter as received, together with its parsed value.
///
/// Signing always uses [`Self::raw`]; the value is for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received<T> {
    raw: String,
    value: T,
}

impl<T> Received<T> {
    pub(crate) fn new(raw: &str, value: T) -> Self {
        Self {
            raw: raw.to_string(),
            value,
        }
    }

    /// Exact text the bank sent.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parsed value.
    pub fn value(&self) -> &T {
        &self.value
    }
}

/// Legacy callback: `VS`, `RES`, `AC`, `SIGN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyCallback {
    /// VS
    pub variable_symbol: Received<u64>,
    /// RES
    pub result: ResultCode,
    /// AC, absent on failed payments
    pub auth_code: Option<String>,
    /// SIGN as supplied by the caller
    pub signature: String,
}

impl LegacyCallback {
    /// Field values in signing order: VS, RES, AC.
    pub fn signing_fields(&self) -> Vec<String> {
        vec![
            self.variable_symbol.raw().to_string(),
            self.result.as_str().to_string(),
            self.auth_code.clone().unwrap_or_default(),
        ]
    }
}

/// HMAC callback: `AMT`, `CURR`, `VS`, `RES`, `AC`, `TID`, `TIMESTAMP`, `HMAC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HmacCallback {
    /// AMT echo
    pub amount: Received<Amount>,
    /// CURR echo
    pub currency: Received<Currency>,
    /// VS
    pub variable_symbol: Received<u64>,
    /// RES
    pub result: ResultCode,
    /// AC, absent on failed payments
    pub auth_code: Option<String>,
    /// TID
    pub transaction_id: String,
    /// TIMESTAMP
    pub timestamp: Received<GatewayTimestamp>,
    /// HMAC as supplied by the caller
    pub signature: String,
}

impl HmacCallback {
    /// Field values in signing order: AMT, CURR, VS, RES, AC, TID, TIMESTAMP.
    pub fn signing_fields(&self) -> Vec<String> {
        vec![
            self.amount.raw().to_string(),
            self.currency.raw().to_string(),
            self.variable_symbol.raw().to_string(),
            self.result.as_str().to_string(),
            self.auth_code.clone().unwrap_or_default(),
            self.transaction_id.clone(),
            self.timestamp.raw().to_string(),
        ]
    }
}

/// A bank callback of either generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankCallback {
    /// Legacy generation.
    Legacy(LegacyCallback),
    /// HMAC generation.
    Hmac256(HmacCallback),
}

impl BankCallback {
    /// Parse a raw query string (without the leading `?`).
    pub fn from_query(variant: ProtocolVariant, query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_params(variant, url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Parse named parameters. Unknown parameters are ignored; on duplicates
    /// the first occurrence wins.
    pub fn from_params<I, K, V>(variant: ProtocolVariant, params: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map: HashMap<String, String> = HashMap::new();
        for (k, v) in params {
            map.entry(k.as_ref().to_string())
                .or_insert_with(|| v.as_ref().to_string());
        }
        let params = Params(map);

        match variant {
            ProtocolVariant::Legacy => Ok(Self::Legacy(LegacyCallback {
                variable_symbol: params.variable_symbol()?,
                result: ResultCode::parse(params.required("RES")?),
                auth_code: params.optional("AC"),
                signature: params.required("SIGN")?.to_string(),
            })),
            ProtocolVariant::Hmac256 => Ok(Self::Hmac256(HmacCallback {
                amount: params.parsed("AMT", Amount::from_str_checked)?,
                currency: params.parsed("CURR", str::parse::<Currency>)?,
                variable_symbol: params.variable_symbol()?,
                result: ResultCode::parse(params.required("RES")?),
                auth_code: params.optional("AC"),
                transaction_id: params.required("TID")?.to_string(),
                timestamp: params.parsed("TIMESTAMP", GatewayTimestamp::parse)?,
                signature: params.required("HMAC")?.to_string(),
            })),
        }
    }

    /// Generation this callback belongs to.
    pub fn variant(&self) -> ProtocolVariant {
        match self {
            Self::Legacy(_) => ProtocolVariant::Legacy,
            Self::Hmac256(_) => ProtocolVariant::Hmac256,
        }
    }

    /// VS.
    pub fn variable_symbol(&self) -> u64 {
        match self {
            Self::Legacy(cb) => *cb.variable_symbol.value(),
            Self::Hmac256(cb) => *cb.variable_symbol.value(),
        }
    }

    /// RES.
    pub fn result(&self) -> &ResultCode {
        match self {
            Self::Legacy(cb) => &cb.result,
            Self::Hmac256(cb) => &cb.result,
        }
    }

    /// AC.
    pub fn auth_code(&self) -> Option<&str> {
        match self {
            Self::Legacy(cb) => cb.auth_code.as_deref(),
            Self::Hmac256(cb) => cb.auth_code.as_deref(),
        }
    }

    /// Signature as supplied in the callback.
    pub fn supplied_signature(&self) -> &str {
        match self {
            Self::Legacy(cb) => &cb.signature,
            Self::Hmac256(cb) => &cb.signature,
        }
    }

    /// Field values in this generation's callback signing order.
    pub fn signing_fields(&self) -> Vec<String> {
        match self {
            Self::Legacy(cb) => cb.signing_fields(),
            Self::Hmac256(cb) => cb.signing_fields(),
        }
    }

    /// Recompute the signature and compare it to the supplied one.
    ///
    /// Returns `Ok(false)` on mismatch.
    ///
    /// # Errors
    ///
    /// Fails with [`CardPayError::SelfTestFailed`] if the known-answer check
    /// did not pass in this process.
    #[tracing::instrument(skip(self, key), fields(variant = %self.variant(), vs = self.variable_symbol()))]
    pub fn verify(&self, key: &SecretKey) -> Result<bool> {
        self_test::ensure()?;
        let valid = self.verify_unchecked(key)?;
        if !valid {
            tracing::warn!(result = %self.result(), "callback signature mismatch");
        }
        Ok(valid)
    }

    /// Verify against a merchant configuration, rejecting generation mismatches.
    pub fn verify_with(&self, config: &crate::MerchantConfig) -> Result<bool> {
        if config.variant != self.variant() {
            return Err(CardPayError::VariantMismatch {
                expected: config.variant.as_str(),
                actual: self.variant().as_str(),
            });
        }
        self.verify(&config.secret_key)
    }

    /// Verification without consulting the self-test gate.
    pub(crate) fn verify_unchecked(&self, key: &SecretKey) -> Result<bool> {
        let variant = self.variant();
        let fields = self.signing_fields();
        let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        let expected = variant.compute(&refs, key)?;
        Ok(variant.signatures_match(&expected, self.supplied_signature()))
    }
}

struct Params(HashMap<String, String>);

impl Params {
    fn required(&self, name: &'static str) -> Result<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| CardPayError::malformed_callback(name, "missing parameter"))
    }

    fn optional(&self, name: &str) -> Option<String> {
        self.0.get(name).filter(|v| !v.is_empty()).cloned()
    }

    fn parsed<T, F>(&self, name: &'static str, parse: F) -> Result<Received<T>>
    where
        F: FnOnce(&str) -> Result<T>,
    {
        let raw = self.required(name)?;
        let value =
            parse(raw).map_err(|e| CardPayError::malformed_callback(name, e.to_string()))?;
        Ok(Received::new(raw, value))
    }

    fn variable_symbol(&self) -> Result<Received<u64>> {
        let raw = self.required("VS")?;
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CardPayError::malformed_callback(
                "VS",
                format!("expected digits, got {:?}", raw),
            ));
        }
        let value = raw
            .parse()
            .map_err(|e| CardPayError::malformed_callback("VS", format!("{}", e)))?;
        Ok(Received::new(raw, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_KEY: &str = "1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D";
    const HMAC_KEY: &str = "31323334353637383930313233343536373839303132333435363738393031323132333435363738393031323334353637383930313233343536373839303132";

    fn legacy_key() -> SecretKey {
        SecretKey::from_hex(LEGACY_KEY).unwrap()
    }

    fn hmac_key() -> SecretKey {
        SecretKey::from_hex(HMAC_KEY).unwrap()
    }

    #[test]
    fn test_legacy_vector() {
        let cb = BankCallback::from_query(
            ProtocolVariant::Legacy,
            "VS=1111&RES=OK&AC=123456&SIGN=781C110AD840077E470E1D5C9F944D7D",
        )
        .unwrap();
        assert_eq!(cb.signing_fields(), vec!["1111", "OK", "123456"]);
        assert!(cb.verify(&legacy_key()).unwrap());
        assert!(cb.result().is_success());
    }

    #[test]
    fn test_hmac_vector() {
        let cb = BankCallback::from_query(
            ProtocolVariant::Hmac256,
            "AMT=1234.50&CURR=978&VS=1111&RES=OK&AC=123456&TID=1&TIMESTAMP=01092014125505\
             &HMAC=8df96c2603831046d0e3502cab1ddb7d9b629d7f09a44aee7abbec0be3f2d971",
        )
        .unwrap();
        assert_eq!(
            cb.signing_fields(),
            vec!["1234.50", "978", "1111", "OK", "123456", "1", "01092014125505"]
        );
        assert!(cb.verify(&hmac_key()).unwrap());
    }

    #[test]
    fn test_mismatch_is_false_not_error() {
        let cb = BankCallback::from_query(
            ProtocolVariant::Legacy,
            "VS=1111&RES=FAIL&AC=123456&SIGN=781C110AD840077E470E1D5C9F944D7D",
        )
        .unwrap();
        assert!(!cb.verify(&legacy_key()).unwrap());
    }

    #[test]
    fn test_missing_ac_is_empty_string() {
        let cb = BankCallback::from_params(
            ProtocolVariant::Legacy,
            [("VS", "1111"), ("RES", "FAIL"), ("SIGN", "00")],
        )
        .unwrap();
        assert_eq!(cb.auth_code(), None);
        assert_eq!(cb.signing_fields(), vec!["1111", "FAIL", ""]);

        let with_empty = BankCallback::from_params(
            ProtocolVariant::Legacy,
            [("VS", "1111"), ("RES", "FAIL"), ("AC", ""), ("SIGN", "00")],
        )
        .unwrap();
        assert_eq!(with_empty.signing_fields(), cb.signing_fields());
    }

    #[test]
    fn test_missing_required_is_malformed() {
        let err = BankCallback::from_query(ProtocolVariant::Legacy, "VS=1111&RES=OK").unwrap_err();
        assert_eq!(err, CardPayError::malformed_callback("SIGN", "missing parameter"));

        let err = BankCallback::from_query(
            ProtocolVariant::Hmac256,
            "AMT=1.00&CURR=978&VS=1&RES=OK&TIMESTAMP=01092014125505&HMAC=00",
        )
        .unwrap_err();
        assert_eq!(err, CardPayError::malformed_callback("TID", "missing parameter"));
    }

    #[test]
    fn test_non_numeric_vs_is_malformed() {
        let err = BankCallback::from_query(ProtocolVariant::Legacy, "VS=11a1&RES=OK&SIGN=00").unwrap_err();
        assert!(matches!(err, CardPayError::MalformedCallback { field: "VS", .. }));
    }

    #[test]
    fn test_bad_echo_fields_are_malformed() {
        let err = BankCallback::from_query(
            ProtocolVariant::Hmac256,
            "AMT=abc&CURR=978&VS=1&RES=OK&TID=1&TIMESTAMP=01092014125505&HMAC=00",
        )
        .unwrap_err();
        assert!(matches!(err, CardPayError::MalformedCallback { field: "AMT", .. }));

        let err = BankCallback::from_query(
            ProtocolVariant::Hmac256,
            "AMT=1.00&CURR=999&VS=1&RES=OK&TID=1&TIMESTAMP=01092014125505&HMAC=00",
        )
        .unwrap_err();
        assert!(matches!(err, CardPayError::MalformedCallback { field: "CURR", .. }));
    }

    #[test]
    fn test_non_canonical_echo_fields_do_not_verify() {
        let signed = "8df96c2603831046d0e3502cab1ddb7d9b629d7f09a44aee7abbec0be3f2d971";
        for (amt, curr, vs) in [
            ("01234.50", "978", "1111"),
            ("1234.5", "978", "1111"),
            ("1234.500", "978", "1111"),
            ("1234.50", "EUR", "1111"),
            ("1234.50", "eur", "1111"),
            ("1234.50", "0978", "1111"),
            ("1234.50", "978", "01111"),
        ] {
            let cb = BankCallback::from_params(
                ProtocolVariant::Hmac256,
                [
                    ("AMT", amt),
                    ("CURR", curr),
                    ("VS", vs),
                    ("RES", "OK"),
                    ("AC", "123456"),
                    ("TID", "1"),
                    ("TIMESTAMP", "01092014125505"),
                    ("HMAC", signed),
                ],
            )
            .unwrap();
            assert_eq!(
                cb.verify(&hmac_key()),
                Ok(false),
                "AMT={} CURR={} VS={}",
                amt,
                curr,
                vs
            );
        }
    }

    #[test]
    fn test_received_keeps_raw_text_and_value() {
        let cb = BankCallback::from_query(
            ProtocolVariant::Hmac256,
            "AMT=1234.5&CURR=EUR&VS=01111&RES=OK&TID=1&TIMESTAMP=01092014125505&HMAC=00",
        )
        .unwrap();
        let BankCallback::Hmac256(hmac) = &cb else {
            panic!("expected HMAC callback");
        };
        assert_eq!(hmac.amount.raw(), "1234.5");
        assert_eq!(hmac.amount.value().canonical(), "1234.50");
        assert_eq!(hmac.currency.raw(), "EUR");
        assert_eq!(*hmac.currency.value(), Currency::Eur);
        assert_eq!(cb.variable_symbol(), 1111);
        assert_eq!(
            cb.signing_fields(),
            vec!["1234.5", "EUR", "01111", "OK", "", "1", "01092014125505"]
        );
    }

    #[test]
    fn test_legacy_vs_signed_as_received() {
        let cb = BankCallback::from_query(
            ProtocolVariant::Legacy,
            "VS=01111&RES=OK&AC=123456&SIGN=781C110AD840077E470E1D5C9F944D7D",
        )
        .unwrap();
        assert_eq!(cb.variable_symbol(), 1111);
        assert!(!cb.verify(&legacy_key()).unwrap());
    }

    #[test]
    fn test_result_codes() {
        assert_eq!(ResultCode::parse("OK"), ResultCode::Ok);
        assert_eq!(ResultCode::parse("FAIL"), ResultCode::Fail);
        assert_eq!(ResultCode::parse("TOUT"), ResultCode::Timeout);
        assert_eq!(ResultCode::parse("XYZ").as_str(), "XYZ");
        assert!(!ResultCode::Fail.is_success());
    }

    #[test]
    fn test_verify_with_rejects_other_generation() {
        let config = crate::MerchantConfig::new(9999, hmac_key(), ProtocolVariant::Hmac256);
        let cb = BankCallback::from_query(
            ProtocolVariant::Legacy,
            "VS=1111&RES=OK&AC=123456&SIGN=781C110AD840077E470E1D5C9F944D7D",
        )
        .unwrap();
        assert!(matches!(
            cb.verify_with(&config),
            Err(CardPayError::VariantMismatch { .. })
        ));
    }

    #[test]
    fn test_lowercase_legacy_signature_accepted() {
        let cb = BankCallback::from_query(
            ProtocolVariant::Legacy,
            "VS=1111&RES=OK&AC=123456&SIGN=781c110ad840077e470e1d5c9f944d7d",
        )
        .unwrap();
        assert!(cb.verify(&legacy_key()).unwrap());
    }
}
