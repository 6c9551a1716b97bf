//! Payment amount using fixed-point decimal.
//!
//! **NEVER use f64 for amounts.** The canonical signing string needs exactly
//! two fractional digits with a `.` separator, which floating point cannot
//! guarantee across platforms.

use crate::{CardPayError, Result};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Largest amount the gateway accepts: 9 integer digits and 2 decimals.
const MAX_INTEGER_DIGITS: u32 = 9;

/// Number of fractional digits in the canonical form.
const SCALE: u32 = 2;

/// Transaction amount in the currency's major unit.
///
/// # Examples
///
/// ```rust
/// use cardpay_lib::Amount;
///
/// let amt = Amount::from_str_checked("1234.5").unwrap();
/// assert_eq!(amt.to_string(), "1234.50");
///
/// let cents = Amount::from_minor_units(123450).unwrap();
/// assert_eq!(amt, cents);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    /// Create from a decimal value.
    ///
    /// # Errors
    ///
    /// Returns [`CardPayError::InvalidField`] for negative values, more than
    /// two significant fractional digits, or more than nine integer digits.
    pub fn new(value: Decimal) -> Result<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(CardPayError::invalid_field("AMT", "amount must not be negative"));
        }

        let normalized = value.normalize();
        if normalized.scale() > SCALE {
            return Err(CardPayError::invalid_field(
                "AMT",
                format!("at most {} decimal places allowed, got {}", SCALE, value),
            ));
        }

        let limit = Decimal::from(10u64.pow(MAX_INTEGER_DIGITS));
        if normalized >= limit {
            return Err(CardPayError::invalid_field(
                "AMT",
                format!("at most {} integer digits allowed", MAX_INTEGER_DIGITS),
            ));
        }

        let mut value = normalized;
        value.rescale(SCALE);
        Ok(Self { value })
    }

    /// Create from minor units (cents).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cardpay_lib::Amount;
    /// let amt = Amount::from_minor_units(5).unwrap();
    /// assert_eq!(amt.to_string(), "0.05");
    /// ```
    pub fn from_minor_units(minor: i64) -> Result<Self> {
        Self::new(Decimal::new(minor, SCALE))
    }

    /// Create from decimal string (e.g., "123.45").
    ///
    /// Only `.` is accepted as separator; thousands separators are rejected.
    pub fn from_str_checked(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.contains(',') || trimmed.contains('_') {
            return Err(CardPayError::invalid_field(
                "AMT",
                format!("unexpected separator in {:?}", s),
            ));
        }
        let value = Decimal::from_str(trimmed)
            .map_err(|e| CardPayError::invalid_field("AMT", format!("invalid amount: {}", e)))?;
        Self::new(value)
    }

    /// Get the internal Decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Canonical signing form: no grouping, `.` separator, two decimals.
    pub fn canonical(&self) -> String {
        // rescale in `new` fixes the scale, so Display always prints 2 decimals
        self.value.to_string()
    }

    /// Check if amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for Amount {
    type Err = CardPayError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_checked(s)
    }
}

impl TryFrom<String> for Amount {
    type Error = CardPayError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_str_checked(&s)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_two_decimals() {
        assert_eq!(Amount::from_str_checked("1234.5").unwrap().canonical(), "1234.50");
        assert_eq!(Amount::from_str_checked("1234").unwrap().canonical(), "1234.00");
        assert_eq!(Amount::from_str_checked("0.1").unwrap().canonical(), "0.10");
        assert_eq!(Amount::from_str_checked("0").unwrap().canonical(), "0.00");
        assert_eq!(Amount::from_str_checked("1.500").unwrap().canonical(), "1.50");
    }

    #[test]
    fn test_from_minor_units() {
        assert_eq!(Amount::from_minor_units(123450).unwrap().canonical(), "1234.50");
        assert_eq!(Amount::from_minor_units(1).unwrap().canonical(), "0.01");
        assert!(Amount::from_minor_units(-1).is_err());
    }

    #[test]
    fn test_rejects_negative() {
        assert!(Amount::from_str_checked("-1.00").is_err());
    }

    #[test]
    fn test_rejects_extra_precision() {
        let err = Amount::from_str_checked("1.005").unwrap_err();
        assert!(matches!(err, CardPayError::InvalidField { field: "AMT", .. }));
    }

    #[test]
    fn test_rejects_too_many_digits() {
        assert!(Amount::from_str_checked("999999999.99").is_ok());
        assert!(Amount::from_str_checked("1000000000").is_err());
    }

    #[test]
    fn test_rejects_grouping_separators() {
        assert!(Amount::from_str_checked("1,234.50").is_err());
        assert!(Amount::from_str_checked("1234,50").is_err());
        assert!(Amount::from_str_checked("abc").is_err());
    }

    #[test]
    fn test_serialization() {
        let amt = Amount::from_str_checked("12.3").unwrap();
        let json = serde_json::to_string(&amt).unwrap();
        assert_eq!(json, "\"12.30\"");
        let parsed: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(amt, parsed);
    }

    #[test]
    fn test_new_rescales_decimal() {
        use rust_decimal_macros::dec;

        let amt = Amount::new(dec!(7)).unwrap();
        assert_eq!(amt.as_decimal().scale(), 2);
        assert_eq!(amt.canonical(), "7.00");
        assert!(Amount::new(dec!(0.001)).is_err());
    }

    #[test]
    fn test_equality_ignores_input_scale() {
        let a = Amount::from_str_checked("5").unwrap();
        let b = Amount::from_str_checked("5.00").unwrap();
        assert_eq!(a, b);
    }
}
