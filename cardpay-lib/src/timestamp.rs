//! Gateway timestamp in `ddMMyyyyHHmmss` form, always UTC.

use crate::{CardPayError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;
use std::str::FromStr;

const FORMAT: &str = "%d%m%Y%H%M%S";

/// Second-precision UTC timestamp as used by the HMAC generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GatewayTimestamp(DateTime<Utc>);

impl GatewayTimestamp {
    /// Current UTC time, truncated to whole seconds.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Wrap a datetime, dropping sub-second precision.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let secs = dt.timestamp();
        Self(DateTime::from_timestamp(secs, 0).unwrap_or(dt))
    }

    /// Parse the 14-digit wire form.
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != 14 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CardPayError::invalid_field(
                "TIMESTAMP",
                format!("expected 14 digits ddMMyyyyHHmmss, got {:?}", s),
            ));
        }
        NaiveDateTime::parse_from_str(s, FORMAT)
            .map(|naive| Self(naive.and_utc()))
            .map_err(|e| CardPayError::invalid_field("TIMESTAMP", e.to_string()))
    }

    /// Inner datetime.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Wire form, e.g. `01092014125505`.
    pub fn canonical(&self) -> String {
        self.0.format(FORMAT).to_string()
    }
}

impl fmt::Display for GatewayTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl FromStr for GatewayTimestamp {
    type Err = CardPayError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
