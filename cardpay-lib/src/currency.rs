//! Currencies accepted by the gateway.

use crate::{CardPayError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ISO 4217 currency, signed as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u16)]
pub enum Currency {
    /// Euro
    #[default]
    Eur = 978,
    /// Czech koruna
    Czk = 203,
    /// US dollar
    Usd = 840,
    /// British pound
    Gbp = 826,
    /// Hungarian forint
    Huf = 348,
    /// Polish zloty
    Pln = 985,
    /// Swiss franc
    Chf = 756,
    /// Danish krone
    Dkk = 208,
}

impl Currency {
    /// Every supported currency.
    pub const ALL: [Currency; 8] = [
        Self::Eur,
        Self::Czk,
        Self::Usd,
        Self::Gbp,
        Self::Huf,
        Self::Pln,
        Self::Chf,
        Self::Dkk,
    ];

    /// ISO 4217 numeric code.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// ISO 4217 alphabetic code.
    pub fn alpha(self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Czk => "CZK",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
            Self::Huf => "HUF",
            Self::Pln => "PLN",
            Self::Chf => "CHF",
            Self::Dkk => "DKK",
        }
    }

    /// Value of the CURR field.
    pub fn canonical(self) -> String {
        self.code().to_string()
    }

    /// Look up a currency by numeric code.
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl TryFrom<u16> for Currency {
    type Error = CardPayError;

    fn try_from(code: u16) -> Result<Self> {
        Self::from_code(code).ok_or_else(|| {
            CardPayError::invalid_field("CURR", format!("unsupported currency code {}", code))
        })
    }
}

impl FromStr for Currency {
    type Err = CardPayError;

    /// Accepts either the alphabetic (`"EUR"`) or numeric (`"978"`) code.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u16>() {
            return Self::try_from(code);
        }
        Self::ALL
            .into_iter()
            .find(|c| c.alpha().eq_ignore_ascii_case(s))
            .ok_or_else(|| CardPayError::invalid_field("CURR", format!("unsupported currency {:?}", s)))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alpha())
    }
}
