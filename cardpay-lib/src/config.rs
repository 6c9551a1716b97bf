//! Merchant configuration.
//!
//! Resolved once (from JSON, the environment, or code) and then passed
//! explicitly to request and callback handling. Nothing in this crate reads
//! global settings behind the caller's back.

use crate::validation::{self, Validation};
use crate::{CardPayError, ProtocolVariant, Result, SecretKey};
use serde::Deserialize;
use std::path::Path;

/// Environment variable holding the merchant id.
pub const ENV_MID: &str = "CARDPAY_MID";
/// Environment variable holding the hex-encoded secret key.
pub const ENV_SECRET_KEY: &str = "CARDPAY_SECRET_KEY";
/// Environment variable overriding the gateway URL.
pub const ENV_GATEWAY_URL: &str = "CARDPAY_GATEWAY_URL";
/// Environment variable selecting the protocol generation.
pub const ENV_VARIANT: &str = "CARDPAY_VARIANT";
/// Environment variable selecting the validation level.
pub const ENV_VALIDATION: &str = "CARDPAY_VALIDATION";

/// Per-merchant settings shared by every request and callback.
#[derive(Clone, Debug, Deserialize)]
pub struct MerchantConfig {
    /// Merchant identifier assigned by the bank (MID).
    pub merchant_id: u64,

    /// Shared secret (hex-encoded in configuration sources).
    pub secret_key: SecretKey,

    /// Protocol generation the merchant account uses.
    #[serde(default)]
    pub variant: ProtocolVariant,

    /// Gateway form action URL; defaults per variant.
    #[serde(default)]
    pub gateway_url: Option<String>,

    /// Request field validation level.
    #[serde(default)]
    pub validation: Validation,
}

impl MerchantConfig {
    /// Create a new configuration with default URL and permissive validation.
    pub fn new(merchant_id: u64, secret_key: SecretKey, variant: ProtocolVariant) -> Self {
        Self {
            merchant_id,
            secret_key,
            variant,
            gateway_url: None,
            validation: Validation::default(),
        }
    }

    /// Set the gateway URL.
    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = Some(url.into());
        self
    }

    /// Set the validation level.
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Set the protocol generation.
    pub fn with_variant(mut self, variant: ProtocolVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Gateway form action URL.
    pub fn gateway_url(&self) -> &str {
        self.gateway_url
            .as_deref()
            .unwrap_or_else(|| self.variant.default_gateway_url())
    }

    /// Check the configuration is usable for signing.
    pub fn validate(&self) -> Result<()> {
        validation::validate_merchant_id(self.merchant_id)
            .map_err(|e| CardPayError::invalid_config("merchant_id", e.to_string()))?;

        if let Some(url) = &self.gateway_url {
            url::Url::parse(url)
                .map_err(|e| CardPayError::invalid_config("gateway_url", e.to_string()))?;
        }

        if self.secret_key.len() != self.variant.key_len() {
            tracing::warn!(
                variant = %self.variant,
                expected = self.variant.key_len(),
                actual = self.secret_key.len(),
                "secret key length differs from the variant's key size and will be padded or truncated"
            );
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    ///
    /// ```
    /// use cardpay_lib::{MerchantConfig, ProtocolVariant};
    ///
    /// let config = MerchantConfig::from_json_str(r#"{
    ///     "merchant_id": 9999,
    ///     "secret_key": "1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D",
    ///     "variant": "legacy"
    /// }"#).unwrap();
    /// assert_eq!(config.variant, ProtocolVariant::Legacy);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CardPayError::invalid_config("json", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CardPayError::invalid_config(path.display().to_string(), e.to_string()))?;
        Self::from_json_str(&contents)
    }

    /// Load from `CARDPAY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup (used by [`Self::from_env`]).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| CardPayError::MissingConfig(name.to_string()))
        };

        let merchant_id = required(ENV_MID)?
            .trim()
            .parse::<u64>()
            .map_err(|e| CardPayError::invalid_config(ENV_MID, e.to_string()))?;

        let secret_key = SecretKey::from_hex(&required(ENV_SECRET_KEY)?).map_err(|e| {
            CardPayError::invalid_config(ENV_SECRET_KEY, e.to_string())
        })?;

        let variant = match lookup(ENV_VARIANT) {
            Some(v) if !v.trim().is_empty() => v.parse()?,
            _ => ProtocolVariant::default(),
        };

        let validation = match lookup(ENV_VALIDATION).as_deref().map(str::trim) {
            None | Some("") | Some("permissive") => Validation::Permissive,
            Some("strict") => Validation::Strict,
            Some(other) => {
                return Err(CardPayError::invalid_config(
                    ENV_VALIDATION,
                    format!("expected 'permissive' or 'strict', got {:?}", other),
                ))
            }
        };

        let config = Self {
            merchant_id,
            secret_key,
            variant,
            gateway_url: lookup(ENV_GATEWAY_URL).filter(|v| !v.trim().is_empty()),
            validation,
        };
        config.validate()?;
        Ok(config)
    }
}
