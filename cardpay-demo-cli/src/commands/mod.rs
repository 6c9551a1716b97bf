//! CLI command implementations

pub mod config;
pub mod request;
pub mod verify;

use anyhow::{Context, Result};
use cardpay_lib::{MerchantConfig, ProtocolVariant};
use std::path::PathBuf;

/// Where the merchant configuration comes from.
pub struct ConfigSource {
    /// JSON file; `None` means the `CARDPAY_*` environment variables.
    pub path: Option<PathBuf>,
    /// Generation override from the command line.
    pub variant: Option<ProtocolVariant>,
}

impl ConfigSource {
    /// Load, apply overrides and validate.
    pub fn load(&self) -> Result<MerchantConfig> {
        let config = match &self.path {
            Some(path) => MerchantConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => MerchantConfig::from_env().context(
                "No configuration: pass --config <file.json> or set CARDPAY_MID and CARDPAY_SECRET_KEY",
            )?,
        };

        let config = match self.variant {
            Some(variant) if variant != config.variant => {
                tracing::debug!(from = %config.variant, to = %variant, "overriding variant");
                let config = config.with_variant(variant);
                config.validate()?;
                config
            }
            _ => config,
        };
        Ok(config)
    }
}
