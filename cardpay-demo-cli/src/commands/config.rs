//! Config command - show the resolved merchant configuration

use anyhow::Result;
use serde_json::json;

use super::ConfigSource;
use crate::ui;

pub fn run(source: &ConfigSource, as_json: bool) -> Result<()> {
    let config = source.load()?;
    let key = format!("[REDACTED; {} bytes]", config.secret_key.len());
    let origin = match &source.path {
        Some(path) => path.display().to_string(),
        None => "environment".to_string(),
    };

    if as_json {
        ui::json(&json!({
            "source": origin,
            "merchant_id": config.merchant_id,
            "variant": config.variant,
            "gateway_url": config.gateway_url(),
            "validation": config.validation,
            "secret_key": key,
        }));
        return Ok(());
    }

    ui::header("Merchant Configuration");
    ui::key_value("Source", &origin);
    ui::key_value("MID", &config.merchant_id.to_string());
    ui::key_value("Variant", config.variant.as_str());
    ui::key_value("Gateway", config.gateway_url());
    ui::key_value("Validation", &format!("{:?}", config.validation).to_lowercase());
    ui::key_value("Secret key", &key);

    if config.secret_key.len() != config.variant.key_len() {
        ui::warning(&format!(
            "Key is {} bytes; {} expects {} and will pad or truncate",
            config.secret_key.len(),
            config.variant,
            config.variant.key_len()
        ));
    }
    Ok(())
}
