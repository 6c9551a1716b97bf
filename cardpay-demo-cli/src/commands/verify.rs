//! Verify command - check the signature on a bank callback

use anyhow::{bail, Context, Result};
use cardpay_lib::BankCallback;
use serde_json::json;

use super::ConfigSource;
use crate::ui;

pub fn run(source: &ConfigSource, query: &str, as_json: bool) -> Result<()> {
    let config = source.load()?;

    let callback =
        BankCallback::from_query(config.variant, query).context("Could not parse callback")?;
    let valid = callback.verify_with(&config)?;

    if as_json {
        ui::json(&json!({
            "variant": callback.variant(),
            "valid": valid,
            "vs": callback.variable_symbol(),
            "result": callback.result().as_str(),
            "ac": callback.auth_code(),
        }));
    } else {
        ui::header("Bank Callback");
        ui::key_value("Variant", callback.variant().as_str());
        ui::key_value("VS", &callback.variable_symbol().to_string());
        ui::key_value("RES", callback.result().as_str());
        ui::key_value("AC", callback.auth_code().unwrap_or("-"));
        ui::separator();
        if valid {
            ui::success("Signature valid");
            if !callback.result().is_success() {
                ui::info("Bank reported the payment as not completed");
            }
        }
    }

    if !valid {
        bail!("Signature mismatch: callback is forged or corrupted");
    }
    Ok(())
}
