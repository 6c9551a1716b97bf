//! Request command - build a signed payment form

use anyhow::{Context, Result};
use cardpay_lib::{Amount, Currency, GatewayTimestamp, PaymentRequest, Validation};
use serde_json::json;

use super::ConfigSource;
use crate::ui;

/// Request parameters from the command line.
pub struct RequestArgs {
    pub amount: String,
    pub currency: String,
    pub variable_symbol: u64,
    pub return_url: String,
    pub client_ip: String,
    pub client_name: String,
    pub timestamp: Option<String>,
    pub strict: bool,
}

pub fn run(source: &ConfigSource, args: RequestArgs, as_json: bool) -> Result<()> {
    let config = source.load()?;

    let amount: Amount = args.amount.parse().context("Invalid amount")?;
    let currency: Currency = args.currency.parse().context("Invalid currency")?;

    let mut builder = PaymentRequest::builder(&config)
        .amount(amount)
        .currency(currency)
        .variable_symbol(args.variable_symbol)
        .return_url(args.return_url)
        .client_ip(args.client_ip)
        .client_name(args.client_name);
    if let Some(ts) = args.timestamp {
        let ts: GatewayTimestamp = ts.parse().context("Invalid timestamp")?;
        builder = builder.timestamp(ts);
    }
    if args.strict {
        builder = builder.validation(Validation::Strict);
    }

    let request = builder.build().context("Invalid payment request")?;
    let fields = request.form_fields()?;
    let body = request.to_form_urlencoded()?;
    tracing::debug!(fields = fields.len(), "request signed");

    if as_json {
        ui::json(&json!({
            "variant": request.variant(),
            "action": request.form_action(),
            "fields": fields,
            "body": body,
        }));
        return Ok(());
    }

    ui::header("Payment Request");
    ui::key_value("Variant", request.variant().as_str());
    ui::key_value("Action", request.form_action());
    ui::separator();
    for field in &fields {
        ui::key_value(field.name, &field.value);
    }
    ui::separator();
    println!("{}", body);

    Ok(())
}
