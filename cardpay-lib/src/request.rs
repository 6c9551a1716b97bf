//! Outgoing payment request.
//!
//! A [`PaymentRequest`] is built in one step by [`PaymentRequestBuilder::build`]
//! and is read-only afterwards. The signature is recomputed every time it is
//! read and is never stored.

use crate::timestamp::GatewayTimestamp;
use crate::validation::{self, Validation};
use crate::{self_test, Amount, CardPayError, Currency, MerchantConfig, ProtocolVariant, Result};
use serde::Serialize;

/// Fixed PT value of the legacy form.
pub const PAYMENT_TYPE: &str = "CardPay";

/// Fixed LANG value of the HMAC form.
pub const LANGUAGE: &str = "sk";

/// Fixed AREDIR value of the HMAC form (redirect back automatically).
pub const AUTO_REDIRECT: &str = "1";

/// One named hidden form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Protocol field name, e.g. `MID`.
    pub name: &'static str,
    /// Field value as it goes on the wire.
    pub value: String,
}

impl FormField {
    fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// A payment request bound to one merchant configuration.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    config: MerchantConfig,
    merchant_id: u64,
    amount: Amount,
    currency: Currency,
    variable_symbol: u64,
    return_url: String,
    client_ip: String,
    client_name: String,
    timestamp: Option<GatewayTimestamp>,
}

impl PaymentRequest {
    /// Start building a request for the given merchant.
    pub fn builder(config: &MerchantConfig) -> PaymentRequestBuilder {
        PaymentRequestBuilder::new(config)
    }

    /// Protocol generation of this request.
    pub fn variant(&self) -> ProtocolVariant {
        self.config.variant
    }

    /// MID.
    pub fn merchant_id(&self) -> u64 {
        self.merchant_id
    }

    /// AMT.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// CURR.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// VS.
    pub fn variable_symbol(&self) -> u64 {
        self.variable_symbol
    }

    /// RURL.
    pub fn return_url(&self) -> &str {
        &self.return_url
    }

    /// IPC.
    pub fn client_ip(&self) -> &str {
        &self.client_ip
    }

    /// NAME.
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// TIMESTAMP, present only for the HMAC generation.
    pub fn timestamp(&self) -> Option<GatewayTimestamp> {
        self.timestamp
    }

    /// Gateway URL the form posts to.
    pub fn form_action(&self) -> &str {
        self.config.gateway_url()
    }

    /// Field values in signing order.
    ///
    /// Legacy: MID, AMT, CURR, VS, RURL, IPC, NAME.
    /// HMAC: the same followed by TIMESTAMP.
    pub fn signing_fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.merchant_id.to_string(),
            self.amount.canonical(),
            self.currency.canonical(),
            self.variable_symbol.to_string(),
            self.return_url.clone(),
            self.client_ip.clone(),
            self.client_name.clone(),
        ];
        if let Some(ts) = self.timestamp {
            fields.push(ts.canonical());
        }
        fields
    }

    /// Signature over [`Self::signing_fields`].
    ///
    /// # Errors
    ///
    /// Fails with [`CardPayError::SelfTestFailed`] if the known-answer check
    /// did not pass in this process.
    #[tracing::instrument(skip(self), fields(variant = %self.variant(), vs = self.variable_symbol))]
    pub fn signature(&self) -> Result<String> {
        self_test::ensure()?;
        self.signature_unchecked()
    }

    /// Signature without consulting the self-test gate.
    pub(crate) fn signature_unchecked(&self) -> Result<String> {
        let fields = self.signing_fields();
        let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        self.config.variant.compute(&refs, &self.config.secret_key)
    }

    /// Named hidden fields for the gateway form, in form order.
    pub fn form_fields(&self) -> Result<Vec<FormField>> {
        let signature = self.signature()?;
        let mut fields = Vec::with_capacity(11);

        if self.variant() == ProtocolVariant::Legacy {
            fields.push(FormField::new("PT", PAYMENT_TYPE));
        }
        fields.push(FormField::new("MID", self.merchant_id.to_string()));
        fields.push(FormField::new("AMT", self.amount.canonical()));
        fields.push(FormField::new("CURR", self.currency.canonical()));
        fields.push(FormField::new("VS", self.variable_symbol.to_string()));
        fields.push(FormField::new("RURL", self.return_url.clone()));
        fields.push(FormField::new("IPC", self.client_ip.clone()));
        fields.push(FormField::new("NAME", self.client_name.clone()));

        match (self.variant(), self.timestamp) {
            (ProtocolVariant::Legacy, _) => {
                fields.push(FormField::new("SIGN", signature));
            }
            (ProtocolVariant::Hmac256, Some(ts)) => {
                fields.push(FormField::new("LANG", LANGUAGE));
                fields.push(FormField::new("AREDIR", AUTO_REDIRECT));
                fields.push(FormField::new("TIMESTAMP", ts.canonical()));
                fields.push(FormField::new("HMAC", signature));
            }
            (ProtocolVariant::Hmac256, None) => {
                return Err(CardPayError::invalid_field(
                    "TIMESTAMP",
                    "HMAC request without timestamp",
                ))
            }
        }
        Ok(fields)
    }

    /// `application/x-www-form-urlencoded` body of [`Self::form_fields`].
    pub fn to_form_urlencoded(&self) -> Result<String> {
        let fields = self.form_fields()?;
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for field in &fields {
            serializer.append_pair(field.name, &field.value);
        }
        Ok(serializer.finish())
    }
}

/// Builder for [`PaymentRequest`].
///
/// Every field except MID (taken from the configuration) and TIMESTAMP
/// (current UTC time) must be set before [`Self::build`].
#[derive(Debug, Clone)]
pub struct PaymentRequestBuilder {
    config: MerchantConfig,
    merchant_id: Option<u64>,
    amount: Option<Amount>,
    currency: Currency,
    variable_symbol: Option<u64>,
    return_url: Option<String>,
    client_ip: Option<String>,
    client_name: Option<String>,
    timestamp: Option<GatewayTimestamp>,
    validation: Validation,
}

impl PaymentRequestBuilder {
    fn new(config: &MerchantConfig) -> Self {
        Self {
            config: config.clone(),
            merchant_id: None,
            amount: None,
            currency: Currency::default(),
            variable_symbol: None,
            return_url: None,
            client_ip: None,
            client_name: None,
            timestamp: None,
            validation: config.validation,
        }
    }

    /// Override the configured merchant id.
    pub fn merchant_id(mut self, mid: u64) -> Self {
        self.merchant_id = Some(mid);
        self
    }

    /// Set the amount.
    pub fn amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the currency (defaults to EUR).
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Set the variable symbol.
    pub fn variable_symbol(mut self, vs: u64) -> Self {
        self.variable_symbol = Some(vs);
        self
    }

    /// Set the return URL.
    pub fn return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = Some(url.into());
        self
    }

    /// Set the client IP address.
    pub fn client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    /// Set the client name.
    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    /// Set the timestamp (HMAC generation only; ignored for legacy).
    pub fn timestamp(mut self, ts: GatewayTimestamp) -> Self {
        self.timestamp = Some(ts);
        self
    }

    /// Override the configured validation level.
    pub fn validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Validate and freeze the request.
    pub fn build(self) -> Result<PaymentRequest> {
        let merchant_id = self.merchant_id.unwrap_or(self.config.merchant_id);
        validation::validate_merchant_id(merchant_id)?;

        let amount = self.amount.ok_or_else(|| missing("AMT"))?;
        let variable_symbol = self.variable_symbol.ok_or_else(|| missing("VS"))?;
        validation::validate_variable_symbol(variable_symbol)?;

        let return_url = self.return_url.ok_or_else(|| missing("RURL"))?;
        let client_ip = self.client_ip.ok_or_else(|| missing("IPC"))?;
        let client_name = self.client_name.ok_or_else(|| missing("NAME"))?;
        self.validation
            .check_request_fields(&return_url, &client_ip, &client_name)?;

        let timestamp = match self.config.variant {
            ProtocolVariant::Legacy => None,
            ProtocolVariant::Hmac256 => Some(self.timestamp.unwrap_or_else(GatewayTimestamp::now)),
        };

        Ok(PaymentRequest {
            config: self.config,
            merchant_id,
            amount,
            currency: self.currency,
            variable_symbol,
            return_url,
            client_ip,
            client_name,
            timestamp,
        })
    }
}

fn missing(field: &'static str) -> CardPayError {
    CardPayError::invalid_field(field, "required field not set")
}
