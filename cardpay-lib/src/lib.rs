//! CardPay library.
//!
//! Builds signed payment requests for the Tatra banka CardPay gateway and
//! verifies the signed result notifications it sends back. The crate is
//! stateless apart from a once-per-process known-answer self-test; it does
//! no I/O and renders no HTML.
//!
//! # Protocol generations
//!
//! - **Legacy**: SHA-1 of the canonical string, first 16 bytes encrypted
//!   with AES-256-ECB, uppercase hex.
//! - **HMAC**: HMAC-SHA256 of the canonical string, lowercase hex.
//!
//! The canonical string is the undelimited concatenation of field values in
//! a fixed, generation-specific order.
//!
//! # Example
//!
//! ```
//! use cardpay_lib::{self_test, Amount, BankCallback, Currency, MerchantConfig, PaymentRequest,
//!     ProtocolVariant, SecretKey};
//!
//! self_test::ensure()?;
//!
//! let key = SecretKey::from_hex(
//!     "1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D1A2B3C4D",
//! )?;
//! let config = MerchantConfig::new(9999, key, ProtocolVariant::Legacy);
//!
//! let request = PaymentRequest::builder(&config)
//!     .amount("1234.50".parse::<Amount>()?)
//!     .currency(Currency::Eur)
//!     .variable_symbol(1111)
//!     .return_url("https://moja.tatrabanka.sk/cgi-bin/e-commerce/start/example.jsp")
//!     .client_ip("1.2.3.4")
//!     .client_name("JanPokusny")
//!     .build()?;
//! assert_eq!(request.signature()?, "4E7DF35F91A19F6F6A4A0AF5534AC919");
//!
//! let callback = BankCallback::from_query(
//!     ProtocolVariant::Legacy,
//!     "VS=1111&RES=OK&AC=123456&SIGN=781C110AD840077E470E1D5C9F944D7D",
//! )?;
//! assert!(callback.verify_with(&config)?);
//! # Ok::<(), cardpay_lib::CardPayError>(())
//! ```

pub mod amount;
pub mod callback;
pub mod codec;
pub mod config;
pub mod currency;
pub mod errors;
pub mod key;
pub mod protocol;
pub mod request;
pub mod signing;
pub mod timestamp;
pub mod validation;

pub use amount::Amount;
pub use callback::{BankCallback, HmacCallback, LegacyCallback, Received, ResultCode};
pub use config::MerchantConfig;
pub use currency::Currency;
pub use errors::{CardPayError, CardPayErrorCode};
pub use key::SecretKey;
pub use protocol::ProtocolVariant;
pub use request::{FormField, PaymentRequest, PaymentRequestBuilder};
pub use timestamp::GatewayTimestamp;
pub use validation::Validation;

/// Common result alias for CardPay operations.
pub type Result<T> = std::result::Result<T, CardPayError>;
