//! Error types for CardPay operations.
//!
//! A signature mismatch is never an error: verification returns `Ok(false)`.
//! Everything here is either a caller mistake (bad key, bad field, malformed
//! callback) or a deployment fault (missing config, failed self-test).

/// Error codes for FFI and mobile integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CardPayErrorCode {
    /// Key material is not valid hex
    InvalidKeyEncoding = 1000,
    /// Client name contains characters outside the whitelist
    UnsupportedCharacters = 2000,
    /// A request field failed validation
    InvalidField = 2001,
    /// Required configuration value is missing
    MissingConfig = 3000,
    /// Configuration value is present but unusable
    InvalidConfig = 3001,
    /// Callback is missing a required parameter
    MalformedCallback = 4000,
    /// Callback or request belongs to the other protocol generation
    VariantMismatch = 4001,
    /// Known-answer self-test diverged
    SelfTestFailed = 5000,
    /// Cipher or MAC primitive refused its input
    Crypto = 6000,
    /// Serialization error
    Serialization = 7000,
}

/// Comprehensive error type for CardPay operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardPayError {
    /// Secret key is not an even-length hex string.
    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    /// Client name contains characters the gateway rejects.
    #[error("unsupported characters in {field}: {value:?}")]
    UnsupportedCharacters {
        /// Field name (protocol spelling, e.g. "NAME")
        field: &'static str,
        /// Offending value
        value: String,
    },

    /// A payment request field failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Field name (protocol spelling, e.g. "VS")
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Required configuration value is missing.
    #[error("missing configuration value: {0}")]
    MissingConfig(String),

    /// Configuration value could not be used.
    #[error("invalid configuration value {key}: {reason}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Callback lacks a required parameter or carries an unparseable one.
    #[error("malformed callback, {field}: {reason}")]
    MalformedCallback {
        /// Callback parameter name
        field: &'static str,
        /// Failure reason
        reason: String,
    },

    /// Value built for one protocol generation was used with the other.
    #[error("protocol variant mismatch: expected {expected}, got {actual}")]
    VariantMismatch {
        /// Variant the operation was configured for
        expected: &'static str,
        /// Variant the value belongs to
        actual: &'static str,
    },

    /// Known-answer vector produced an unexpected signature.
    #[error("self-test failed for vector {vector}")]
    SelfTestFailed {
        /// Name of the failing vector
        vector: &'static str,
    },

    /// Cryptographic primitive failure.
    #[error("cryptographic error: {0}")]
    Crypto(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CardPayError {
    /// Get the error code for FFI/mobile integration.
    pub fn code(&self) -> CardPayErrorCode {
        match self {
            Self::InvalidKeyEncoding(_) => CardPayErrorCode::InvalidKeyEncoding,
            Self::UnsupportedCharacters { .. } => CardPayErrorCode::UnsupportedCharacters,
            Self::InvalidField { .. } => CardPayErrorCode::InvalidField,
            Self::MissingConfig(_) => CardPayErrorCode::MissingConfig,
            Self::InvalidConfig { .. } => CardPayErrorCode::InvalidConfig,
            Self::MalformedCallback { .. } => CardPayErrorCode::MalformedCallback,
            Self::VariantMismatch { .. } => CardPayErrorCode::VariantMismatch,
            Self::SelfTestFailed { .. } => CardPayErrorCode::SelfTestFailed,
            Self::Crypto(_) => CardPayErrorCode::Crypto,
            Self::Serialization(_) => CardPayErrorCode::Serialization,
        }
    }

    /// Get the error message as an owned String (useful for FFI).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns true for deployment faults that no retry can fix.
    ///
    /// Configuration errors and self-test failures mean the process must not
    /// sign real transactions until someone fixes the deployment.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidKeyEncoding(_)
                | Self::MissingConfig(_)
                | Self::InvalidConfig { .. }
                | Self::SelfTestFailed { .. }
                | Self::Crypto(_)
        )
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed callback error.
    pub fn malformed_callback(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedCallback {
            field,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CardPayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
