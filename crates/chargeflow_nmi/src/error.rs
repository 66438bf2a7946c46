// --- File: crates/chargeflow_nmi/src/error.rs ---
use chargeflow_common::{external_service_error, ChargeflowError, HttpStatusCode};
use thiserror::Error;

/// NMI-specific error types.
#[derive(Error, Debug)]
pub enum NmiError {
    /// Non-positive amount passed to authorize
    #[error("Invalid amount for authorization: {0}")]
    InvalidAmount(i64),

    /// The instrument carries no card number
    #[error("Wrong credit card number")]
    MissingCardNumber,

    /// Network/transport failure talking to the gateway; never retried
    #[error("Gateway transport failure: {code} {message}")]
    Transport { code: String, message: String },

    /// The gateway answered but did not approve the transaction.
    ///
    /// `code` is the raw response code (2=Declined, 3=Error and 4=Held all
    /// funnel here); `message` is the user-facing text after the decline
    /// lookup table has been applied.
    #[error("Error during payment processing: response code: {code} {message}. This credit card processor cannot accept your card; please select a different payment method.")]
    Declined { code: String, message: String },

    /// Refund attempted without a refund transaction id or a positive amount
    #[error("Refund Failed: Invalid transaction ID")]
    RefundPreconditionFailed,

    /// The gateway rejected the refund
    #[error("Refund Failed: Invalid transaction ID")]
    RefundFailed { code: String },

    /// Void attempted without a parent transaction id
    #[error("Void Failed: Invalid transaction ID")]
    VoidPreconditionFailed,

    /// The gateway rejected the void
    #[error("Void Failed: Invalid transaction ID")]
    VoidFailed { code: String },

    /// Failed to form-encode the request body
    #[error("Failed to encode gateway request: {0}")]
    Encoding(String),

    /// Missing or incomplete NMI configuration
    #[error("NMI configuration missing or incomplete")]
    ConfigError,
}

impl From<reqwest::Error> for NmiError {
    fn from(err: reqwest::Error) -> Self {
        let code = err
            .status()
            .map(|s| s.as_u16().to_string())
            .unwrap_or_else(|| {
                if err.is_timeout() {
                    "timeout".to_string()
                } else {
                    "connection".to_string()
                }
            });
        NmiError::Transport {
            code,
            message: err.to_string(),
        }
    }
}

/// Convert NmiError to ChargeflowError
impl From<NmiError> for ChargeflowError {
    fn from(err: NmiError) -> Self {
        match err {
            NmiError::InvalidAmount(amount) => ChargeflowError::ValidationError(format!(
                "Invalid amount for authorization: {}",
                amount
            )),
            NmiError::MissingCardNumber => {
                ChargeflowError::ValidationError("Wrong credit card number".to_string())
            }
            NmiError::Transport { code, message } => external_service_error(
                "NMI gateway",
                format!("transport failure: {} {}", code, message),
            ),
            NmiError::Declined { code, message } => ChargeflowError::PaymentDeclinedError(format!(
                "response code: {} {}",
                code, message
            )),
            NmiError::RefundPreconditionFailed => {
                ChargeflowError::ValidationError("Refund Failed: Invalid transaction ID".to_string())
            }
            NmiError::RefundFailed { code } => external_service_error(
                "NMI gateway",
                format!("refund rejected with response code {}", code),
            ),
            NmiError::VoidPreconditionFailed => {
                ChargeflowError::ValidationError("Void Failed: Invalid transaction ID".to_string())
            }
            NmiError::VoidFailed { code } => external_service_error(
                "NMI gateway",
                format!("void rejected with response code {}", code),
            ),
            NmiError::Encoding(message) => ChargeflowError::InternalError(message),
            NmiError::ConfigError => ChargeflowError::ConfigError(
                "NMI configuration missing or incomplete".to_string(),
            ),
        }
    }
}

/// Implement HttpStatusCode for NmiError to provide a consistent way to
/// convert NmiError to HTTP status codes.
impl HttpStatusCode for NmiError {
    fn status_code(&self) -> u16 {
        match self {
            NmiError::InvalidAmount(_) => 400,
            NmiError::MissingCardNumber => 400,
            NmiError::Transport { .. } => 502,
            NmiError::Declined { .. } => 402,
            NmiError::RefundPreconditionFailed => 400,
            NmiError::RefundFailed { .. } => 502,
            NmiError::VoidPreconditionFailed => 400,
            NmiError::VoidFailed { .. } => 502,
            NmiError::Encoding(_) => 500,
            NmiError::ConfigError => 500,
        }
    }
}
