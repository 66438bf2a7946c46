// --- File: crates/chargeflow_common/src/error.rs ---
use thiserror::Error;

/// The base error type for all Chargeflow errors.
///
/// This enum provides a common set of error variants that can be used across all crates.
/// Each crate can extend this by implementing From<SpecificError> for ChargeflowError.
#[derive(Error, Debug)]
pub enum ChargeflowError {
    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred because a payment was not accepted by the processor
    #[error("Payment declined: {0}")]
    PaymentDeclinedError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
///
/// This trait can be implemented by error types to provide a consistent way
/// to convert errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for ChargeflowError {
    fn status_code(&self) -> u16 {
        match self {
            ChargeflowError::ConfigError(_) => 500,
            ChargeflowError::ValidationError(_) => 400,
            ChargeflowError::ExternalServiceError { .. } => 502,
            ChargeflowError::PaymentDeclinedError(_) => 402,
            ChargeflowError::InternalError(_) => 500,
        }
    }
}

/// Creates an external service error for the given service and message.
pub fn external_service_error<S1: Into<String>, S2: Into<String>>(
    service_name: S1,
    message: S2,
) -> ChargeflowError {
    ChargeflowError::ExternalServiceError {
        service_name: service_name.into(),
        message: message.into(),
    }
}
