// --- File: crates/chargeflow_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Platform payment-state models
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{external_service_error, ChargeflowError, HttpStatusCode};

// Re-export HTTP utilities for easier access
pub use http::{create_client, HTTP_CLIENT};

// Re-export the platform models and service traits
pub use models::{
    Address, OrderContext, PaymentInstrument, PaymentStatus, TransactionInfo,
};
pub use services::{
    BoxFuture, BoxedError, GatewayCapabilities, Notifier, NotifyOptions, PaymentMethod,
};
