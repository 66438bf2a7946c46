// --- File: crates/chargeflow_nmi/src/lib.rs ---

// Declare modules within this crate
pub mod client;
pub mod error;
pub mod logic;
pub mod redact;
pub mod service;

// Re-export for callers
pub use client::{GatewayClient, GatewayRequest, GatewayResponse, ResponseOutcome, GATEWAY_URL};
pub use error::NmiError;
pub use service::NmiPaymentMethod;
