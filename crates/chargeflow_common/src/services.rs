// --- File: crates/chargeflow_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! This module provides trait definitions for the external services used by
//! the application. These traits allow for dependency injection and easier
//! testing by decoupling application logic from specific implementations:
//! a payment-method adapter and an outbound notification channel.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::models::{OrderContext, PaymentInstrument, TransactionInfo};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// The capabilities a payment-method adapter advertises to the platform.
///
/// The platform consults these flags before offering an operation; an adapter
/// never relies on them for correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayCapabilities {
    pub is_gateway: bool,
    pub can_authorize: bool,
    pub can_capture: bool,
    pub can_refund: bool,
    pub can_void: bool,
    pub can_fetch_transaction_info: bool,
}

/// A trait for card payment-method operations.
///
/// This trait defines the contract a gateway adapter implements so the
/// platform can authorize, refund, void and cancel payments without knowing
/// which processor sits behind it. Each operation performs at most one
/// network round-trip and resolves the instrument to exactly one terminal
/// status per call.
pub trait PaymentMethod: Send + Sync {
    /// Error type returned by payment operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The operations this adapter supports.
    fn capabilities(&self) -> GatewayCapabilities;

    /// Authorize `amount` (minor units) against the instrument.
    fn authorize<'a>(
        &'a self,
        order: &'a OrderContext,
        payment: &'a mut PaymentInstrument,
        amount: i64,
    ) -> BoxFuture<'a, (), Self::Error>;

    /// Refund `amount` (minor units) against the instrument's parent transaction.
    fn refund<'a>(
        &'a self,
        payment: &'a mut PaymentInstrument,
        amount: i64,
    ) -> BoxFuture<'a, (), Self::Error>;

    /// Void the instrument's parent transaction.
    fn void<'a>(&'a self, payment: &'a mut PaymentInstrument) -> BoxFuture<'a, (), Self::Error>;

    /// Cancel the payment. For card gateways this is an alias for `void`.
    fn cancel<'a>(&'a self, payment: &'a mut PaymentInstrument) -> BoxFuture<'a, (), Self::Error>;

    /// Snapshot of the gateway results currently attached to the instrument.
    fn fetch_transaction_info(&self, payment: &PaymentInstrument) -> TransactionInfo;
}

/// Presentation options for an outbound notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyOptions {
    pub icon_emoji: Option<String>,
    pub channel: Option<String>,
}

/// A trait for fire-and-forget notification channels.
///
/// Implementations deliver an already-formatted (and already-redacted)
/// message to an external sink. Callers on the payment path must treat
/// failures as best-effort: log and continue, never escalate.
pub trait Notifier: Send + Sync {
    /// Send a message to the channel.
    fn send<'a>(
        &'a self,
        message: &'a str,
        options: &'a NotifyOptions,
    ) -> BoxFuture<'a, (), BoxedError>;
}
