// --- File: crates/chargeflow_common/src/models.rs ---
//! Platform payment-state models.
//!
//! These structs mirror the hosting platform's order/address/payment data
//! objects. The order-side types are read-only inputs; the payment instrument
//! is mutated by a gateway adapter to attach transaction results.

use serde::{Deserialize, Serialize};

/// A billing or shipping address as provided by the platform.
///
/// All fields are free text; missing data arrives as empty strings rather
/// than `None`, matching the platform's leniency policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    /// First street line.
    pub street1: String,
    /// Second street line; may duplicate `street1` in sloppy checkout data.
    pub street2: String,
    pub city: String,
    /// Region/state code, expected to match `[A-Za-z]{2,7}`.
    pub region_code: String,
    pub postcode: String,
    pub country: String,
    pub telephone: String,
    pub fax: String,
}

/// Read-only order data sourced from the platform.
///
/// Monetary amounts are minor units (cents).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderContext {
    /// The platform's human-facing order number.
    pub increment_id: String,
    pub remote_ip: String,
    pub customer_email: String,
    pub base_tax_amount: i64,
    pub base_shipping_amount: i64,
    pub billing: Address,
    pub shipping: Address,
    /// Store display name, used in the order description sent to the gateway.
    pub store_name: String,
}

/// Terminal status of a payment operation on the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Authorization accepted by the gateway.
    Approved,
    /// Refund or void accepted by the gateway.
    Success,
    /// Refund or void rejected or not attempted.
    Error,
}

/// The payment instrument being charged, plus the gateway results attached
/// to it by an adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentInstrument {
    pub cc_number: String,
    pub cc_exp_month: u32,
    /// Full four-digit year.
    pub cc_exp_year: u32,
    /// Card verification value.
    pub cc_cid: String,
    pub po_number: String,
    /// Authorized amount in minor units; set by the adapter on authorize.
    pub amount: i64,

    // Gateway results
    pub transaction_id: Option<String>,
    /// Transaction id of the original authorization, required for refund/void.
    pub parent_transaction_id: Option<String>,
    /// Transaction id recorded by the platform when a credit memo is opened.
    pub refund_transaction_id: Option<String>,
    /// Gateway approval code (`authcode`).
    pub approval_code: Option<String>,
    /// Address Verification Service result flag.
    pub avs_status: Option<String>,
    /// Card-verification result flag.
    pub cvv_status: Option<String>,
    pub is_transaction_closed: bool,
    pub status: Option<PaymentStatus>,
}

/// A snapshot of the gateway results stored on an instrument.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub transaction_id: Option<String>,
    pub approval_code: Option<String>,
    pub avs_status: Option<String>,
    pub cvv_status: Option<String>,
    pub is_closed: bool,
    pub status: Option<PaymentStatus>,
}

impl TransactionInfo {
    /// Build a snapshot from the instrument's stored gateway results.
    pub fn from_instrument(payment: &PaymentInstrument) -> Self {
        TransactionInfo {
            transaction_id: payment.transaction_id.clone(),
            approval_code: payment.approval_code.clone(),
            avs_status: payment.avs_status.clone(),
            cvv_status: payment.cvv_status.clone(),
            is_closed: payment.is_transaction_closed,
            status: payment.status,
        }
    }
}
