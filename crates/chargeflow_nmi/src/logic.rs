// --- File: crates/chargeflow_nmi/src/logic.rs ---
//! Request building, response mapping and operation orchestration for the
//! NMI transact API.

use tracing::{debug, warn};

use chargeflow_common::models::{OrderContext, PaymentInstrument, PaymentStatus};
use chargeflow_common::services::{Notifier, NotifyOptions};
use chargeflow_config::NmiConfig;

use crate::client::{GatewayClient, GatewayRequest, GatewayResponse};
use crate::error::NmiError;
use crate::redact;

/// Substituted for billing/shipping region codes that fail validation.
const FALLBACK_REGION: &str = "MN";

// Literal credentials sent when test mode is on.
const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "password";

/// Render a minor-unit amount as a fixed two-decimal string.
pub(crate) fn format_amount(minor_units: i64) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Card expiry as four digits: two-digit month, last two digits of the year.
pub(crate) fn format_expiry(month: u32, year: u32) -> String {
    format!("{:02}{:02}", month, year % 100)
}

fn is_valid_region(code: &str) -> bool {
    (2..=7).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// A region code that fails the `[A-Za-z]{2,7}` check (or is empty) is
/// replaced with the fallback code rather than rejected.
pub(crate) fn region_or_fallback(code: &str) -> &str {
    if is_valid_region(code) {
        code
    } else {
        FALLBACK_REGION
    }
}

/// Second street line, omitted when it duplicates the first after trimming.
fn dedup_street2(street1: &str, street2: &str) -> String {
    if street1.trim() == street2.trim() {
        String::new()
    } else {
        street2.trim().to_string()
    }
}

/// Rewrite known gateway decline messages into user-facing text; anything
/// else passes through verbatim.
pub fn map_response_text(responsetext: &str) -> String {
    match responsetext {
        "Insufficient funds" => "Your bank declined this attempted transaction, because you try to make an order using a debit card without having enough money in your account or you might reach credit card limit.".to_string(),
        "AVS REJECTED" => "Your bank declined this attempted transaction. Please check billing zip code/address you entered, it should match with the address/zip code you supplied to your bank.".to_string(),
        "Issuer Declined" => "Your bank declined this attempted transaction. Please check that all information was entered correctly. If so, then please call the phone number on the back of your card for more information or select a different payment method.".to_string(),
        other => other.to_string(),
    }
}

fn credentials(config: &NmiConfig) -> (&str, &str) {
    if config.test_mode {
        (DEMO_USERNAME, DEMO_PASSWORD)
    } else {
        (&config.username, &config.password)
    }
}

/// Assemble the flat sale payload from order, billing, shipping and
/// instrument data. Missing fields pass through as empty strings.
pub fn build_sale_request(
    config: &NmiConfig,
    order: &OrderContext,
    payment: &PaymentInstrument,
    amount: i64,
) -> GatewayRequest {
    let billing = &order.billing;
    let shipping = &order.shipping;
    let (username, password) = credentials(config);

    let mut query = GatewayRequest::new();

    // Login information
    query.insert("username", username);
    query.insert("password", password);

    // Sales information
    query.insert("ccnumber", payment.cc_number.as_str());
    query.insert(
        "ccexp",
        format_expiry(payment.cc_exp_month, payment.cc_exp_year),
    );
    query.insert("amount", format_amount(amount));
    query.insert("cvv", payment.cc_cid.as_str());

    // Order information
    query.insert("ipaddress", order.remote_ip.trim());
    query.insert("orderid", order.increment_id.as_str());
    query.insert(
        "orderdescription",
        format!(
            "Order {} at {}. Thank you.",
            order.increment_id, order.store_name
        ),
    );
    query.insert("tax", format_amount(order.base_tax_amount));
    query.insert("shipping", format_amount(order.base_shipping_amount));
    query.insert("ponumber", payment.po_number.trim());

    // Billing information
    query.insert("firstname", billing.first_name.trim());
    query.insert("lastname", billing.last_name.trim());
    query.insert("company", billing.company.trim());
    query.insert("address1", billing.street1.trim());
    query.insert("address2", dedup_street2(&billing.street1, &billing.street2));
    query.insert("city", billing.city.trim());
    query.insert("state", region_or_fallback(&billing.region_code));
    query.insert("zip", billing.postcode.trim());
    query.insert("country", billing.country.trim());
    query.insert("phone", billing.telephone.trim());
    query.insert("fax", billing.fax.trim());
    query.insert("email", order.customer_email.trim());
    query.insert("website", "");

    // Shipping information
    query.insert("shipping_firstname", shipping.first_name.trim());
    query.insert("shipping_lastname", shipping.last_name.trim());
    query.insert("shipping_company", shipping.company.trim());
    query.insert("shipping_address1", shipping.street1.trim());
    query.insert(
        "shipping_address2",
        dedup_street2(&shipping.street1, &shipping.street2),
    );
    query.insert("shipping_city", shipping.city.trim());
    query.insert("shipping_state", region_or_fallback(&shipping.region_code));
    query.insert("shipping_zip", shipping.postcode.trim());
    query.insert("shipping_country", shipping.country.trim());
    query.insert("shipping_email", order.customer_email.trim());
    query.insert("type", "sale");

    query
}

fn build_transaction_request(
    config: &NmiConfig,
    transaction_id: &str,
    amount: i64,
    op: &str,
) -> GatewayRequest {
    let (username, password) = credentials(config);

    let mut query = GatewayRequest::new();

    // Login information
    query.insert("username", username);
    query.insert("password", password);

    // Transaction information
    query.insert("transactionid", transaction_id);
    query.insert("amount", format_amount(amount));
    query.insert("type", op);

    query
}

pub fn build_refund_request(
    config: &NmiConfig,
    transaction_id: &str,
    amount: i64,
) -> GatewayRequest {
    build_transaction_request(config, transaction_id, amount, "refund")
}

pub fn build_void_request(config: &NmiConfig, transaction_id: &str, amount: i64) -> GatewayRequest {
    build_transaction_request(config, transaction_id, amount, "void")
}

/// Best-effort failure alert with redacted payload. A slow or failing alert
/// channel must never block or fail the payment operation.
async fn notify_failure(
    notifier: Option<&dyn Notifier>,
    response_json: &str,
    query: &GatewayRequest,
) {
    let Some(notifier) = notifier else {
        return;
    };

    let message = format!(
        "*NMI payment failed with data:*\nGateway response ```{}```\n\nData sent ```{}```",
        response_json,
        redact::redact_json(&query.to_json())
    );
    let options = NotifyOptions {
        icon_emoji: Some(":cop:".to_string()),
        channel: None,
    };

    if let Err(err) = notifier.send(&message, &options).await {
        warn!(error = %err, "failed to deliver payment failure alert");
    }
}

/// POST the payload; on transport failure, alert before surfacing the error.
async fn post_with_alert(
    client: &GatewayClient,
    notifier: Option<&dyn Notifier>,
    query: &GatewayRequest,
) -> Result<GatewayResponse, NmiError> {
    match client.post(query).await {
        Ok(response) => Ok(response),
        Err(err) => {
            if let NmiError::Transport { code, message } = &err {
                let summary =
                    serde_json::json!({ "code": code, "message": message }).to_string();
                notify_failure(notifier, &summary, query).await;
            }
            Err(err)
        }
    }
}

/// Authorize `amount` (minor units) against the instrument.
///
/// On approval the gateway results are attached to the instrument, the
/// transaction is marked closed and any parent linkage cleared. Validation
/// failures short-circuit before any network call.
pub async fn authorize(
    client: &GatewayClient,
    config: &NmiConfig,
    notifier: Option<&dyn Notifier>,
    order: &OrderContext,
    payment: &mut PaymentInstrument,
    amount: i64,
) -> Result<(), NmiError> {
    if amount <= 0 {
        return Err(NmiError::InvalidAmount(amount));
    }
    if payment.cc_number.trim().is_empty() {
        return Err(NmiError::MissingCardNumber);
    }

    payment.amount = amount;

    let query = build_sale_request(config, order, payment, amount);
    let response = post_with_alert(client, notifier, &query).await?;

    debug!(
        query = ?redact::redact_params(query.params()),
        response = ?response,
        "authorize response"
    );

    if response.is_approved() {
        let transaction_id = response.get("transactionid").unwrap_or_default().to_string();
        payment.transaction_id = Some(transaction_id);
        payment.approval_code = response.get("authcode").map(str::to_string);
        payment.avs_status = response.get("avsresponse").map(str::to_string);
        payment.cvv_status = response.get("cvvresponse").map(str::to_string);
        payment.is_transaction_closed = true;
        payment.parent_transaction_id = None;
        payment.status = Some(PaymentStatus::Approved);
        return Ok(());
    }

    let message = match response.get("responsetext").map(str::trim) {
        Some(text) if !text.is_empty() => map_response_text(text),
        _ => "Unknown error".to_string(),
    };

    notify_failure(notifier, &response.to_json(), &query).await;

    payment.status = Some(PaymentStatus::Error);
    Err(NmiError::Declined {
        code: response.raw_code(),
        message,
    })
}

/// Refund `amount` (minor units) against the instrument's parent
/// transaction. Requires a refund transaction id on the instrument and a
/// strictly positive amount; no network call is made otherwise.
pub async fn refund(
    client: &GatewayClient,
    config: &NmiConfig,
    notifier: Option<&dyn Notifier>,
    payment: &mut PaymentInstrument,
    amount: i64,
) -> Result<(), NmiError> {
    if payment.refund_transaction_id.is_none() || amount <= 0 {
        payment.status = Some(PaymentStatus::Error);
        return Err(NmiError::RefundPreconditionFailed);
    }

    let parent = payment.parent_transaction_id.clone().unwrap_or_default();
    let query = build_refund_request(config, &parent, amount);
    let response = post_with_alert(client, notifier, &query).await?;

    debug!(
        query = ?redact::redact_params(query.params()),
        response = ?response,
        "refund response"
    );

    if response.is_approved() {
        payment.status = Some(PaymentStatus::Success);
        Ok(())
    } else {
        payment.status = Some(PaymentStatus::Error);
        Err(NmiError::RefundFailed {
            code: response.raw_code(),
        })
    }
}

/// Void the instrument's parent transaction. Requires a parent transaction
/// id; no network call is made otherwise.
pub async fn void(
    client: &GatewayClient,
    config: &NmiConfig,
    notifier: Option<&dyn Notifier>,
    payment: &mut PaymentInstrument,
) -> Result<(), NmiError> {
    let Some(parent) = payment.parent_transaction_id.clone() else {
        payment.status = Some(PaymentStatus::Error);
        return Err(NmiError::VoidPreconditionFailed);
    };

    let query = build_void_request(config, &parent, payment.amount);
    let response = post_with_alert(client, notifier, &query).await?;

    debug!(
        query = ?redact::redact_params(query.params()),
        response = ?response,
        "void response"
    );

    if response.is_approved() {
        payment.status = Some(PaymentStatus::Success);
        Ok(())
    } else {
        payment.status = Some(PaymentStatus::Error);
        Err(NmiError::VoidFailed {
            code: response.raw_code(),
        })
    }
}

/// Cancel the payment; an alias for [`void`].
pub async fn cancel(
    client: &GatewayClient,
    config: &NmiConfig,
    notifier: Option<&dyn Notifier>,
    payment: &mut PaymentInstrument,
) -> Result<(), NmiError> {
    void(client, config, notifier, payment).await
}
