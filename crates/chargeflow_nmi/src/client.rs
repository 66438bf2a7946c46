// --- File: crates/chargeflow_nmi/src/client.rs ---
//! Wire types and the HTTP client for the NMI transact endpoint.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::error::NmiError;
use chargeflow_common::create_client;

/// Production transact endpoint.
pub const GATEWAY_URL: &str = "https://secure.nmi.com/api/transact.php";

/// Connection establishment timeout, per the gateway integration contract.
const CONNECT_TIMEOUT_SECS: u64 = 40;
/// Total request timeout.
const TOTAL_TIMEOUT_SECS: u64 = 80;

// Response codes returned in the `response` field.
pub const RESPONSE_CODE_APPROVED: u32 = 1;
pub const RESPONSE_CODE_DECLINED: u32 = 2;
pub const RESPONSE_CODE_ERROR: u32 = 3;
pub const RESPONSE_CODE_HELD: u32 = 4;

/// Classification of the gateway's numeric response code.
///
/// Only `Approved` is ever treated as success; the other outcomes all take
/// the failure branch, but callers can still tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    Approved,
    Declined,
    Error,
    Held,
    Unknown,
}

impl ResponseOutcome {
    pub fn from_code(code: u32) -> Self {
        match code {
            RESPONSE_CODE_APPROVED => ResponseOutcome::Approved,
            RESPONSE_CODE_DECLINED => ResponseOutcome::Declined,
            RESPONSE_CODE_ERROR => ResponseOutcome::Error,
            RESPONSE_CODE_HELD => ResponseOutcome::Held,
            _ => ResponseOutcome::Unknown,
        }
    }
}

/// A flat, ordered key/value payload sent to the gateway as a form body.
///
/// `BTreeMap` keeps field order stable so identical inputs always encode to
/// the identical body.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct GatewayRequest {
    params: BTreeMap<String, String>,
}

impl GatewayRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.params.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Serialize the payload as JSON (used for alert messages, after
    /// redaction).
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.params).unwrap_or_default()
    }
}

/// The flat key/value mapping decoded from the gateway's URL-encoded
/// response body.
#[derive(Debug, Clone, Default)]
pub struct GatewayResponse {
    fields: HashMap<String, String>,
}

impl GatewayResponse {
    /// Decode a URL-encoded response body. Unparseable bodies yield an empty
    /// mapping, which callers treat as a failure (no `response` field).
    pub fn from_urlencoded(body: &str) -> Self {
        let fields = serde_urlencoded::from_str::<HashMap<String, String>>(body)
            .unwrap_or_default();
        GatewayResponse { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The numeric `response` code, if present and recognizable.
    pub fn response_code(&self) -> Option<u32> {
        self.get("response").and_then(|v| v.parse().ok())
    }

    pub fn outcome(&self) -> ResponseOutcome {
        self.response_code()
            .map(ResponseOutcome::from_code)
            .unwrap_or(ResponseOutcome::Unknown)
    }

    pub fn is_approved(&self) -> bool {
        !self.is_empty() && self.response_code() == Some(RESPONSE_CODE_APPROVED)
    }

    /// Raw response code as received, empty when absent.
    pub fn raw_code(&self) -> String {
        self.get("response").unwrap_or_default().to_string()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.fields).unwrap_or_default()
    }
}

/// Synchronous-per-call HTTP client for the transact endpoint.
///
/// One blocking round-trip per operation: connect timeout 40s, total timeout
/// 80s, TLS certificate verification on. Transport failures are surfaced as
/// [`NmiError::Transport`] and never retried.
pub struct GatewayClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GatewayClient {
    /// Build a client against `endpoint`, or the production transact URL
    /// when `None`.
    pub fn new(endpoint: Option<&str>) -> Result<Self, NmiError> {
        let client = create_client(CONNECT_TIMEOUT_SECS, TOTAL_TIMEOUT_SECS)?;
        Ok(GatewayClient {
            client,
            endpoint: endpoint.unwrap_or(GATEWAY_URL).to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the payload form-encoded and decode the URL-encoded response.
    pub async fn post(&self, request: &GatewayRequest) -> Result<GatewayResponse, NmiError> {
        let body = encode_rfc3986(request)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        debug!(%status, endpoint = %self.endpoint, "gateway responded");

        if !status.is_success() {
            return Err(NmiError::Transport {
                code: status.as_u16().to_string(),
                message: body_text,
            });
        }

        Ok(GatewayResponse::from_urlencoded(&body_text))
    }
}

/// Form-encode the payload with RFC3986 percent-encoding.
///
/// `serde_urlencoded` emits `+` for spaces (www-form-urlencoded); the gateway
/// expects `%20`. Literal plus signs are already encoded as `%2B` at this
/// point, so the rewrite is exact.
fn encode_rfc3986(request: &GatewayRequest) -> Result<String, NmiError> {
    let encoded = serde_urlencoded::to_string(request.params())
        .map_err(|e| NmiError::Encoding(e.to_string()))?;
    Ok(encoded.replace('+', "%20"))
}
