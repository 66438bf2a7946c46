// --- File: crates/chargeflow_nmi/src/redact.rs ---
//! Sensitive-data redaction for outbound payloads.
//!
//! Every payload must pass through here before it reaches a log line or the
//! alert channel: credentials are fully masked, card numbers keep only their
//! last four digits. Works on the flat map form and on already-serialized
//! JSON strings. Redaction is shallow; gateway payloads are flat maps.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

const MASK: &str = "***";

/// Number of trailing card digits left visible.
const VISIBLE_SUFFIX: usize = 4;

static PASSWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)"password":\s*"[^"]*""#).expect("valid redaction pattern"));
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)"username":\s*"[^"]*""#).expect("valid redaction pattern"));
static CVV_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)"cvv":\s*"[^"]*""#).expect("valid redaction pattern"));
static CCNUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)"ccnumber":\s*"[^"]*([^"]{4})""#).expect("valid redaction pattern")
});

fn mask_keep_suffix(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= VISIBLE_SUFFIX {
        return MASK.to_string();
    }
    let suffix: String = chars[chars.len() - VISIBLE_SUFFIX..].iter().collect();
    format!("{}{}", MASK, suffix)
}

/// Return a sanitized copy of a flat payload map.
///
/// `ccnumber` keeps its last four digits; `password`, `cvv` and `username`
/// are fully masked. All other fields pass through untouched.
pub fn redact_params(params: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    params
        .iter()
        .map(|(key, value)| {
            let redacted = match key.as_str() {
                "ccnumber" => mask_keep_suffix(value),
                "password" | "cvv" | "username" => MASK.to_string(),
                _ => value.clone(),
            };
            (key.clone(), redacted)
        })
        .collect()
}

/// Apply the equivalent substitutions to a JSON-serialized payload.
pub fn redact_json(payload: &str) -> String {
    let step = CCNUMBER_RE.replace_all(payload, r#""ccnumber":"***$1""#);
    let step = PASSWORD_RE.replace_all(&step, r#""password":"***""#);
    let step = USERNAME_RE.replace_all(&step, r#""username":"***""#);
    CVV_RE.replace_all(&step, r#""cvv":"***""#).into_owned()
}
