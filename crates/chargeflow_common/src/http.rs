// --- File: crates/chargeflow_common/src/http.rs ---

// HTTP utilities shared across the Chargeflow crates.
pub mod client;

pub use client::{create_client, HTTP_CLIENT};
