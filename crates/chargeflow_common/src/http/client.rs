// --- File: crates/chargeflow_common/src/http/client.rs ---
use once_cell::sync::Lazy;
use reqwest::{Client, Error as ReqwestError};
use std::time::Duration;

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A static HTTP client that can be reused across the application.
/// This client is configured with a default timeout and follows redirects.
pub static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
});

/// Creates a new HTTP client with explicit connect and total timeouts.
///
/// Gateway integrations carry their own timeout contracts, so they build a
/// dedicated client instead of sharing [`HTTP_CLIENT`].
///
/// # Arguments
///
/// * `connect_timeout_secs` - The connection establishment timeout in seconds
/// * `timeout_secs` - The total request timeout in seconds
///
/// # Returns
///
/// A new reqwest::Client instance with the specified configuration
pub fn create_client(connect_timeout_secs: u64, timeout_secs: u64) -> Result<Client, ReqwestError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}
