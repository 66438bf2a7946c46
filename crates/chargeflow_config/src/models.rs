// --- File: crates/chargeflow_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- NMI (Network Merchants) Config ---
// Gateway credentials are expected to arrive via env overrides, e.g.
// CHARGEFLOW_NMI__USERNAME / CHARGEFLOW_NMI__PASSWORD.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NmiConfig {
    /// When set, the literal demo credentials are sent instead of the
    /// configured ones (for use against the gateway's test environment).
    #[serde(default)]
    pub test_mode: bool,
    pub username: String,
    pub password: String,
    /// Override of the gateway endpoint; defaults to the production
    /// transact URL when absent. Mainly useful for tests.
    pub gateway_url: Option<String>,
}

// --- Slack Alerting Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SlackConfig {
    /// Site-wide switch for payment-failure notifications.
    #[serde(default)]
    pub enable_notification: bool,
    /// Incoming-webhook URL. Loaded via CHARGEFLOW_SLACK__WEBHOOK_URL.
    pub webhook_url: String,
}

// --- Top-level Application Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    pub nmi: Option<NmiConfig>,
    pub slack: Option<SlackConfig>,
}
