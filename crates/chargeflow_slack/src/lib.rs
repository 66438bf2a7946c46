// --- File: crates/chargeflow_slack/src/lib.rs ---

pub mod notifier;

pub use notifier::{SlackError, SlackNotifier};
