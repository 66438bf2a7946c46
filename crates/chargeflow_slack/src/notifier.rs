// --- File: crates/chargeflow_slack/src/notifier.rs ---
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use chargeflow_common::services::{BoxFuture, BoxedError, Notifier, NotifyOptions};
use chargeflow_common::HTTP_CLIENT;
use chargeflow_config::AppConfig;

/// Slack-specific error types.
#[derive(Error, Debug)]
pub enum SlackError {
    /// Error occurred during the webhook request
    #[error("Slack webhook request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Slack rejected the payload
    #[error("Slack webhook returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Missing or incomplete Slack configuration
    #[error("Slack configuration missing or incomplete")]
    ConfigError,
}

#[derive(Serialize, Debug)]
struct WebhookMessage<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_emoji: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<&'a str>,
}

/// Notification channel posting to a Slack incoming webhook.
///
/// Messages handed to this notifier must already be redacted; the payment
/// path treats delivery as best-effort and swallows failures.
pub struct SlackNotifier {
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        SlackNotifier {
            webhook_url: webhook_url.into(),
        }
    }

    /// Build a notifier from the application config, respecting the
    /// site-wide notification switch. Returns `None` when notifications are
    /// disabled or unconfigured.
    pub fn from_config(config: &AppConfig) -> Option<Arc<dyn Notifier>> {
        let slack = config.slack.as_ref()?;
        if !slack.enable_notification {
            return None;
        }
        Some(Arc::new(SlackNotifier::new(slack.webhook_url.clone())))
    }

    async fn post(&self, message: &str, options: &NotifyOptions) -> Result<(), SlackError> {
        let payload = WebhookMessage {
            text: message,
            icon_emoji: options.icon_emoji.as_deref(),
            channel: options.channel.as_deref(),
        };

        let response = HTTP_CLIENT
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::ApiError {
                status_code: status.as_u16(),
                message: body,
            });
        }

        debug!("Slack notification delivered");
        Ok(())
    }
}

impl Notifier for SlackNotifier {
    fn send<'a>(
        &'a self,
        message: &'a str,
        options: &'a NotifyOptions,
    ) -> BoxFuture<'a, (), BoxedError> {
        Box::pin(async move {
            self.post(message, options)
                .await
                .map_err(|err| BoxedError(Box::new(err)))
        })
    }
}
