//! Share email delivery configuration.

use serde::{Deserialize, Serialize};

/// Which dispatcher delivers share emails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationProvider {
    /// Write the outgoing email to the log only (development).
    Log,
    /// POST each email as JSON to a mail relay webhook.
    Webhook,
}

/// Notification dispatcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Dispatcher implementation.
    #[serde(default = "default_provider")]
    pub provider: NotificationProvider,
    /// Mail relay endpoint (webhook provider only).
    #[serde(default)]
    pub webhook_url: String,
    /// Bearer token sent to the mail relay (optional).
    #[serde(default)]
    pub webhook_token: String,
    /// Sender address placed on outgoing emails.
    #[serde(default = "default_from")]
    pub from_address: String,
    /// Per-recipient delivery timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            webhook_url: String::new(),
            webhook_token: String::new(),
            from_address: default_from(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_provider() -> NotificationProvider {
    NotificationProvider::Log
}

fn default_from() -> String {
    "no-reply@docshare.local".to_string()
}

fn default_timeout() -> u64 {
    10
}
