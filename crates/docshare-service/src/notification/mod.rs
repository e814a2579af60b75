//! Share email delivery.
//!
//! The service composes one [`ShareEmail`] per recipient and hands them to
//! a [`NotificationDispatcher`]. Delivery itself (templates, SMTP) belongs
//! to the platform's mail relay.

pub mod dispatch;
pub mod log;
pub mod webhook;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docshare_core::config::{NotificationConfig, NotificationProvider};
use docshare_core::result::AppResult;
use docshare_core::types::ShareId;
use docshare_entity::share::Recipient;

pub use dispatch::{DeliveryFailure, DeliveryReport, deliver_all};
pub use log::LogDispatcher;
pub use webhook::WebhookDispatcher;

/// One share invitation addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareEmail {
    /// Share being announced.
    pub share_id: ShareId,
    /// Sender address configured for the deployment.
    pub from: String,
    /// Addressee.
    pub to: Recipient,
    /// Public link.
    pub share_url: String,
    /// Display name of the sharing user.
    pub sender_name: String,
    /// Vessel name, when known.
    pub vessel_name: Option<String>,
    /// Number of documents in the bundle.
    pub document_count: usize,
    /// Sender's note.
    pub message: Option<String>,
    /// Link expiry.
    pub expires_at: DateTime<Utc>,
}

/// Sends share emails.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync + std::fmt::Debug + 'static {
    /// Delivers one email. Errors are reported per recipient.
    async fn send(&self, email: &ShareEmail) -> AppResult<()>;

    /// Short provider name for logs.
    fn provider(&self) -> &'static str;
}

/// Builds the dispatcher selected by `notification.provider`.
pub fn build_dispatcher(config: &NotificationConfig) -> AppResult<Arc<dyn NotificationDispatcher>> {
    Ok(match config.provider {
        NotificationProvider::Log => Arc::new(LogDispatcher::new()),
        NotificationProvider::Webhook => Arc::new(WebhookDispatcher::new(config)?),
    })
}
