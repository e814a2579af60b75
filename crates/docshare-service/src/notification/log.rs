//! Dispatcher that only logs, for development deployments.

use async_trait::async_trait;
use tracing::info;

use docshare_core::result::AppResult;

use super::{NotificationDispatcher, ShareEmail};

/// Writes each email to the log instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct LogDispatcher;

impl LogDispatcher {
    /// Creates a new log dispatcher.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn send(&self, email: &ShareEmail) -> AppResult<()> {
        info!(
            share_id = %email.share_id,
            to = %email.to.email,
            share_url = %email.share_url,
            expires_at = %email.expires_at,
            "Share email (log provider)"
        );
        Ok(())
    }

    fn provider(&self) -> &'static str {
        "log"
    }
}
