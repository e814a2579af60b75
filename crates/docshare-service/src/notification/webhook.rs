//! Dispatcher that posts emails to the platform's mail relay.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use docshare_core::config::NotificationConfig;
use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;

use super::{NotificationDispatcher, ShareEmail};

/// POSTs each [`ShareEmail`] as JSON to `notification.webhook_url`.
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    client: Client,
    url: String,
    token: Option<String>,
}

impl WebhookDispatcher {
    /// Creates a dispatcher from configuration.
    pub fn new(config: &NotificationConfig) -> AppResult<Self> {
        if config.webhook_url.is_empty() {
            return Err(AppError::configuration(
                "notification.webhook_url is required for the webhook provider",
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            url: config.webhook_url.clone(),
            token: (!config.webhook_token.is_empty()).then(|| config.webhook_token.clone()),
        })
    }
}

#[async_trait]
impl NotificationDispatcher for WebhookDispatcher {
    async fn send(&self, email: &ShareEmail) -> AppResult<()> {
        let mut request = self.client.post(&self.url).json(email);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Mail relay unreachable", e)
        })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::external_service(format!(
                "Mail relay rejected message with status {}",
                response.status().as_u16()
            )))
        }
    }

    fn provider(&self) -> &'static str {
        "webhook"
    }
}
