//! Concurrent fan-out of share emails.

use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{NotificationDispatcher, ShareEmail};

/// A recipient the email could not be delivered to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFailure {
    /// Recipient address.
    pub email: String,
    /// What went wrong.
    pub error: String,
}

/// Aggregate outcome of sending one share to all its recipients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReport {
    /// Emails accepted by the dispatcher.
    pub total_sent: usize,
    /// Emails that failed or timed out.
    pub total_failed: usize,
    /// Per-recipient failures.
    pub failures: Vec<DeliveryFailure>,
}

/// Sends every email concurrently, each bounded by `per_recipient`.
///
/// One slow or failing recipient never affects the others.
pub async fn deliver_all(
    dispatcher: &dyn NotificationDispatcher,
    emails: Vec<ShareEmail>,
    per_recipient: Duration,
) -> DeliveryReport {
    let attempts = emails.iter().map(|email| async move {
        let outcome = match tokio::time::timeout(per_recipient, dispatcher.send(email)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.message),
            Err(_) => Err(format!("Timed out after {}s", per_recipient.as_secs())),
        };
        (email, outcome)
    });

    let mut report = DeliveryReport::default();
    for (email, outcome) in join_all(attempts).await {
        match outcome {
            Ok(()) => report.total_sent += 1,
            Err(error) => {
                warn!(
                    share_id = %email.share_id,
                    to = %email.to.email,
                    provider = dispatcher.provider(),
                    error = %error,
                    "Share email delivery failed"
                );
                report.total_failed += 1;
                report.failures.push(DeliveryFailure {
                    email: email.to.email.clone(),
                    error,
                });
            }
        }
    }
    report
}
