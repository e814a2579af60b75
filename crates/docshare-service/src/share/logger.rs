//! Asynchronous, non-blocking access logger.
//!
//! `record` hands entries to a bounded queue and returns immediately. A
//! single writer task drains the queue into the [`AccessLogStore`] in order,
//! retrying transient failures with exponential backoff. Recipient-facing
//! requests never fail or wait because of logging.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use docshare_core::config::AccessLogConfig;
use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::types::ShareId;
use docshare_database::store::AccessLogStore;
use docshare_entity::access_log::{
    AccessLogEntry, ChainVerification, NewAccessLogEntry, verify_chain,
};

enum Command {
    Append(NewAccessLogEntry),
    Flush(oneshot::Sender<()>),
}

/// Handle to the access log writer.
#[derive(Debug, Clone)]
pub struct AccessLogger {
    tx: mpsc::Sender<Command>,
    store: Arc<dyn AccessLogStore>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Append(entry) => f.debug_tuple("Append").field(&entry.share_id).finish(),
            Self::Flush(_) => f.write_str("Flush"),
        }
    }
}

impl AccessLogger {
    /// Starts the writer task on the current tokio runtime.
    pub fn spawn(store: Arc<dyn AccessLogStore>, config: &AccessLogConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let writer = Writer {
            store: Arc::clone(&store),
            max_retries: config.max_retries,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        };
        tokio::spawn(writer.run(rx));
        Self { tx, store }
    }

    /// Queues an entry. Never fails; a full or closed queue drops the entry
    /// with a warning.
    pub fn record(&self, entry: NewAccessLogEntry) {
        match self.tx.try_send(Command::Append(entry)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(Command::Append(entry))) => {
                warn!(
                    share_id = %entry.share_id,
                    action = %entry.action,
                    "Access log queue full, dropping entry"
                );
            }
            Err(_) => {
                warn!("Access log writer stopped, dropping entry");
            }
        }
    }

    /// Waits until every entry queued before this call has been written (or
    /// given up on).
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(ack_tx)).await.is_err() {
            return;
        }
        let _ = ack_rx.await;
    }

    /// A share's entries in append order.
    pub async fn list_for_share(&self, share_id: ShareId) -> AppResult<Vec<AccessLogEntry>> {
        self.store.list_for_share(share_id).await
    }

    /// Re-walks a share's hash chain.
    pub async fn verify_chain(&self, share_id: ShareId) -> AppResult<ChainVerification> {
        let entries = self.list_for_share(share_id).await?;
        let verification = verify_chain(&entries);
        if !verification.valid {
            error!(
                share_id = %share_id,
                broken_at = ?verification.broken_at_sequence,
                "Access log chain verification failed"
            );
        }
        Ok(verification)
    }
}

struct Writer {
    store: Arc<dyn AccessLogStore>,
    max_retries: u32,
    backoff: Duration,
}

impl Writer {
    async fn run(self, mut rx: mpsc::Receiver<Command>) {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Append(entry) => self.write(entry).await,
                Command::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
        debug!("Access log writer stopped");
    }

    async fn write(&self, entry: NewAccessLogEntry) {
        let mut attempt = 0;
        loop {
            match self.store.append(entry.clone()).await {
                Ok(stored) => {
                    debug!(
                        share_id = %stored.share_id,
                        sequence = stored.sequence,
                        action = %stored.action,
                        "Access recorded"
                    );
                    return;
                }
                Err(e) if attempt < self.max_retries => {
                    warn!(
                        share_id = %entry.share_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Access log append failed, retrying"
                    );
                    tokio::time::sleep(self.backoff * 2u32.saturating_pow(attempt)).await;
                    attempt += 1;
                }
                Err(e) => {
                    log_dropped(&entry, &e);
                    return;
                }
            }
        }
    }
}

fn log_dropped(entry: &NewAccessLogEntry, e: &AppError) {
    error!(
        share_id = %entry.share_id,
        action = %entry.action,
        error = %e,
        "Access log entry dropped after retries"
    );
}
